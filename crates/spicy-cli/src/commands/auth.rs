//! Login, status and logout commands

use crate::console::{CliConsole, format_duration};
use anyhow::Context;
use spicy_sdk::{SpicyClient, TerminalOtpPrompt};

/// Run the email OTP login and load account data
pub async fn login(client: &SpicyClient, email: &str) -> anyhow::Result<()> {
    let console = CliConsole;
    let prompt = TerminalOtpPrompt::default();
    client
        .login(email, || prompt.read())
        .await
        .context("Login failed")?;

    match client.user() {
        Some(user) => console.success(&format!("Logged in as {} ({})", user.name, user.username)),
        None => console.success("Logged in"),
    }
    Ok(())
}

/// Report whether a usable credential is cached
pub async fn status(client: &SpicyClient) -> anyhow::Result<()> {
    let console = CliConsole;
    console.print_header("Session Status");

    let token_file = client.session().config().token_file.display().to_string();
    console.field("Token file", &token_file);

    match client.session().get_token().await {
        Some(token) => {
            console.field("State", "logged in");
            console.field("Valid for", &format_duration(token.remaining_lifetime()));
            if !token.scope.is_empty() {
                console.field("Scope", &token.scope);
            }
        }
        None => {
            console.field("State", "logged out");
            console.info("Run `spicy login --email <address>` to log in.");
        }
    }
    Ok(())
}

/// Forget the credential
pub async fn logout(client: &SpicyClient) -> anyhow::Result<()> {
    client.logout().await.context("Logout failed")?;
    CliConsole.success("Logged out");
    Ok(())
}
