//! Profile display

use crate::console::CliConsole;
use anyhow::{Context, bail};
use spicy_sdk::SpicyClient;

/// Show the logged-in user's profile
pub async fn whoami(client: &SpicyClient) -> anyhow::Result<()> {
    if client.session().get_token().await.is_none() {
        bail!("Not logged in. Run `spicy login --email <address>` first.");
    }

    let user = client
        .get_user_profile()
        .await
        .context("Failed to fetch profile")?;

    let console = CliConsole;
    console.print_header(&user.name);
    console.field("Username", &user.username);
    console.field("Email", &user.email);
    console.field("User id", &user.id);
    if let Some(persona) = &user.default_persona_id {
        console.field("Persona", persona);
    }
    if let Some(highlights) = user.highlights.as_deref().filter(|h| !h.is_empty()) {
        console.field("About", highlights);
    }
    Ok(())
}
