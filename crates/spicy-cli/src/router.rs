//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use anyhow::Context;
use spicy_sdk::SpicyClient;
use tracing::debug;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let client = SpicyClient::new().context("Failed to configure client")?;
    debug!("Running {:?}", cli.command);

    match cli.command {
        Commands::Login { email } => commands::auth::login(&client, &email).await,
        Commands::Status => commands::auth::status(&client).await,
        Commands::Logout => commands::auth::logout(&client).await,
        Commands::Whoami => commands::account::whoami(&client).await,
        Commands::Search { query, per_page } => {
            commands::search::search(&client, &query, per_page).await
        }
    }
}
