//! Spicy CLI
//!
//! Command-line front end for the SpicyChat client.
//!
//! ```bash
//! spicy login --email me@example.com   # email OTP login
//! spicy status                         # credential validity
//! spicy whoami                         # profile of the logged-in user
//! spicy search "space pirates"         # character search
//! spicy logout                         # forget the credential
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG`; `--verbose` raises the
//! default level to `debug`.

mod args;
mod commands;
mod console;
mod router;

use clap::Parser;
use args::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let verbose = cli.verbose;
    if let Err(err) = router::route(cli).await {
        console::report_error(&err, verbose);
        std::process::exit(1);
    }
}
