//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spicy")]
#[command(about = "SpicyChat client - email OTP login, account and character search")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Log in with a one-time code sent by email
    Login {
        /// Account email address
        #[arg(long, env = "SPICY_EMAIL")]
        email: String,
    },

    /// Show whether a usable credential is cached
    Status,

    /// Forget the cached credential
    Logout,

    /// Show the logged-in user's profile
    Whoami,

    /// Search public characters
    Search {
        /// Search text; `*` lists the most active characters
        query: String,

        /// Results per page
        #[arg(long, default_value_t = 24)]
        per_page: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_email() {
        let cli = Cli::try_parse_from(["spicy", "login", "--email", "me@example.com"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Login {
                email: "me@example.com".to_string()
            }
        );
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["spicy", "search", "pirates", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Search {
                query: "pirates".to_string(),
                per_page: 24
            }
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["spicy"]).is_err());
    }
}
