//! ESEP CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema (categories, registrations, admin users, sessions)
//! esep-cli migrate
//!
//! # Create the first super admin (password from ESEP_ADMIN_PASSWORD)
//! esep-cli admin create -u admin -r super_admin
//!
//! # Reset a forgotten password
//! esep-cli admin set-password -u admin
//!
//! # Insert sample panchayaths and categories
//! esep-cli seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use esep_core::AdminRole;

mod commands;

#[derive(Parser)]
#[command(name = "esep-cli")]
#[command(author, version, about = "ESEP management tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Insert sample panchayaths and categories (skips existing names)
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login name (stored lower-case)
        #[arg(short, long)]
        username: String,

        /// Role: `super_admin`, `local_admin` or `user_admin`
        #[arg(short, long, default_value = "user_admin")]
        role: AdminRole,

        /// Password; prefer the environment variable over the shell history
        #[arg(short, long, env = "ESEP_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Replace an existing account's password
    SetPassword {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "ESEP_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "esep_cli=info,esep_admin=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                role,
                password,
            } => {
                commands::admin::create_user(&username, role, password).await?;
            }
            AdminAction::SetPassword { username, password } => {
                commands::admin::set_password(&username, &password).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::try_parse_from([
            "esep-cli", "admin", "create", "-u", "Asha", "-r", "super_admin", "-p", "s3cret-pass",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Admin {
                action: AdminAction::Create {
                    role: AdminRole::SuperAdmin,
                    ..
                }
            })
        ));
    }

    #[test]
    fn test_unknown_role_rejected_at_parse_time() {
        let cli = Cli::try_parse_from([
            "esep-cli", "admin", "create", "-u", "Asha", "-r", "root", "-p", "s3cret-pass",
        ]);
        assert!(cli.is_err());
    }
}
