//! Cybee CLI - Catalog seeding and account management tools.
//!
//! # Usage
//!
//! ```bash
//! # Write the demo catalog and default settings
//! cybee-cli seed products
//!
//! # Provision the admin account
//! cybee-cli admin create -e admin@cybee.com -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `FIREBASE_PROJECT_ID` - Firebase project ID
//! - `FIREBASE_API_KEY` - Firebase web API key

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cybee-cli")]
#[command(author, version, about = "Cybee CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed backend data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage the admin account
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Write the demo product catalog and default attribute settings
    Products,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create the admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products => commands::seed::products().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create { email, password } => {
                commands::admin::create(&email, &password).await?;
            }
        },
    }
    Ok(())
}
