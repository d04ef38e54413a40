//! Lotus CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! lotus-cli migrate
//!
//! # Create a user (e.g. an admin for the panel)
//! lotus-cli user create -e admin@example.com -n "Admin Name" -r admin
//!
//! # Recompute denormalized category product counts
//! lotus-cli recount
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create users with an explicit role
//! - `recount` - Repair category product counts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lotus-cli")]
#[command(author, version, about = "Lotus CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Recompute denormalized category product counts
    Recount,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Role (`customer`, `admin`)
        #[arg(short, long, default_value = "customer")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                password,
                role,
            } => commands::user::create(&email, &name, password.as_deref(), &role).await?,
        },
        Commands::Recount => commands::recount::run().await?,
    }

    Ok(())
}
