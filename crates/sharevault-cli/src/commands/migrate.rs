//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use sharevault_core::error::AppError;
use sharevault_database::DatabasePool;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check database connectivity
    Ping,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            let db = DatabasePool::connect(&config.database).await?;
            db.run_migrations().await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Ping => {
            let db = DatabasePool::connect(&config.database).await?;
            let rtt = db.ping().await?;
            output::print_success(&format!("Database is reachable ({} ms).", rtt.as_millis()));
        }
    }

    Ok(())
}
