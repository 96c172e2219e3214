//! CLI command definitions and dispatch.

pub mod grant;
pub mod migrate;
pub mod role;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use sharevault_core::error::AppError;

/// ShareVault — multi-tenant file sharing administration
#[derive(Debug, Parser)]
#[command(name = "sharevault", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/default.toml then
    /// config/<env>.toml)
    #[arg(short, long, default_value = "default")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Enable debug logging for ShareVault crates
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Grant management and permission checks
    Grant(grant::GrantArgs),
    /// Role management
    Role(role::RoleArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env, self.format).await,
            Commands::Grant(args) => grant::execute(args, &self.env, self.format).await,
            Commands::Role(args) => role::execute(args, &self.env).await,
        }
    }
}

/// Helper: load configuration for the given environment
pub fn load_config(env: &str) -> Result<sharevault_core::config::AppConfig, AppError> {
    sharevault_core::config::AppConfig::load(env)
}

/// Helper: create database pool from config
pub async fn create_db_pool(
    config: &sharevault_core::config::AppConfig,
) -> Result<sqlx::PgPool, AppError> {
    let pool = sharevault_database::connection::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
