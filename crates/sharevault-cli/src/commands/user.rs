//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use sharevault_auth::password::{PasswordHasher, PasswordValidator};
use sharevault_core::error::AppError;
use sharevault_database::repositories::UserRepository;
use sharevault_entity::user::{CreateUser, UserStatus};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a new user (prompts for the password)
    Register {
        /// Login email address
        email: String,
        /// Display name
        #[arg(short, long)]
        display_name: Option<String>,
    },
    /// List all users
    List,
    /// Re-enable a disabled user
    Enable {
        /// Login email address
        email: String,
    },
    /// Disable a user
    Disable {
        /// Login email address
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Display name
    display_name: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(args: &UserArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let user_repo = Arc::new(UserRepository::new(pool));

    match &args.command {
        UserCommand::Register {
            email,
            display_name,
        } => {
            if user_repo.email_exists(email).await? {
                return Err(AppError::conflict(format!(
                    "Email '{}' is already registered",
                    email
                )));
            }

            let password = dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

            PasswordValidator::new(&config.auth).validate(&password)?;
            let password_hash = PasswordHasher::new().hash_password(&password)?;

            let user = user_repo
                .create(&CreateUser {
                    email: email.clone(),
                    display_name: display_name.clone(),
                    password_hash,
                })
                .await?;

            output::print_success(&format!("User '{}' registered ({})", email, user.id));
        }
        UserCommand::List => {
            let users = user_repo.find_all().await?;
            let rows: Vec<UserRow> = users
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone(),
                    display_name: u.display_name.clone().unwrap_or_default(),
                    status: u.status.as_str().to_string(),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::Enable { email } => {
            let user = find_user(&user_repo, email).await?;
            user_repo.update_status(user.id, UserStatus::Active).await?;
            output::print_success(&format!("User '{}' enabled", email));
        }
        UserCommand::Disable { email } => {
            let user = find_user(&user_repo, email).await?;
            user_repo
                .update_status(user.id, UserStatus::Disabled)
                .await?;
            output::print_success(&format!("User '{}' disabled", email));
        }
    }

    Ok(())
}

async fn find_user(
    repo: &UserRepository,
    email: &str,
) -> Result<sharevault_entity::user::User, AppError> {
    repo.find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{}' not found", email)))
}
