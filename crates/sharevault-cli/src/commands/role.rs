//! Role management commands.

use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::output;
use sharevault_core::error::AppError;
use sharevault_database::repositories::{GrantRepository, UserRepository};

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Create a role
    Create {
        /// Role name
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Add a user to a role
    AddMember {
        /// Role name
        role: String,
        /// User email
        email: String,
    },
    /// Grant a permission to a role, optionally scoped to one resource
    Grant {
        /// Role name
        role: String,
        /// Permission kind name
        permission: String,
        /// Resource ID; omit for a global grant covering every resource
        #[arg(long)]
        resource: Option<Uuid>,
    },
}

/// Execute role commands
pub async fn execute(args: &RoleArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let grant_repo = GrantRepository::new(pool.clone());
    let user_repo = UserRepository::new(pool);

    match &args.command {
        RoleCommand::Create { name, description } => {
            let role = grant_repo.create_role(name, description.as_deref()).await?;
            output::print_success(&format!("Role '{}' created ({})", name, role.id));
        }
        RoleCommand::AddMember { role, email } => {
            let role = grant_repo
                .find_role_by_name(role)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", role.clone())))?;
            let user = user_repo
                .find_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", email)))?;

            grant_repo.add_role_member(user.id, role.id).await?;
            output::print_success(&format!("'{}' added to role '{}'", email, role.name));
        }
        RoleCommand::Grant {
            role,
            permission,
            resource,
        } => {
            let role = grant_repo
                .find_role_by_name(role)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", role.clone())))?;
            let kind = grant_repo
                .find_kind_by_name(permission)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Permission kind '{}' not found", permission))
                })?;

            grant_repo
                .insert_role_grant(role.id, kind.id, *resource)
                .await?;

            match resource {
                Some(resource) => output::print_success(&format!(
                    "Role '{}' granted '{}' on {}",
                    role.name, permission, resource
                )),
                None => output::print_success(&format!(
                    "Role '{}' granted '{}' globally",
                    role.name, permission
                )),
            }
        }
    }

    Ok(())
}
