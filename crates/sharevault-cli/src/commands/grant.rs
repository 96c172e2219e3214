//! Grant management and permission check commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use sharevault_auth::access::{PermissionResolver, store::PgGrantStore};
use sharevault_core::error::AppError;
use sharevault_database::repositories::{GrantRepository, UserRepository};

/// Arguments for grant commands
#[derive(Debug, Args)]
pub struct GrantArgs {
    /// Grant subcommand
    #[command(subcommand)]
    pub command: GrantCommand,
}

/// Grant subcommands
#[derive(Debug, Subcommand)]
pub enum GrantCommand {
    /// Grant a permission on a resource to a user
    Add {
        /// Resource ID (file or folder)
        resource: Uuid,
        /// User email
        email: String,
        /// Permission kind name (read, edit, delete, share)
        permission: String,
        /// Acting administrator's email, recorded as the grantor
        #[arg(long)]
        granted_by: String,
    },
    /// Revoke a direct grant
    Remove {
        /// Resource ID
        resource: Uuid,
        /// User email
        email: String,
        /// Permission kind name
        permission: String,
    },
    /// List grants on a resource
    List {
        /// Resource ID
        resource: Uuid,
    },
    /// Check whether a user holds a permission on a resource
    Check {
        /// Resource ID
        resource: Uuid,
        /// User email
        email: String,
        /// Permission kind name
        permission: String,
    },
}

/// Direct grant display row
#[derive(Debug, Serialize, Tabled)]
struct DirectGrantRow {
    /// Grantee user ID
    user_id: String,
    /// Permission kind ID
    permission_id: String,
    /// Grantor user ID
    granted_by: String,
    /// Granted at
    created_at: String,
}

/// Role grant display row
#[derive(Debug, Serialize, Tabled)]
struct RoleGrantRow {
    /// Role ID
    role_id: String,
    /// Permission kind ID
    permission_id: String,
    /// Granted at
    created_at: String,
}

/// Execute grant commands
pub async fn execute(args: &GrantArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let grant_repo = Arc::new(GrantRepository::new(pool.clone()));
    let user_repo = UserRepository::new(pool);

    match &args.command {
        GrantCommand::Add {
            resource,
            email,
            permission,
            granted_by,
        } => {
            let user = find_user(&user_repo, email).await?;
            let grantor = find_user(&user_repo, granted_by).await?;
            let kind = find_kind(&grant_repo, permission).await?;

            grant_repo
                .insert_direct_grant(*resource, user.id, kind.id, grantor.id)
                .await?;
            output::print_success(&format!(
                "Granted '{}' on {} to '{}'",
                permission, resource, email
            ));
        }
        GrantCommand::Remove {
            resource,
            email,
            permission,
        } => {
            let user = find_user(&user_repo, email).await?;
            let kind = find_kind(&grant_repo, permission).await?;

            if grant_repo
                .delete_direct_grant(*resource, user.id, kind.id)
                .await?
            {
                output::print_success(&format!(
                    "Revoked '{}' on {} from '{}'",
                    permission, resource, email
                ));
            } else {
                output::print_warning("No matching grant found.");
            }
        }
        GrantCommand::List { resource } => {
            let direct = grant_repo.list_direct_grants(*resource).await?;
            let rows: Vec<DirectGrantRow> = direct
                .iter()
                .map(|g| DirectGrantRow {
                    user_id: g.user_id.to_string(),
                    permission_id: g.permission_id.to_string(),
                    granted_by: g.granted_by.to_string(),
                    created_at: g.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            println!("Direct grants:");
            output::print_list(&rows, format);

            let role = grant_repo.list_role_grants(*resource).await?;
            let rows: Vec<RoleGrantRow> = role
                .iter()
                .map(|g| RoleGrantRow {
                    role_id: g.role_id.to_string(),
                    permission_id: g.permission_id.to_string(),
                    created_at: g.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            println!("Role grants:");
            output::print_list(&rows, format);
        }
        GrantCommand::Check {
            resource,
            email,
            permission,
        } => {
            let user = find_user(&user_repo, email).await?;
            let resolver =
                PermissionResolver::new(Arc::new(PgGrantStore::new(grant_repo.clone())));

            if resolver.has_permission(*resource, user.id, permission).await? {
                output::print_success(&format!(
                    "'{}' holds '{}' on {}",
                    email, permission, resource
                ));
            } else {
                output::print_warning(&format!(
                    "'{}' does NOT hold '{}' on {}",
                    email, permission, resource
                ));
            }
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

async fn find_kind(
    repo: &GrantRepository,
    name: &str,
) -> Result<sharevault_entity::permission::PermissionKind, AppError> {
    repo.find_kind_by_name(name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Permission kind '{}' not found", name)))
}
