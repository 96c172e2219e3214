//! Folder CRUD operations with permission enforcement.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use sharevault_auth::access::PermissionResolver;
use sharevault_core::error::AppError;
use sharevault_core::result::AppResult;
use sharevault_database::repositories::FolderRepository;
use sharevault_entity::folder::{CreateFolder, Folder};
use sharevault_entity::permission::names;

use super::reparent::creates_cycle;

/// Manages folder CRUD and reparenting.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<FolderRepository>, resolver: Arc<PermissionResolver>) -> Self {
        Self {
            folder_repo,
            resolver,
        }
    }

    /// Gets a folder the subject may read.
    pub async fn get_folder(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<Folder> {
        let folder = self.find_existing(folder_id).await?;
        self.require(folder_id, user_id, names::READ).await?;
        Ok(folder)
    }

    /// Lists direct children of a folder the subject may read.
    pub async fn list_children(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<Vec<Folder>> {
        self.find_existing(folder_id).await?;
        self.require(folder_id, user_id, names::READ).await?;
        self.folder_repo.find_children(folder_id).await
    }

    /// Creates a folder, owned by the caller.
    ///
    /// Creating under a parent requires edit on that parent; root
    /// folders need no grant.
    pub async fn create_folder(
        &self,
        user_id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        validate_name(name)?;

        if let Some(parent_id) = parent_id {
            self.find_existing(parent_id).await?;
            self.require(parent_id, user_id, names::EDIT).await?;
        }

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                name: name.to_string(),
                owner_id: user_id,
                parent_id,
            })
            .await?;

        info!(user_id = %user_id, folder_id = %folder.id, "Folder created");
        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<()> {
        validate_name(new_name)?;
        self.find_existing(folder_id).await?;
        self.require(folder_id, user_id, names::EDIT).await?;

        self.folder_repo.rename(folder_id, new_name).await?;
        info!(user_id = %user_id, folder_id = %folder_id, new_name = %new_name, "Folder renamed");
        Ok(())
    }

    /// Moves a folder under a new parent (or to the root with `None`),
    /// refusing moves that would make the folder its own ancestor.
    pub async fn move_folder(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<()> {
        self.find_existing(folder_id).await?;
        self.require(folder_id, user_id, names::EDIT).await?;

        if let Some(new_parent_id) = new_parent_id {
            self.find_existing(new_parent_id).await?;
            self.require(new_parent_id, user_id, names::EDIT).await?;

            let links = self.folder_repo.parent_links().await?;
            if creates_cycle(folder_id, new_parent_id, &links) {
                return Err(AppError::validation(
                    "Cannot move a folder into itself or one of its descendants",
                ));
            }
        }

        self.folder_repo.set_parent(folder_id, new_parent_id).await?;
        info!(user_id = %user_id, folder_id = %folder_id, "Folder moved");
        Ok(())
    }

    /// Deletes a folder.
    pub async fn delete_folder(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<()> {
        self.find_existing(folder_id).await?;
        self.require(folder_id, user_id, names::DELETE).await?;

        self.folder_repo.delete(folder_id).await?;
        info!(user_id = %user_id, folder_id = %folder_id, "Folder deleted");
        Ok(())
    }

    async fn find_existing(&self, folder_id: Uuid) -> AppResult<Folder> {
        self.folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    async fn require(&self, resource_id: Uuid, user_id: Uuid, permission: &str) -> AppResult<()> {
        if self
            .resolver
            .has_permission(resource_id, user_id, permission)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You do not have permission to perform this action",
            ))
        }
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rejects_blank() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Quarterly Reports").is_ok());
    }
}
