//! File metadata operations.
//!
//! Bytes live in an external blob store; this service manages the
//! metadata records and enforces permissions on them.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use sharevault_auth::access::PermissionResolver;
use sharevault_core::error::AppError;
use sharevault_core::result::AppResult;
use sharevault_database::repositories::FileRepository;
use sharevault_entity::file::{CreateFile, File};
use sharevault_entity::permission::names;

/// Manages file metadata records.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<FileRepository>, resolver: Arc<PermissionResolver>) -> Self {
        Self {
            file_repo,
            resolver,
        }
    }

    /// Gets a file the subject may read.
    pub async fn get_file(&self, user_id: Uuid, file_id: Uuid) -> AppResult<File> {
        let file = self.find_existing(file_id).await?;
        self.require(file_id, user_id, names::READ).await?;
        Ok(file)
    }

    /// Lists files in a folder the subject may read.
    pub async fn list_folder_files(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<Vec<File>> {
        self.require(folder_id, user_id, names::READ).await?;
        self.file_repo.find_by_folder(folder_id).await
    }

    /// Records a new file, owned by the caller.
    ///
    /// Placing a file inside a folder requires edit on that folder.
    pub async fn create_file(
        &self,
        user_id: Uuid,
        name: &str,
        folder_id: Option<Uuid>,
        blob_id: &str,
        size_bytes: i64,
        content_type: Option<&str>,
    ) -> AppResult<File> {
        if name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if size_bytes < 0 {
            return Err(AppError::validation("File size cannot be negative"));
        }

        if let Some(folder_id) = folder_id {
            self.require(folder_id, user_id, names::EDIT).await?;
        }

        let file = self
            .file_repo
            .create(&CreateFile {
                name: name.to_string(),
                owner_id: user_id,
                folder_id,
                blob_id: blob_id.to_string(),
                size_bytes,
                content_type: content_type.map(str::to_string),
            })
            .await?;

        info!(user_id = %user_id, file_id = %file.id, "File created");
        Ok(file)
    }

    /// Transfers ownership of a file.
    ///
    /// Only the current owner may transfer; the old owner retains no
    /// implicit access afterwards, only grants that were recorded
    /// explicitly.
    pub async fn transfer_ownership(
        &self,
        actor_id: Uuid,
        file_id: Uuid,
        new_owner_id: Uuid,
    ) -> AppResult<()> {
        let file = self.find_existing(file_id).await?;
        if file.owner_id != actor_id {
            return Err(AppError::authorization(
                "Only the owner may transfer ownership",
            ));
        }

        self.file_repo.transfer_ownership(file_id, new_owner_id).await?;
        info!(
            file_id = %file_id,
            old_owner = %actor_id,
            new_owner = %new_owner_id,
            "File ownership transferred"
        );
        Ok(())
    }

    /// Deletes a file record.
    pub async fn delete_file(&self, user_id: Uuid, file_id: Uuid) -> AppResult<()> {
        self.find_existing(file_id).await?;
        self.require(file_id, user_id, names::DELETE).await?;

        self.file_repo.delete(file_id).await?;
        info!(user_id = %user_id, file_id = %file_id, "File deleted");
        Ok(())
    }

    async fn find_existing(&self, file_id: Uuid) -> AppResult<File> {
        self.file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
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

#[cfg(test)]
mod tests {
    use super::*;

    use sharevault_auth::access::InMemoryGrantStore;
    use sharevault_core::config::DatabaseConfig;
    use sharevault_core::error::ErrorKind;
    use sharevault_database::DatabasePool;

    // Validation and permission checks run before any repository
    // access, so these tests back the service with a lazy pool that
    // never reaches a server.
    fn offline_file_repo() -> Arc<FileRepository> {
        let config = DatabaseConfig {
            url: "postgres://vault@localhost:1/offline".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        };
        let db = DatabasePool::connect_lazy(&config).unwrap();
        Arc::new(FileRepository::new(db.into_pool()))
    }

    fn harness() -> (Arc<InMemoryGrantStore>, FileService) {
        let store = Arc::new(InMemoryGrantStore::new());
        let resolver = Arc::new(PermissionResolver::new(store.clone()));
        let service = FileService::new(offline_file_repo(), resolver);
        (store, service)
    }

    #[tokio::test]
    async fn test_list_folder_files_denied_without_read() {
        let (store, service) = harness();
        let folder = Uuid::new_v4();
        store.add_resource(folder, Uuid::new_v4());
        store.add_kind(names::READ);

        let stranger = Uuid::new_v4();
        let err = service
            .list_folder_files(stranger, folder)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_create_file_requires_edit_on_target_folder() {
        let (store, service) = harness();
        let folder = Uuid::new_v4();
        store.add_resource(folder, Uuid::new_v4());
        store.add_kind(names::EDIT);

        let stranger = Uuid::new_v4();
        let err = service
            .create_file(stranger, "notes.txt", Some(folder), "blob-1", 42, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_create_file_in_permitted_folder_clears_the_gate() {
        let (store, service) = harness();
        let folder = Uuid::new_v4();
        store.add_resource(folder, Uuid::new_v4());
        let edit = store.add_kind(names::EDIT);

        let writer = Uuid::new_v4();
        store.add_direct_grant(folder, writer, edit);

        // The gate passes; the call then reaches the offline repository
        // and fails there, not with an authorization error.
        let err = service
            .create_file(writer, "notes.txt", Some(folder), "blob-1", 42, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_create_file_validates_before_anything_else() {
        let (_store, service) = harness();

        let user = Uuid::new_v4();
        let blank = service
            .create_file(user, "   ", None, "blob-1", 42, None)
            .await
            .unwrap_err();
        assert_eq!(blank.kind, ErrorKind::Validation);

        let negative = service
            .create_file(user, "notes.txt", None, "blob-1", -1, None)
            .await
            .unwrap_err();
        assert_eq!(negative.kind, ErrorKind::Validation);
    }
}
