//! File metadata repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use sharevault_core::error::{AppError, ErrorKind};
use sharevault_core::result::AppResult;
use sharevault_entity::file::{CreateFile, File};

/// Repository for file metadata operations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// List files in a folder.
    pub async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = $1 ORDER BY name")
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list folder files", e)
            })
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (name, owner_id, folder_id, blob_id, size_bytes, content_type) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.owner_id)
        .bind(data.folder_id)
        .bind(&data.blob_id)
        .bind(data.size_bytes)
        .bind(&data.content_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    /// Transfer ownership of a file to another user.
    pub async fn transfer_ownership(&self, file_id: Uuid, new_owner: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE files SET owner_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(file_id)
                .bind(new_owner)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to transfer ownership", e)
                })?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete a file record. Returns `true` if a row was deleted.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() == 1)
    }
}
