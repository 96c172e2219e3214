//! Folder repository implementation.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use sharevault_core::error::{AppError, ErrorKind};
use sharevault_core::result::AppResult;
use sharevault_entity::folder::{CreateFolder, Folder};

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List direct children of a folder.
    pub async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = $1 ORDER BY name")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list child folders", e)
            })
    }

    /// Fetch the id → parent_id map for every folder.
    ///
    /// One statement, so the reparent cycle check walks a single
    /// consistent snapshot of the tree.
    pub async fn parent_links(&self) -> AppResult<HashMap<Uuid, Option<Uuid>>> {
        let rows: Vec<(Uuid, Option<Uuid>)> =
            sqlx::query_as("SELECT id, parent_id FROM folders")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load folder links", e)
                })?;
        Ok(rows.into_iter().collect())
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, owner_id, parent_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.owner_id)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    /// Rename a folder.
    pub async fn rename(&self, id: Uuid, name: &str) -> AppResult<()> {
        sqlx::query("UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename folder", e))?;
        Ok(())
    }

    /// Reparent a folder. Cycle validation happens in the service layer
    /// before this is called.
    pub async fn set_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> AppResult<()> {
        sqlx::query("UPDATE folders SET parent_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(parent_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to reparent folder", e)
            })?;
        Ok(())
    }

    /// Delete a folder. Returns `true` if a row was deleted.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() == 1)
    }
}
