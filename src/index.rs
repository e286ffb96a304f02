use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::FileRecord;

/// Metadata index over file records, keyed by (file_space, file_id).
///
/// All queries are parameterized; the file space and file id are only ever
/// bound as arguments, never interpolated into SQL text.
#[derive(Clone)]
pub struct FileIndex {
    db: Database,
}

impl FileIndex {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Idempotent creation of the backing table and index
    pub async fn ensure_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS files (
                file_id TEXT NOT NULL,
                file_space TEXT NOT NULL,
                file_name TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (file_space, file_id)
            )
            "#,
        )
        .execute(self.db.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_files_file_space ON files(file_space)")
            .execute(self.db.pool())
            .await?;

        tracing::info!("File index ready");
        Ok(())
    }

    /// Check if a record exists for (file_space, file_id)
    pub async fn exists(&self, file_space: &str, file_id: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM files WHERE file_space = ? AND file_id = ?",
        )
        .bind(file_space)
        .bind(file_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count.0 > 0)
    }

    /// Insert a new record; `created_at` is assigned by the store.
    ///
    /// The exists check makes the uniqueness precondition explicit rather
    /// than relying on the primary key alone.
    pub async fn insert(&self, file_space: &str, file_id: &str, file_name: &str) -> Result<()> {
        if self.exists(file_space, file_id).await? {
            return Err(AppError::DuplicateKey(format!(
                "Record already exists for file {}",
                file_id
            )));
        }

        sqlx::query("INSERT INTO files (file_id, file_space, file_name) VALUES (?, ?, ?)")
            .bind(file_id)
            .bind(file_space)
            .bind(file_name)
            .execute(self.db.pool())
            .await?;

        tracing::debug!("Inserted record for file {} in space {}", file_id, file_space);
        Ok(())
    }

    /// All records in a file space, in arbitrary order
    pub async fn query_by_space(&self, file_space: &str) -> Result<Vec<FileRecord>> {
        let records: Vec<FileRecord> =
            sqlx::query_as("SELECT * FROM files WHERE file_space = ?")
                .bind(file_space)
                .fetch_all(self.db.pool())
                .await?;

        Ok(records)
    }

    /// Records matching (file_space, file_id); 0 or 1 expected
    pub async fn query_by_space_and_id(
        &self,
        file_space: &str,
        file_id: &str,
    ) -> Result<Vec<FileRecord>> {
        let records: Vec<FileRecord> =
            sqlx::query_as("SELECT * FROM files WHERE file_space = ? AND file_id = ?")
                .bind(file_space)
                .bind(file_id)
                .fetch_all(self.db.pool())
                .await?;

        Ok(records)
    }

    /// Remove a record; fails with NotFound if it no longer exists
    pub async fn delete(&self, record: &FileRecord) -> Result<()> {
        let result = sqlx::query("DELETE FROM files WHERE file_space = ? AND file_id = ?")
            .bind(&record.file_space)
            .bind(&record.file_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Record not found for file {}",
                record.file_id
            )));
        }

        tracing::debug!(
            "Deleted record for file {} in space {}",
            record.file_id,
            record.file_space
        );
        Ok(())
    }
}
