use bytes::Bytes;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::index::FileIndex;
use crate::models::CloudFile;
use crate::storage::ObjectStore;

/// Download links handed out by list are valid for 24 hours
pub const LINK_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// File gateway.
///
/// Keeps the blob store and the metadata index in agreement across upload,
/// list, and delete. Holds no state of its own; every call stands alone.
pub struct FileService;

impl FileService {
    /// Upload a file into a file space, returning the generated file id.
    ///
    /// The blob is written before the record is inserted: a failed write
    /// leaves no metadata behind, so a record can never point at a blob
    /// that was never stored. If the insert fails after a successful
    /// write, the blob is orphaned and stays that way; there is no
    /// rollback of the blob write.
    pub async fn upload(
        index: &FileIndex,
        store: &dyn ObjectStore,
        file_space: &str,
        file_name: &str,
        data: Bytes,
    ) -> Result<String> {
        if file_space.is_empty() {
            return Err(AppError::BadRequest("File space must not be empty".to_string()));
        }
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
            return Err(AppError::BadRequest("Invalid file name".to_string()));
        }

        let file_id = Uuid::new_v4().to_string();

        store.put(&file_id, data).await?;

        if let Err(e) = index.insert(file_space, &file_id, file_name).await {
            tracing::warn!(
                "Record insert failed after blob write, blob {} is orphaned: {}",
                file_id,
                e
            );
            return Err(e);
        }

        tracing::info!("Uploaded file {} ({}) to space {}", file_id, file_name, file_space);
        Ok(file_id)
    }

    /// List all files in a file space with fresh download links.
    ///
    /// Records whose blob is missing are still returned, with an empty
    /// link; surfacing a dead entry beats silently hiding it.
    pub async fn list(
        index: &FileIndex,
        store: &dyn ObjectStore,
        file_space: &str,
    ) -> Result<Vec<CloudFile>> {
        let records = index.query_by_space(file_space).await?;

        let mut files = Vec::with_capacity(records.len());
        for record in records {
            let link = match store.read_link(&record.file_id, LINK_TTL).await {
                Ok(Some(url)) => url,
                Ok(None) => {
                    tracing::warn!("No blob behind record {}, returning dead link", record.file_id);
                    String::new()
                }
                Err(e) => {
                    tracing::warn!("Link generation failed for {}: {}", record.file_id, e);
                    String::new()
                }
            };

            files.push(CloudFile {
                name: record.file_name,
                file_space: record.file_space,
                file_id: record.file_id,
                created_at: record.created_at,
                link,
            });
        }

        Ok(files)
    }

    /// Delete a file from a file space.
    ///
    /// The blob goes first: a crash between the two steps leaves a record
    /// with a dead link, which list already tolerates, rather than an
    /// unreachable blob holding storage. Deleting an id that never
    /// existed succeeds as a no-op.
    pub async fn delete(
        index: &FileIndex,
        store: &dyn ObjectStore,
        file_space: &str,
        file_id: &str,
    ) -> Result<()> {
        store.delete_if_exists(file_id).await?;

        let records = index.query_by_space_and_id(file_space, file_id).await?;
        for record in records {
            match index.delete(&record).await {
                Ok(()) => {}
                Err(AppError::NotFound(_)) => {
                    tracing::debug!("Record for {} already removed", record.file_id);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Deleted file {} from space {}", file_id, file_space);
        Ok(())
    }
}
