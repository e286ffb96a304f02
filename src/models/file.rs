use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// File metadata record
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileRecord {
    pub file_id: String,
    pub file_space: String,
    pub file_name: String,
    pub created_at: String,
}

/// Listing entry combining a record with a freshly minted download link.
/// The link is empty when the blob behind the record is missing.
#[derive(Debug, Clone, Serialize)]
pub struct CloudFile {
    pub name: String,
    pub file_space: String,
    pub file_id: String,
    pub created_at: String,
    pub link: String,
}

/// Upload result
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: String,
}

/// File space query parameters
#[derive(Debug, Deserialize)]
pub struct SpaceQuery {
    pub space: String,
}

/// Signed link query parameters
#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    #[serde(rename = "sign-time")]
    pub sign_time: String,
    pub signature: String,
}
