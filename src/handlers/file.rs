use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use bytes::Bytes;

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{CloudFile, SpaceQuery, UploadResponse};
use crate::services::FileService;
use crate::AppState;

/// List files in a file space
/// GET /api/v1/files?space=xxx
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<SpaceQuery>,
) -> Result<Json<ApiResponse<Vec<CloudFile>>>> {
    let files = FileService::list(&state.index, state.store.as_ref(), &query.space).await?;
    Ok(Json(ApiResponse::success(files)))
}

/// Upload a file
/// POST /api/v1/files/upload (multipart: space, file)
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>> {
    let mut file_space: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to process multipart: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "space" => {
                let text = field.text().await.unwrap_or_default();
                if !text.is_empty() {
                    file_space = Some(text);
                }
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                data = Some(field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file payload: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let file_space =
        file_space.ok_or_else(|| AppError::BadRequest("No file space provided".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("No file name provided".to_string()))?;
    let data = data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let file_id =
        FileService::upload(&state.index, state.store.as_ref(), &file_space, &file_name, data)
            .await?;

    Ok(Json(ApiResponse::success(UploadResponse { file_id })))
}

/// Delete a file
/// DELETE /api/v1/files/:id?space=xxx
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SpaceQuery>,
) -> Result<Json<ApiResponse<()>>> {
    FileService::delete(&state.index, state.store.as_ref(), &query.space, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("File deleted")))
}
