use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};

use crate::error::{AppError, Result};
use crate::models::LinkQuery;
use crate::AppState;

/// Fulfill a signed download link
/// GET /objects/:id?sign-time=start;end&signature=hex
pub async fn download_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LinkQuery>,
) -> Result<Response> {
    let object_path = format!("/objects/{}", id);
    if !state
        .signer
        .verify(&object_path, &query.sign_time, &query.signature)
    {
        return Err(AppError::Forbidden(
            "Link signature invalid or expired".to_string(),
        ));
    }

    let data = state.store.get(&id).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", id),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
