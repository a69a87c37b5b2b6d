use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::BookmarkService;
use crate::state::AppState;

/// GET /bookmarks - the caller's bookmarks with joined job + owner fields
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let service = BookmarkService::new(state.pool.clone());
    let bookmarks = service.list(identity.id).await.map_err(ApiError::from)?;
    Ok(Json(bookmarks))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmark {
    pub job_id: Option<String>,
}

/// POST /bookmarks - bookmark a job; duplicate pairs are rejected
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Json(body): Json<CreateBookmark>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = parse_job_id(body.job_id.as_deref())?;

    let service = BookmarkService::new(state.pool.clone());
    let bookmark = service.add(identity.id, job_id).await.map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBookmark {
    pub job_id: Option<String>,
}

/// DELETE /bookmarks?jobId= - remove the caller's bookmark for a job
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Query(query): Query<RemoveBookmark>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = parse_job_id(query.job_id.as_deref())?;

    let service = BookmarkService::new(state.pool.clone());
    service.remove(identity.id, job_id).await.map_err(ApiError::from)?;
    Ok(Json(json!({ "message": "Bookmark removed" })))
}

fn parse_job_id(raw: Option<&str>) -> Result<Uuid, ApiError> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or_else(|| ApiError::bad_request("Job ID is required"))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid job id"))
}
