use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{can_modify, AuthUser};
use crate::error::ApiError;
use crate::middleware::MaybeAuthUser;
use crate::query::{JobSearch, JobSort, Page};
use crate::services::JobService;
use crate::state::AppState;
use crate::validation::JobPayload;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub job_type: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<i64>,
}

/// GET /jobs - paginated public listing, active jobs only
pub async fn list(
    State(state): State<AppState>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = JobService::new(state.pool.clone());

    let page = Page::new(query.page.unwrap_or(1), state.config.listing.page_size);
    let search = JobSearch {
        // Bound verbatim; a literal outside the supported set matches nothing
        job_type: query.job_type,
        sort: JobSort::parse(query.sort_by.as_deref()),
        page: Some(page),
        ..Default::default()
    };

    let (jobs, total) = service.list(&search).await.map_err(ApiError::from)?;

    let mut body = json!({
        "jobs": jobs,
        "total": total,
        "totalPages": page.total_pages(total),
        "page": page.number,
    });

    // Best-effort bookmark annotation for signed-in callers
    if let Some(user) = identity {
        let ids = service.bookmarked_ids(user.id).await;
        body["bookmarkedJobIds"] = json!(ids);
    }

    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub remote: Option<String>,
}

/// GET /jobs/search - filtered listing, no pagination
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = JobService::new(state.pool.clone());

    let search = JobSearch {
        query: query.q,
        job_type: query.job_type,
        location: query.location,
        remote_only: query.remote.as_deref() == Some("true"),
        ..Default::default()
    };

    let (jobs, _) = service.list(&search).await.map_err(ApiError::from)?;
    Ok(Json(jobs))
}

/// GET /jobs/mine - the caller's own postings, expired included
pub async fn mine(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let service = JobService::new(state.pool.clone());

    let search = JobSearch {
        owner: Some(identity.id),
        active_only: false,
        ..Default::default()
    };

    let (jobs, _) = service.list(&search).await.map_err(ApiError::from)?;
    Ok(Json(jobs))
}

/// GET /jobs/:id - single job with owner fields and a capability flag.
/// Expired jobs are still readable here.
pub async fn get_one(
    State(state): State<AppState>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_job_id(&id)?;
    let service = JobService::new(state.pool.clone());

    let job = service.get(id).await.map_err(ApiError::from)?;

    // Not an access restriction: the flag tells the client whether to show
    // edit/delete affordances.
    let editable = identity
        .map(|user| can_modify(&user, job.job.user_id))
        .unwrap_or(false);

    let mut body = serde_json::to_value(&job)
        .map_err(|e| ApiError::internal(format!("serialize job: {}", e)))?;
    body["canModify"] = json!(editable);

    Ok(Json(body))
}

/// POST /jobs - authenticated, payment-gated create
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let service = JobService::new(state.pool.clone());

    let job = service
        .create(
            &identity,
            &payload,
            state.payments.as_ref(),
            state.config.payments.posting_fee_cents,
        )
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /jobs/:id - authenticated, owner-or-admin, full payload
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_job_id(&id)?;
    let service = JobService::new(state.pool.clone());

    let job = service.update(&identity, id, &payload).await.map_err(ApiError::from)?;
    Ok(Json(job))
}

/// DELETE /jobs/:id - authenticated, owner-or-admin, hard delete
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_job_id(&id)?;
    let service = JobService::new(state.pool.clone());

    service.delete(&identity, id).await.map_err(ApiError::from)?;
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

fn parse_job_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid job id"))
}
