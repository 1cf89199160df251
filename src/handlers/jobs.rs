use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    auth::{AuthUser, Role},
    error::ApiResult,
    models::{JobView, PostJobRequest},
};

/// list_jobs
///
/// [Public Route] Every job in the catalog, in store order. No pagination.
#[utoipa::path(
    get,
    path = "/jobs",
    responses((status = 200, description = "All jobs", body = [JobView]))
)]
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<JobView>>> {
    let jobs = state.repo.list_jobs().await?;
    Ok(Json(jobs.into_iter().map(JobView::from).collect()))
}

/// post_job
///
/// [Authenticated Route, employer role] Publishes a job owned by the caller.
///
/// *Ownership*: `employer_id` is always the caller's id. The request schema has no such
/// field, so a client-supplied value never reaches the store.
///
/// The body is validated before the role gate, so malformed input is reported as such even
/// for callers without an Employer profile.
#[utoipa::path(
    post,
    path = "/jobs/post",
    request_body = PostJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobView),
        (status = 400, description = "Missing title or malformed deadline", body = crate::error::ErrorBody),
        (status = 403, description = "Caller has no Employer profile", body = crate::error::ErrorBody)
    )
)]
pub async fn post_job(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PostJobRequest>,
) -> ApiResult<(StatusCode, Json<JobView>)> {
    let new_job = payload.into_new_job()?;
    caller.require(Role::Employer)?;

    let job = state.repo.create_job(caller.id, new_job).await?;
    tracing::info!(job_id = job.id, employer_id = caller.id, "job posted");

    Ok((StatusCode::CREATED, Json(job.into())))
}

/// recommend_jobs
///
/// [Authenticated Route] Placeholder recommendation feed: currently the whole catalog.
#[utoipa::path(
    get,
    path = "/jobs/recommendations",
    responses((status = 200, description = "Recommended jobs", body = [JobView]))
)]
pub async fn recommend_jobs(
    _caller: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<JobView>>> {
    list_jobs(State(state)).await
}
