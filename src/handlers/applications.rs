use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    models::{ApplicationSummary, ApplyRequest, AppliedJobView, MessageResponse},
    repository::JOB_NOT_FOUND,
};

/// apply_to_job
///
/// [Authenticated Route] Records the caller's application to a job.
///
/// *Uniqueness*: the pair (caller, job) may exist once. The store decides, so of two
/// concurrent applies for the same pair exactly one succeeds and the other gets a conflict.
#[utoipa::path(
    post,
    path = "/applications/apply",
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application recorded", body = MessageResponse),
        (status = 400, description = "Missing job_id or already applied", body = crate::error::ErrorBody),
        (status = 404, description = "Job not found", body = crate::error::ErrorBody)
    )
)]
pub async fn apply_to_job(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let job_id = payload
        .job_id
        .ok_or_else(|| ApiError::validation("Missing required field: job_id"))?;

    if state.repo.get_job(job_id).await?.is_none() {
        return Err(ApiError::not_found(JOB_NOT_FOUND));
    }

    let application = state.repo.create_application(id, job_id).await?;
    tracing::info!(
        application_id = application.id,
        user_id = id,
        job_id,
        "application recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Applied to job successfully!")),
    ))
}

/// list_applications_for_job
///
/// [Public Route] Applications received by one job. An unknown job simply has none.
#[utoipa::path(
    get,
    path = "/applications/job/{job_id}",
    params(("job_id" = i64, Path, description = "Job ID")),
    responses((status = 200, description = "Applications for the job", body = [ApplicationSummary]))
)]
pub async fn list_applications_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> ApiResult<Json<Vec<ApplicationSummary>>> {
    let applications = state.repo.list_applications_for_job(job_id).await?;
    Ok(Json(
        applications
            .into_iter()
            .map(ApplicationSummary::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/applications/applied",
    responses((status = 200, description = "The caller's applications with job details", body = [AppliedJobView]))
)]
pub async fn list_my_applications(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AppliedJobView>>> {
    let rows = state.repo.list_applications_for_worker(id).await?;
    Ok(Json(rows.into_iter().map(AppliedJobView::from).collect()))
}
