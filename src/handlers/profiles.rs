use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    models::{
        EmployerProfileRequest, EmployerView, MessageResponse, WorkerProfileRequest, WorkerView,
    },
    repository::{EMPLOYER_EXISTS, WORKER_EXISTS},
};

/// create_worker_profile
///
/// [Authenticated Route] Attaches a Worker profile to the caller. A second profile for the
/// same user is a conflict, reported before the body is validated.
#[utoipa::path(
    post,
    path = "/profiles/profile/worker",
    request_body = WorkerProfileRequest,
    responses(
        (status = 201, description = "Worker profile created", body = MessageResponse),
        (status = 400, description = "Missing fields or profile already exists", body = crate::error::ErrorBody)
    )
)]
pub async fn create_worker_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<WorkerProfileRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    if state.repo.get_worker_by_user(id).await?.is_some() {
        return Err(ApiError::conflict(WORKER_EXISTS));
    }

    state
        .repo
        .create_worker(id, payload.into_new_worker()?)
        .await?;
    tracing::info!(user_id = id, "worker profile created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Worker profile created")),
    ))
}

/// create_employer_profile
///
/// [Authenticated Route] Attaches an Employer profile to the caller, which grants the
/// employer role.
#[utoipa::path(
    post,
    path = "/profiles/profile/employer",
    request_body = EmployerProfileRequest,
    responses(
        (status = 201, description = "Employer profile created", body = MessageResponse),
        (status = 400, description = "Missing fields or profile already exists", body = crate::error::ErrorBody)
    )
)]
pub async fn create_employer_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<EmployerProfileRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    if state.repo.get_employer_by_user(id).await?.is_some() {
        return Err(ApiError::conflict(EMPLOYER_EXISTS));
    }

    state
        .repo
        .create_employer(id, payload.into_new_employer()?)
        .await?;
    tracing::info!(user_id = id, "employer profile created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Employer profile created")),
    ))
}

#[utoipa::path(
    get,
    path = "/profiles/workers",
    responses((status = 200, description = "All Worker profiles", body = [WorkerView]))
)]
pub async fn list_worker_profiles(
    _caller: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<WorkerView>>> {
    let workers = state.repo.list_workers().await?;
    Ok(Json(workers.into_iter().map(WorkerView::from).collect()))
}

#[utoipa::path(
    get,
    path = "/profiles/employers",
    responses((status = 200, description = "All Employer profiles", body = [EmployerView]))
)]
pub async fn list_employer_profiles(
    _caller: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EmployerView>>> {
    let employers = state.repo.list_employers().await?;
    Ok(Json(employers.into_iter().map(EmployerView::from).collect()))
}
