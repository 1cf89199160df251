use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    auth::{AuthUser, Role},
    error::{ApiError, ApiResult},
    models::{
        EmployerProfileRequest, EmployerView, UserView, WorkerProfileRequest, WorkerView,
    },
    repository::RepositoryError,
};

/// get_me
///
/// [Authenticated Route] The caller's account with whichever role profiles it owns.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Account", body = UserView),
        (status = 404, description = "User not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<UserView>> {
    let account = state
        .repo
        .get_account(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = UserView),
        (status = 404, description = "User not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_user(
    _caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserView>> {
    let account = state
        .repo
        .get_account(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(account.into()))
}

/// list_workers
///
/// [Authenticated Route, employer role] Every account that owns a Worker profile.
#[utoipa::path(
    get,
    path = "/users/workers",
    responses(
        (status = 200, description = "Worker accounts", body = [UserView]),
        (status = 403, description = "Caller is not an employer", body = crate::error::ErrorBody)
    )
)]
pub async fn list_workers(
    caller: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserView>>> {
    caller.require(Role::Employer)?;
    let accounts = state.repo.list_worker_accounts().await?;
    Ok(Json(accounts.into_iter().map(UserView::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/worker/profile",
    responses(
        (status = 200, description = "Worker profile", body = WorkerView),
        (status = 404, description = "Worker profile not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_worker_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<WorkerView>> {
    let worker = state
        .repo
        .get_worker_by_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Worker profile not found"))?;
    Ok(Json(worker.into()))
}

/// upsert_worker_profile
///
/// [Authenticated Route] Creates the caller's Worker profile when absent (creation rules
/// apply), otherwise patches only the fields present in the body.
///
/// If another request creates the profile between the lookup and the insert, the unique
/// constraint reports a conflict and this request falls back to patching it.
#[utoipa::path(
    post,
    path = "/users/worker/profile",
    request_body = WorkerProfileRequest,
    responses(
        (status = 200, description = "Worker profile", body = WorkerView),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorBody)
    )
)]
pub async fn upsert_worker_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<WorkerProfileRequest>,
) -> ApiResult<Json<WorkerView>> {
    if state.repo.get_worker_by_user(id).await?.is_none() {
        match state
            .repo
            .create_worker(id, payload.clone().into_new_worker()?)
            .await
        {
            Ok(worker) => {
                tracing::info!(user_id = id, "worker profile created");
                return Ok(Json(worker.into()));
            }
            Err(RepositoryError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let worker = state
        .repo
        .update_worker(id, payload.into_patch())
        .await?
        .ok_or_else(|| ApiError::not_found("Worker profile not found"))?;
    Ok(Json(worker.into()))
}

#[utoipa::path(
    get,
    path = "/users/employer/profile",
    responses(
        (status = 200, description = "Employer profile", body = EmployerView),
        (status = 404, description = "Employer profile not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_employer_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<EmployerView>> {
    let employer = state
        .repo
        .get_employer_by_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employer profile not found"))?;
    Ok(Json(employer.into()))
}

/// upsert_employer_profile
///
/// [Authenticated Route] Employer counterpart of `upsert_worker_profile`.
#[utoipa::path(
    post,
    path = "/users/employer/profile",
    request_body = EmployerProfileRequest,
    responses(
        (status = 200, description = "Employer profile", body = EmployerView),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorBody)
    )
)]
pub async fn upsert_employer_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<EmployerProfileRequest>,
) -> ApiResult<Json<EmployerView>> {
    if state.repo.get_employer_by_user(id).await?.is_none() {
        match state
            .repo
            .create_employer(id, payload.clone().into_new_employer()?)
            .await
        {
            Ok(employer) => {
                tracing::info!(user_id = id, "employer profile created");
                return Ok(Json(employer.into()));
            }
            Err(RepositoryError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let employer = state
        .repo
        .update_employer(id, payload.into_patch())
        .await?
        .ok_or_else(|| ApiError::not_found("Employer profile not found"))?;
    Ok(Json(employer.into()))
}
