use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    hashing::HasherState,
    models::{AuthResponse, LoginRequest, NewUser, RegisterRequest, UserAccount, UserView},
    repository::EMAIL_TAKEN,
    validation,
};

/// Runs the CPU-bound digest on the blocking pool.
async fn hash_password(hasher: HasherState, password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::internal(format!("hashing task failed: {e}")))?
}

async fn verify_password(hasher: HasherState, password: String, digest: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
        .await
        .map_err(|e| ApiError::internal(format!("verification task failed: {e}")))
}

/// register_user
///
/// [Public Route] Creates a user and signs them in.
///
/// *Flow*: required fields → email format → email uniqueness → password policy → digest →
/// insert → fresh credential. The storage layer re-checks email uniqueness, so two racing
/// registrations for one address still produce a single account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Validation error or email already registered", body = crate::error::ErrorBody)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let RegisterRequest {
        name,
        email,
        password,
        location,
        skills,
        company_name,
    } = payload;

    validation::require_fields(&[
        ("name", name.is_some()),
        ("email", email.is_some()),
        ("password", password.is_some()),
    ])?;
    let (name, email, password) = (
        name.unwrap_or_default(),
        email.unwrap_or_default(),
        password.unwrap_or_default(),
    );

    validation::validate_email(&email)?;

    if state.repo.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(EMAIL_TAKEN));
    }

    validation::validate_password(&password)?;

    let password_hash = hash_password(state.hasher.clone(), password).await?;

    let user = state
        .repo
        .create_user(NewUser {
            name,
            email,
            password_hash,
            location,
            skills,
            company_name,
        })
        .await?;

    let access_token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "user registered");

    let view = UserView::from(UserAccount {
        user,
        worker: None,
        employer: None,
    });

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registered successfully".to_string(),
            access_token,
            user: view,
        }),
    ))
}

/// login_user
///
/// [Public Route] Exchanges email and password for a fresh credential.
///
/// *Security*: an unknown email and a wrong password produce the same `Auth` error so the
/// endpoint cannot be used to probe which addresses are registered.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorBody)
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let present = |field: Option<String>| field.filter(|value| !value.is_empty());
    let (Some(email), Some(password)) = (present(payload.email), present(payload.password)) else {
        return Err(ApiError::validation("Missing email or password"));
    };

    let user = state
        .repo
        .find_user_by_email(&email)
        .await?
        .ok_or(ApiError::Auth)?;

    if !verify_password(state.hasher.clone(), password, user.password_hash.clone()).await? {
        tracing::info!(user_id = user.id, "login rejected");
        return Err(ApiError::Auth);
    }

    let access_token = state.tokens.issue(user.id)?;
    let account = state
        .repo
        .get_account(user.id)
        .await?
        .ok_or(ApiError::Auth)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        access_token,
        user: account.into(),
    }))
}
