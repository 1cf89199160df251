use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod hashing;
pub mod memory;
pub mod models;
pub mod repository;
pub mod validation;

// Routing segregated by access level (Public, Authenticated).
pub mod routes;
use auth::{AuthUser, TokenService};
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use hashing::{Argon2Hasher, HasherState};
pub use memory::InMemoryRepository;
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the OpenAPI
/// document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register_user, handlers::auth::login_user,
        handlers::users::get_me, handlers::users::get_user, handlers::users::list_workers,
        handlers::users::get_worker_profile, handlers::users::upsert_worker_profile,
        handlers::users::get_employer_profile, handlers::users::upsert_employer_profile,
        handlers::profiles::create_worker_profile, handlers::profiles::create_employer_profile,
        handlers::profiles::list_worker_profiles, handlers::profiles::list_employer_profiles,
        handlers::jobs::list_jobs, handlers::jobs::post_job, handlers::jobs::recommend_jobs,
        handlers::applications::apply_to_job, handlers::applications::list_applications_for_job,
        handlers::applications::list_my_applications
    ),
    components(
        schemas(
            models::RegisterRequest, models::LoginRequest, models::AuthResponse,
            models::UserView, models::WorkerView, models::WorkerLocation, models::EmployerView,
            models::EmployerAddress, models::WorkerProfileRequest, models::EmployerProfileRequest,
            models::DelimitedList, models::PostJobRequest, models::JobView, models::Salary,
            models::ApplyRequest, models::ApplicationSummary, models::AppliedJobView,
            models::MessageResponse, error::ErrorBody,
        )
    ),
    tags(
        (name = "job-board", description = "Job Board API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container of every service the handlers depend on. Cloned per
/// request; each component is pulled out on its own through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    /// Record store: Postgres in deployments, in-memory for tests and database-less local runs.
    pub repo: RepositoryState,
    /// One-way password digest.
    pub hasher: HasherState,
    /// Issues and verifies access tokens.
    pub tokens: TokenService,
    pub config: AppConfig,
}

impl AppState {
    /// Assembles the state, deriving the token service from `config`.
    pub fn new(repo: RepositoryState, hasher: HasherState, config: AppConfig) -> Self {
        Self {
            repo,
            hasher,
            tokens: TokenService::from_config(&config),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for HasherState {
    fn from_ref(app_state: &AppState) -> HasherState {
        app_state.hasher.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Guards the authenticated router. Extracting `AuthUser` runs the whole Access Policy
/// (header, token, user lookup); a rejection short-circuits with the policy's error before
/// any handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// cors_layer
///
/// Restricts browsers to the configured frontend origins and lets them send credentials.
/// Origins that are not valid header values are skipped.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware, and registers the
/// application state.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    // Observability and correlation layers wrap every route.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span carrying method, uri and the generated `x-request-id`, so every
/// log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
