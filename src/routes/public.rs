use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a credential: the liveness probe, the credential gateway
/// (register and login) and the read-only catalog views.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers and container health checks.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // Creates a user and returns a fresh access token.
        .route("/auth/register", post(handlers::register_user))
        // POST /auth/login
        .route("/auth/login", post(handlers::login_user))
        // GET /jobs and /jobs/
        // The whole job catalog. Both spellings are served; the frontend uses the trailing slash.
        .route("/jobs", get(handlers::list_jobs))
        .route("/jobs/", get(handlers::list_jobs))
        // GET /applications/job/{job_id}
        .route(
            "/applications/job/{job_id}",
            get(handlers::list_applications_for_job),
        )
}
