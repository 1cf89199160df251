use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Every route here sits behind the `auth_middleware` layer, so each handler receives a
/// resolved `AuthUser`. Role checks (employer-only actions) happen inside the handlers.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Job Catalog ---
        // POST /jobs/post
        // Employer role. The job is always owned by the caller.
        .route("/jobs/post", post(handlers::post_job))
        .route("/jobs/recommendations", get(handlers::recommend_jobs))
        // --- Application Ledger ---
        // POST /applications/apply
        // One application per (caller, job); a repeat is a conflict.
        .route("/applications/apply", post(handlers::apply_to_job))
        .route("/applications/applied", get(handlers::list_my_applications))
        // --- Users ---
        // Static segments take precedence over `/users/{id}`.
        .route("/users/me", get(handlers::get_me))
        // GET /users/workers
        // Employer role.
        .route("/users/workers", get(handlers::list_workers))
        .route("/users/{id}", get(handlers::get_user))
        // GET/POST /users/{worker,employer}/profile
        // Read, or create-else-patch, the caller's own profile.
        .route(
            "/users/worker/profile",
            get(handlers::get_worker_profile).post(handlers::upsert_worker_profile),
        )
        .route(
            "/users/employer/profile",
            get(handlers::get_employer_profile).post(handlers::upsert_employer_profile),
        )
        // --- Profile Registry ---
        .route(
            "/profiles/profile/worker",
            post(handlers::create_worker_profile),
        )
        .route(
            "/profiles/profile/employer",
            post(handlers::create_employer_profile),
        )
        .route("/profiles/workers", get(handlers::list_worker_profiles))
        .route("/profiles/employers", get(handlers::list_employer_profiles))
}
