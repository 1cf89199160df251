//! Request handlers, one module per workflow component.
//!
//! Every handler returns `ApiResult`, so failures leave through `ApiError`'s `IntoResponse`
//! as `{"error": "<message>"}` with the matching status code. Authenticated handlers take
//! `AuthUser` as an argument and treat its `id` as the owner of everything they write.

pub mod applications;
pub mod auth;
pub mod jobs;
pub mod profiles;
pub mod users;

pub use applications::{apply_to_job, list_applications_for_job, list_my_applications};
pub use auth::{login_user, register_user};
pub use jobs::{list_jobs, post_job, recommend_jobs};
pub use profiles::{
    create_employer_profile, create_worker_profile, list_employer_profiles, list_worker_profiles,
};
pub use users::{
    get_employer_profile, get_me, get_user, get_worker_profile, list_workers,
    upsert_employer_profile, upsert_worker_profile,
};
