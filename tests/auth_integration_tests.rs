use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
    response::IntoResponse,
};
use job_board::{
    AppConfig, AppState, ApiError,
    auth::{AuthUser, Claims, TokenService},
    hashing::{Argon2Hasher, HasherState},
    models::{
        Application, AppliedJob, Employer, EmployerPatch, Identity, Job, NewEmployer, NewJob,
        NewUser, NewWorker, User, UserAccount, Worker, WorkerPatch,
    },
    repository::{RepoResult, Repository},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;

const TEST_JWT_SECRET: &str = "auth-test-secret";
const TEST_USER_ID: i64 = 7;

// --- Mock Repository for Auth Logic ---

/// Only `resolve_identity` is consulted by the extractor; everything else is unreachable
/// from these tests.
#[derive(Default)]
struct MockAuthRepo {
    identity_to_return: Option<Identity>,
}

#[async_trait]
impl Repository for MockAuthRepo {
    async fn resolve_identity(&self, _id: i64) -> RepoResult<Option<Identity>> {
        Ok(self.identity_to_return)
    }

    async fn create_user(&self, _user: NewUser) -> RepoResult<User> {
        unimplemented!()
    }
    async fn find_user_by_email(&self, _email: &str) -> RepoResult<Option<User>> {
        unimplemented!()
    }
    async fn get_user(&self, _id: i64) -> RepoResult<Option<User>> {
        unimplemented!()
    }
    async fn get_account(&self, _id: i64) -> RepoResult<Option<UserAccount>> {
        unimplemented!()
    }
    async fn list_worker_accounts(&self) -> RepoResult<Vec<UserAccount>> {
        unimplemented!()
    }
    async fn create_worker(&self, _user_id: i64, _worker: NewWorker) -> RepoResult<Worker> {
        unimplemented!()
    }
    async fn get_worker_by_user(&self, _user_id: i64) -> RepoResult<Option<Worker>> {
        unimplemented!()
    }
    async fn update_worker(&self, _user_id: i64, _patch: WorkerPatch) -> RepoResult<Option<Worker>> {
        unimplemented!()
    }
    async fn list_workers(&self) -> RepoResult<Vec<Worker>> {
        unimplemented!()
    }
    async fn create_employer(&self, _user_id: i64, _employer: NewEmployer) -> RepoResult<Employer> {
        unimplemented!()
    }
    async fn get_employer_by_user(&self, _user_id: i64) -> RepoResult<Option<Employer>> {
        unimplemented!()
    }
    async fn update_employer(
        &self,
        _user_id: i64,
        _patch: EmployerPatch,
    ) -> RepoResult<Option<Employer>> {
        unimplemented!()
    }
    async fn list_employers(&self) -> RepoResult<Vec<Employer>> {
        unimplemented!()
    }
    async fn list_jobs(&self) -> RepoResult<Vec<Job>> {
        unimplemented!()
    }
    async fn create_job(&self, _employer_id: i64, _job: NewJob) -> RepoResult<Job> {
        unimplemented!()
    }
    async fn get_job(&self, _id: i64) -> RepoResult<Option<Job>> {
        unimplemented!()
    }
    async fn create_application(&self, _worker_id: i64, _job_id: i64) -> RepoResult<Application> {
        unimplemented!()
    }
    async fn list_applications_for_job(&self, _job_id: i64) -> RepoResult<Vec<Application>> {
        unimplemented!()
    }
    async fn list_applications_for_worker(&self, _worker_id: i64) -> RepoResult<Vec<AppliedJob>> {
        unimplemented!()
    }
}

// --- Helpers ---

/// Signs claims with the test secret. `exp_offset` is relative to now, in seconds.
fn create_token(user_id: i64, exp_offset: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
        jti: uuid::Uuid::new_v4(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

fn create_app_state(repo: MockAuthRepo) -> AppState {
    let config = AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    };
    let hasher: HasherState = Arc::new(Argon2Hasher::default());
    AppState::new(Arc::new(repo), hasher, config)
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(token: &str) -> Parts {
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    parts
}

fn employer_identity() -> Identity {
    Identity {
        user_id: TEST_USER_ID,
        has_worker_profile: false,
        has_employer_profile: true,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let app_state = create_app_state(MockAuthRepo {
        identity_to_return: Some(employer_identity()),
    });
    let mut parts = with_bearer(&create_token(TEST_USER_ID, 3600));

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert_eq!(user.id, TEST_USER_ID);
    assert!(user.is_employer);
    assert!(!user.is_worker);
}

#[tokio::test]
async fn test_auth_accepts_token_issued_by_token_service() {
    let app_state = create_app_state(MockAuthRepo {
        identity_to_return: Some(employer_identity()),
    });
    let token = TokenService::new(TEST_JWT_SECRET, chrono::Duration::minutes(5))
        .issue(TEST_USER_ID)
        .unwrap();
    let mut parts = with_bearer(&token);

    assert!(
        AuthUser::from_request_parts(&mut parts, &app_state)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(MockAuthRepo::default());
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let err = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated(_)));
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_non_bearer_scheme() {
    let app_state = create_app_state(MockAuthRepo::default());
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Basic dXNlcjpwYXNz"),
    );

    let err = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    let app_state = create_app_state(MockAuthRepo {
        identity_to_return: Some(employer_identity()),
    });
    let mut parts = with_bearer(&create_token(TEST_USER_ID, -60));

    let err = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::CredentialExpired));
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_foreign_signature() {
    let app_state = create_app_state(MockAuthRepo {
        identity_to_return: Some(employer_identity()),
    });
    let token = TokenService::new("someone-elses-secret", chrono::Duration::minutes(5))
        .issue(TEST_USER_ID)
        .unwrap();
    let mut parts = with_bearer(&token);

    let err = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidCredential(_)));
    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_auth_failure_when_user_no_longer_exists() {
    let app_state = create_app_state(MockAuthRepo {
        identity_to_return: None,
    });
    let mut parts = with_bearer(&create_token(TEST_USER_ID, 3600));

    let err = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated(ref msg) if msg == "User not found"));
}
