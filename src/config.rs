use std::env;

/// Origins of the web frontend during development (Vite and the legacy dev server).
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:5173";

const LOCAL_JWT_SECRET: &str = "job-board-local-secret-value";

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and pulled
/// into handlers and extractors through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` in local mode runs against the in-memory store.
    pub db_url: Option<String>,
    // Runtime environment marker.
    pub env: Env,
    // HS256 secret used to sign and verify access tokens.
    pub jwt_secret: String,
    // Lifetime of an issued access token, in minutes.
    pub jwt_ttl_minutes: i64,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Allowed CORS origins.
    pub cors_origins: Vec<String>,
}

/// Env
///
/// Defines the runtime context. Production demands every secret explicitly and logs as JSON.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration used for test state scaffolding.
    fn default() -> Self {
        Self {
            db_url: None,
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            jwt_ttl_minutes: 60,
            bind_addr: "127.0.0.1:5000".to_string(),
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables and implements the **fail-fast**
    /// principle for production.
    ///
    /// # Panics
    /// Panics in production when `DATABASE_URL` or `JWT_SECRET_KEY` is missing, or when
    /// `JWT_TTL_MINUTES` is set to something that is not a positive integer.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()).as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let jwt_ttl_minutes = match env::var("JWT_TTL_MINUTES") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .expect("FATAL: JWT_TTL_MINUTES must be a positive integer"),
            Err(_) => 60,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let cors_origins = split_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Without a database the service runs on the in-memory store.
                db_url: env::var("DATABASE_URL").ok(),
                jwt_secret: env::var("JWT_SECRET_KEY")
                    .unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
                jwt_ttl_minutes,
                bind_addr,
                cors_origins,
            },
            Env::Production => Self {
                env: Env::Production,
                db_url: Some(
                    env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod"),
                ),
                jwt_secret: env::var("JWT_SECRET_KEY")
                    .expect("FATAL: JWT_SECRET_KEY must be set in production."),
                jwt_ttl_minutes,
                bind_addr,
                cors_origins,
            },
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
