use crate::models::{
    Application, AppliedJob, Employer, EmployerPatch, Identity, Job, NewEmployer, NewJob,
    NewUser, NewWorker, User, UserAccount, Worker, WorkerPatch,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

/// RepositoryError
///
/// Store failures the workflow cares about. Uniqueness and foreign-key violations raised by
/// the storage layer are translated into `Conflict` / `NotFound` so that concurrent
/// check-then-insert races surface as the same errors as the application-level checks.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

pub const EMAIL_TAKEN: &str = "Email already exists";
pub const WORKER_EXISTS: &str = "Worker profile already exists";
pub const EMPLOYER_EXISTS: &str = "Employer profile already exists";
pub const ALREADY_APPLIED: &str = "You have already applied to this job";
pub const JOB_NOT_FOUND: &str = "Job not found";

/// Repository Trait
///
/// The transactional record store behind the Credential Store, Profile Registry, Job
/// Catalog and Application Ledger. Every implementation must enforce the uniqueness
/// invariants atomically (unique email, one Worker and one Employer per user, one
/// application per (worker, job)) and must leave no partial writes behind on failure.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across Axum's
/// asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Credential Store ---
    // Conflict(EMAIL_TAKEN) when the email is already registered.
    async fn create_user(&self, user: NewUser) -> RepoResult<User>;
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    async fn get_user(&self, id: i64) -> RepoResult<Option<User>>;
    // Identity plus the roles derived from owned profiles. None when the user is gone.
    async fn resolve_identity(&self, id: i64) -> RepoResult<Option<Identity>>;
    async fn get_account(&self, id: i64) -> RepoResult<Option<UserAccount>>;
    // Every account that owns a Worker profile.
    async fn list_worker_accounts(&self) -> RepoResult<Vec<UserAccount>>;

    // --- Profile Registry ---
    // Conflict(WORKER_EXISTS) when the user already owns one.
    async fn create_worker(&self, user_id: i64, worker: NewWorker) -> RepoResult<Worker>;
    async fn get_worker_by_user(&self, user_id: i64) -> RepoResult<Option<Worker>>;
    // Patch semantics: absent fields keep their stored value. None when there is no profile.
    async fn update_worker(&self, user_id: i64, patch: WorkerPatch) -> RepoResult<Option<Worker>>;
    async fn list_workers(&self) -> RepoResult<Vec<Worker>>;

    // Conflict(EMPLOYER_EXISTS) when the user already owns one.
    async fn create_employer(&self, user_id: i64, employer: NewEmployer)
    -> RepoResult<Employer>;
    async fn get_employer_by_user(&self, user_id: i64) -> RepoResult<Option<Employer>>;
    async fn update_employer(
        &self,
        user_id: i64,
        patch: EmployerPatch,
    ) -> RepoResult<Option<Employer>>;
    async fn list_employers(&self) -> RepoResult<Vec<Employer>>;

    // --- Job Catalog ---
    async fn list_jobs(&self) -> RepoResult<Vec<Job>>;
    // Atomic: either the job is fully persisted or the catalog is unchanged.
    async fn create_job(&self, employer_id: i64, job: NewJob) -> RepoResult<Job>;
    async fn get_job(&self, id: i64) -> RepoResult<Option<Job>>;

    // --- Application Ledger ---
    // NotFound(JOB_NOT_FOUND) when the job is absent, Conflict(ALREADY_APPLIED) on a repeat.
    async fn create_application(&self, worker_id: i64, job_id: i64) -> RepoResult<Application>;
    async fn list_applications_for_job(&self, job_id: i64) -> RepoResult<Vec<Application>>;
    // Left join: applications whose job vanished are kept with empty job fields.
    async fn list_applications_for_worker(&self, worker_id: i64) -> RepoResult<Vec<AppliedJob>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// classify
///
/// Maps constraint violations reported by Postgres onto workflow errors.
fn classify(err: sqlx::Error, on_duplicate: &str, on_missing: &str) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepositoryError::Conflict(on_duplicate.to_string());
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::NotFound(on_missing.to_string());
        }
    }
    RepositoryError::Database(err)
}

/// Groups accounts from the three result sets of a profile listing.
fn assemble_accounts(
    users: Vec<User>,
    workers: Vec<Worker>,
    employers: Vec<Employer>,
) -> Vec<UserAccount> {
    let mut workers: HashMap<i64, Worker> = workers.into_iter().map(|w| (w.user_id, w)).collect();
    let mut employers: HashMap<i64, Employer> =
        employers.into_iter().map(|e| (e.user_id, e)).collect();

    users
        .into_iter()
        .map(|user| UserAccount {
            worker: workers.remove(&user.id),
            employer: employers.remove(&user.id),
            user,
        })
        .collect()
}

/// PostgresRepository
///
/// The concrete implementation of `Repository`, backed by PostgreSQL. Uniqueness lives in
/// the schema (`migrations/`), not in application-level checks.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// create_user
    ///
    /// Relies on `users_email_key` to reject duplicates, including two registrations racing
    /// with the same email.
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, location, skills, company_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, password_hash, location, skills, company_name
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.location)
        .bind(user.skills)
        .bind(user.company_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, EMAIL_TAKEN, "User not found"))
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, location, skills, company_name FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, location, skills, company_name FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// resolve_identity
    ///
    /// One round trip per authenticated request: existence of the user plus which role
    /// profiles it owns.
    async fn resolve_identity(&self, id: i64) -> RepoResult<Option<Identity>> {
        Ok(sqlx::query_as::<_, Identity>(
            r#"
            SELECT
                u.id AS user_id,
                EXISTS (SELECT 1 FROM workers w WHERE w.user_id = u.id) AS has_worker_profile,
                EXISTS (SELECT 1 FROM employers e WHERE e.user_id = u.id) AS has_employer_profile
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_account(&self, id: i64) -> RepoResult<Option<UserAccount>> {
        let Some(user) = self.get_user(id).await? else {
            return Ok(None);
        };
        Ok(Some(UserAccount {
            worker: self.get_worker_by_user(id).await?,
            employer: self.get_employer_by_user(id).await?,
            user,
        }))
    }

    async fn list_worker_accounts(&self) -> RepoResult<Vec<UserAccount>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.location, u.skills, u.company_name
            FROM users u
            JOIN workers w ON w.user_id = u.id
            ORDER BY u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let workers = self.list_workers().await?;
        let employers = self.list_employers().await?;
        Ok(assemble_accounts(users, workers, employers))
    }

    // --- PROFILE REGISTRY ---

    async fn create_worker(&self, user_id: i64, worker: NewWorker) -> RepoResult<Worker> {
        sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO workers (
                user_id, name, age, years_experience, contact_number, email, bio,
                profile_picture, skills, desired_salary, preferred_job_titles, location, join_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(worker.name)
        .bind(worker.age)
        .bind(worker.years_experience)
        .bind(worker.contact_number)
        .bind(worker.email)
        .bind(worker.bio)
        .bind(worker.profile_picture)
        .bind(worker.skills)
        .bind(worker.desired_salary)
        .bind(worker.preferred_job_titles)
        .bind(worker.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, WORKER_EXISTS, "User not found"))
    }

    async fn get_worker_by_user(&self, user_id: i64) -> RepoResult<Option<Worker>> {
        Ok(
            sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// update_worker
    ///
    /// `COALESCE` keeps the stored value for every field the patch leaves as `None`.
    async fn update_worker(&self, user_id: i64, patch: WorkerPatch) -> RepoResult<Option<Worker>> {
        Ok(sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET name = COALESCE($2, name),
                age = COALESCE($3, age),
                years_experience = COALESCE($4, years_experience),
                contact_number = COALESCE($5, contact_number),
                email = COALESCE($6, email),
                bio = COALESCE($7, bio),
                profile_picture = COALESCE($8, profile_picture),
                skills = COALESCE($9, skills),
                desired_salary = COALESCE($10, desired_salary),
                preferred_job_titles = COALESCE($11, preferred_job_titles),
                location = COALESCE($12, location)
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.age)
        .bind(patch.years_experience)
        .bind(patch.contact_number)
        .bind(patch.email)
        .bind(patch.bio)
        .bind(patch.profile_picture)
        .bind(patch.skills)
        .bind(patch.desired_salary)
        .bind(patch.preferred_job_titles)
        .bind(patch.location)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_workers(&self) -> RepoResult<Vec<Worker>> {
        Ok(sqlx::query_as::<_, Worker>("SELECT * FROM workers ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_employer(
        &self,
        user_id: i64,
        employer: NewEmployer,
    ) -> RepoResult<Employer> {
        sqlx::query_as::<_, Employer>(
            r#"
            INSERT INTO employers (
                user_id, name, company_name, address, contact_number, email, industry,
                company_logo, company_size, website, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(employer.name)
        .bind(employer.company_name)
        .bind(employer.address)
        .bind(employer.contact_number)
        .bind(employer.email)
        .bind(employer.industry)
        .bind(employer.company_logo)
        .bind(employer.company_size)
        .bind(employer.website)
        .bind(employer.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, EMPLOYER_EXISTS, "User not found"))
    }

    async fn get_employer_by_user(&self, user_id: i64) -> RepoResult<Option<Employer>> {
        Ok(
            sqlx::query_as::<_, Employer>("SELECT * FROM employers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_employer(
        &self,
        user_id: i64,
        patch: EmployerPatch,
    ) -> RepoResult<Option<Employer>> {
        Ok(sqlx::query_as::<_, Employer>(
            r#"
            UPDATE employers
            SET name = COALESCE($2, name),
                company_name = COALESCE($3, company_name),
                address = COALESCE($4, address),
                contact_number = COALESCE($5, contact_number),
                email = COALESCE($6, email),
                industry = COALESCE($7, industry),
                company_logo = COALESCE($8, company_logo),
                company_size = COALESCE($9, company_size),
                website = COALESCE($10, website),
                description = COALESCE($11, description)
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.company_name)
        .bind(patch.address)
        .bind(patch.contact_number)
        .bind(patch.email)
        .bind(patch.industry)
        .bind(patch.company_logo)
        .bind(patch.company_size)
        .bind(patch.website)
        .bind(patch.description)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_employers(&self) -> RepoResult<Vec<Employer>> {
        Ok(sqlx::query_as::<_, Employer>("SELECT * FROM employers ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    // --- JOB CATALOG ---

    /// list_jobs
    ///
    /// No ORDER BY: callers get whatever order the table scan produces.
    async fn list_jobs(&self) -> RepoResult<Vec<Job>> {
        Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs")
            .fetch_all(&self.pool)
            .await?)
    }

    /// create_job
    ///
    /// Runs in a transaction. An error before `commit` drops `tx`, which rolls back.
    async fn create_job(&self, employer_id: i64, job: NewJob) -> RepoResult<Job> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                title, salary_min, salary_max, salary_type, posted_date, employer_id,
                job_type, deadline_date, description, location
            )
            VALUES ($1, $2, $3, $4, NOW(), $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(job.title)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.salary_type)
        .bind(employer_id)
        .bind(job.job_type)
        .bind(job.deadline_date)
        .bind(job.description)
        .bind(job.location)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, "Job already exists", "Employer not found"))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_job(&self, id: i64) -> RepoResult<Option<Job>> {
        Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- APPLICATION LEDGER ---

    /// create_application
    ///
    /// The job row is share-locked for the duration of the transaction so it cannot vanish
    /// between the existence check and the insert. `ON CONFLICT DO NOTHING` on the
    /// (worker_id, job_id) key makes the second of two racing inserts return no row, which
    /// is reported as a conflict.
    async fn create_application(&self, worker_id: i64, job_id: i64) -> RepoResult<Application> {
        let mut tx = self.pool.begin().await?;

        let job_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM jobs WHERE id = $1 FOR SHARE")
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !job_exists {
            return Err(RepositoryError::NotFound(JOB_NOT_FOUND.to_string()));
        }

        let inserted = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (worker_id, job_id, status, applied_on)
            VALUES ($1, $2, 'pending', NOW())
            ON CONFLICT (worker_id, job_id) DO NOTHING
            RETURNING id, worker_id, job_id, status, applied_on
            "#,
        )
        .bind(worker_id)
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify(e, ALREADY_APPLIED, JOB_NOT_FOUND))?;

        match inserted {
            Some(application) => {
                tx.commit().await?;
                Ok(application)
            }
            None => Err(RepositoryError::Conflict(ALREADY_APPLIED.to_string())),
        }
    }

    async fn list_applications_for_job(&self, job_id: i64) -> RepoResult<Vec<Application>> {
        Ok(sqlx::query_as::<_, Application>(
            "SELECT id, worker_id, job_id, status, applied_on FROM applications WHERE job_id = $1 ORDER BY id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_applications_for_worker(&self, worker_id: i64) -> RepoResult<Vec<AppliedJob>> {
        Ok(sqlx::query_as::<_, AppliedJob>(
            r#"
            SELECT
                a.id, a.job_id, a.status, a.applied_on,
                j.title AS job_title,
                e.company_name AS company_name,
                j.description AS description,
                j.location AS location
            FROM applications a
            LEFT JOIN jobs j ON j.id = a.job_id
            LEFT JOIN employers e ON e.user_id = j.employer_id
            WHERE a.worker_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
