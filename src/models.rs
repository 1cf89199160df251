use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{error::ApiError, validation};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

// --- Core Records (Mapped to Database) ---

/// User
///
/// The canonical identity record from the `users` table. The password digest never leaves
/// the server: `User` is not serializable, responses go through `UserView`.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub name: String,
    // Unique, compared exactly as stored.
    pub email: String,
    pub password_hash: String,
    pub location: Option<String>,
    pub skills: Option<String>,
    pub company_name: Option<String>,
}

/// Worker
///
/// Row of the `workers` table. `skills` and `preferred_job_titles` are stored as one
/// comma-delimited string each.
#[derive(Debug, Clone, FromRow)]
pub struct Worker {
    pub id: i64,
    // Unique: one Worker per User.
    pub user_id: i64,
    pub name: String,
    pub age: i32,
    pub years_experience: i32,
    pub contact_number: String,
    pub email: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub skills: Option<String>,
    pub desired_salary: Option<i32>,
    pub preferred_job_titles: Option<String>,
    // Free text, "city, state".
    pub location: Option<String>,
    pub join_date: DateTime<Utc>,
}

/// Employer
///
/// Row of the `employers` table.
#[derive(Debug, Clone, FromRow)]
pub struct Employer {
    pub id: i64,
    // Unique: one Employer per User.
    pub user_id: i64,
    pub name: String,
    pub company_name: String,
    // Free text, "street, city, state".
    pub address: String,
    pub contact_number: String,
    pub email: String,
    pub industry: String,
    pub company_logo: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

/// Job
///
/// Row of the `jobs` table. `employer_id` is the id of the posting user, never client input.
#[derive(Debug, Clone, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_type: String,
    pub posted_date: DateTime<Utc>,
    pub employer_id: i64,
    pub job_type: String,
    pub deadline_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Application
///
/// Row of the `applications` table. The pair (worker_id, job_id) is unique.
#[derive(Debug, Clone, FromRow)]
pub struct Application {
    pub id: i64,
    // The applicant's user id.
    pub worker_id: i64,
    pub job_id: i64,
    pub status: String,
    pub applied_on: DateTime<Utc>,
}

/// AppliedJob
///
/// One of the caller's applications left-joined with its job and the posting employer.
/// Every job-derived column is `None` when the job no longer exists.
#[derive(Debug, Clone, FromRow)]
pub struct AppliedJob {
    pub id: i64,
    pub job_id: i64,
    pub status: String,
    pub applied_on: DateTime<Utc>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Identity
///
/// What the Access Policy learns about a credential's subject: that it still exists, and
/// which role profiles it owns.
#[derive(Debug, Clone, Copy, FromRow, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub has_worker_profile: bool,
    pub has_employer_profile: bool,
}

/// UserAccount
///
/// A user together with whichever role profiles it owns.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub worker: Option<Worker>,
    pub employer: Option<Employer>,
}

// --- Store Inputs ---

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub location: Option<String>,
    pub skills: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewWorker {
    pub name: String,
    pub age: i32,
    pub years_experience: i32,
    pub contact_number: String,
    pub email: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub skills: Option<String>,
    pub desired_salary: Option<i32>,
    pub preferred_job_titles: Option<String>,
    pub location: Option<String>,
}

/// WorkerPatch
///
/// Partial update of a Worker profile: `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct WorkerPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub years_experience: Option<i32>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub skills: Option<String>,
    pub desired_salary: Option<i32>,
    pub preferred_job_titles: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEmployer {
    pub name: String,
    pub company_name: String,
    pub address: String,
    pub contact_number: String,
    pub email: String,
    pub industry: String,
    pub company_logo: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

/// EmployerPatch
///
/// Partial update of an Employer profile: `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EmployerPatch {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub company_logo: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_type: String,
    pub job_type: String,
    pub deadline_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub location: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /auth/register. Every field is optional at the wire level so the
/// handler can report all missing required fields at once.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub location: Option<String>,
    pub skills: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// DelimitedList
///
/// List-valued profile fields arrive either as the stored comma-delimited string or as a
/// JSON array of items.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, PartialEq)]
#[serde(untagged)]
pub enum DelimitedList {
    Joined(String),
    Items(Vec<String>),
}

impl DelimitedList {
    /// The storage form.
    pub fn into_joined(self) -> String {
        match self {
            DelimitedList::Joined(raw) => raw,
            DelimitedList::Items(items) => items.join(","),
        }
    }
}

/// WorkerProfileRequest
///
/// Body of every Worker profile write. Creation requires name, age, years_experience,
/// contact_number and email; upserts on an existing profile patch only what is present.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Default)]
pub struct WorkerProfileRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    #[serde(alias = "experience")]
    pub years_experience: Option<i32>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub skills: Option<DelimitedList>,
    pub desired_salary: Option<i32>,
    pub preferred_job_titles: Option<DelimitedList>,
    pub location: Option<String>,
}

impl WorkerProfileRequest {
    pub fn into_new_worker(self) -> Result<NewWorker, ApiError> {
        validation::require_fields(&[
            ("name", self.name.is_some()),
            ("age", self.age.is_some()),
            ("years_experience", self.years_experience.is_some()),
            ("contact_number", self.contact_number.is_some()),
            ("email", self.email.is_some()),
        ])?;

        Ok(NewWorker {
            name: self.name.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            years_experience: self.years_experience.unwrap_or_default(),
            contact_number: self.contact_number.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            bio: self.bio,
            profile_picture: self.profile_picture,
            skills: self.skills.map(DelimitedList::into_joined),
            desired_salary: self.desired_salary,
            preferred_job_titles: self.preferred_job_titles.map(DelimitedList::into_joined),
            location: self.location,
        })
    }

    pub fn into_patch(self) -> WorkerPatch {
        WorkerPatch {
            name: self.name,
            age: self.age,
            years_experience: self.years_experience,
            contact_number: self.contact_number,
            email: self.email,
            bio: self.bio,
            profile_picture: self.profile_picture,
            skills: self.skills.map(DelimitedList::into_joined),
            desired_salary: self.desired_salary,
            preferred_job_titles: self.preferred_job_titles.map(DelimitedList::into_joined),
            location: self.location,
        }
    }
}

/// EmployerProfileRequest
///
/// Body of every Employer profile write. Creation requires name, company_name, address,
/// contact_number and email.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Default)]
pub struct EmployerProfileRequest {
    pub name: Option<String>,
    #[serde(alias = "company")]
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub company_logo: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

impl EmployerProfileRequest {
    pub fn into_new_employer(self) -> Result<NewEmployer, ApiError> {
        validation::require_fields(&[
            ("name", self.name.is_some()),
            ("company_name", self.company_name.is_some()),
            ("address", self.address.is_some()),
            ("contact_number", self.contact_number.is_some()),
            ("email", self.email.is_some()),
        ])?;

        Ok(NewEmployer {
            name: self.name.unwrap_or_default(),
            company_name: self.company_name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            contact_number: self.contact_number.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            industry: self.industry.unwrap_or_default(),
            company_logo: self.company_logo,
            company_size: self.company_size,
            website: self.website,
            description: self.description,
        })
    }

    pub fn into_patch(self) -> EmployerPatch {
        EmployerPatch {
            name: self.name,
            company_name: self.company_name,
            address: self.address,
            contact_number: self.contact_number,
            email: self.email,
            industry: self.industry,
            company_logo: self.company_logo,
            company_size: self.company_size,
            website: self.website,
            description: self.description,
        }
    }
}

/// PostJobRequest
///
/// Input payload for POST /jobs/post. Has no `employer_id` field: any
/// value the client sends is dropped during deserialization.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Default)]
pub struct PostJobRequest {
    pub title: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_type: Option<String>,
    pub job_type: Option<String>,
    /// `YYYY-MM-DD`
    #[schema(example = "2025-06-30")]
    pub deadline_date: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl PostJobRequest {
    pub fn into_new_job(self) -> Result<NewJob, ApiError> {
        let title = self
            .title
            .ok_or_else(|| ApiError::validation("Missing required field: title"))?;
        let deadline_date = self
            .deadline_date
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(validation::parse_deadline)
            .transpose()?;

        Ok(NewJob {
            title,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            salary_type: self.salary_type.unwrap_or_else(|| "yearly".to_string()),
            job_type: self.job_type.unwrap_or_else(|| "full-time".to_string()),
            deadline_date,
            description: self.description,
            location: self.location,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Default)]
pub struct ApplyRequest {
    pub job_id: Option<i64>,
}

// --- Response Views (Output Schemas) ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// AuthResponse
///
/// Returned by register and login: a freshly issued bearer token plus the account view.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub message: String,
    pub access_token: String,
    pub user: UserView,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub location: Option<String>,
    pub skills: Option<String>,
    pub company_name: Option<String>,
    pub worker: Option<WorkerView>,
    pub employer: Option<EmployerView>,
}

impl From<UserAccount> for UserView {
    fn from(account: UserAccount) -> Self {
        let UserAccount {
            user,
            worker,
            employer,
        } = account;
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            location: user.location,
            skills: user.skills,
            company_name: user.company_name,
            worker: worker.map(WorkerView::from),
            employer: employer.map(EmployerView::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct WorkerLocation {
    pub city: String,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct WorkerView {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub years_experience: i32,
    pub contact_number: String,
    pub email: String,
    pub user_id: i64,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub skills: Vec<String>,
    pub desired_salary: Option<i32>,
    pub preferred_job_titles: Vec<String>,
    pub location: Option<WorkerLocation>,
    /// `YYYY-MM-DD HH:MM:SS`
    pub join_date: String,
}

impl From<Worker> for WorkerView {
    fn from(worker: Worker) -> Self {
        Self {
            skills: split_list(worker.skills.as_deref()),
            preferred_job_titles: split_list(worker.preferred_job_titles.as_deref()),
            location: worker
                .location
                .as_deref()
                .filter(|location| !location.is_empty())
                .map(split_location),
            join_date: worker.join_date.format(TIMESTAMP_FORMAT).to_string(),
            id: worker.id,
            name: worker.name,
            age: worker.age,
            years_experience: worker.years_experience,
            contact_number: worker.contact_number,
            email: worker.email,
            user_id: worker.user_id,
            bio: worker.bio,
            profile_picture: worker.profile_picture,
            desired_salary: worker.desired_salary,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct EmployerAddress {
    pub street: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct EmployerView {
    pub id: i64,
    pub name: String,
    pub company_name: String,
    pub contact_number: String,
    pub email: String,
    pub user_id: i64,
    pub address: Option<EmployerAddress>,
    pub industry: String,
    pub company_logo: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

impl From<Employer> for EmployerView {
    fn from(employer: Employer) -> Self {
        Self {
            address: split_address(&employer.address),
            id: employer.id,
            name: employer.name,
            company_name: employer.company_name,
            contact_number: employer.contact_number,
            email: employer.email,
            user_id: employer.user_id,
            industry: employer.industry,
            company_logo: employer.company_logo,
            company_size: employer.company_size,
            website: employer.website,
            description: employer.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct Salary {
    pub min: Option<i32>,
    pub max: Option<i32>,
    #[serde(rename = "type")]
    pub salary_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct JobView {
    pub id: i64,
    pub title: String,
    pub salary: Salary,
    /// `YYYY-MM-DD HH:MM:SS`
    pub posted_date: String,
    pub employer_id: i64,
    pub job_type: String,
    /// `YYYY-MM-DD`
    pub deadline_date: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: Salary {
                min: job.salary_min,
                max: job.salary_max,
                salary_type: job.salary_type,
            },
            posted_date: job.posted_date.format(TIMESTAMP_FORMAT).to_string(),
            employer_id: job.employer_id,
            job_type: job.job_type,
            deadline_date: job
                .deadline_date
                .map(|date| date.format(DATE_FORMAT).to_string()),
            description: job.description,
            location: job.location,
        }
    }
}

/// ApplicationSummary
///
/// Minimal view of an application as listed under its job.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ApplicationSummary {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    /// `YYYY-MM-DD`
    pub applied_on: String,
}

impl From<Application> for ApplicationSummary {
    fn from(application: Application) -> Self {
        Self {
            id: application.id,
            user_id: application.worker_id,
            status: application.status,
            applied_on: application.applied_on.format(DATE_FORMAT).to_string(),
        }
    }
}

/// AppliedJobView
///
/// Entry of GET /applications/applied. Keys are camelCase on the wire, as the frontend
/// dashboard expects them.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppliedJobView {
    pub id: i64,
    pub job_id: i64,
    pub status: String,
    /// `YYYY-MM-DD`
    pub applied_at: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl From<AppliedJob> for AppliedJobView {
    fn from(row: AppliedJob) -> Self {
        Self {
            id: row.id,
            job_id: row.job_id,
            status: row.status,
            applied_at: row.applied_on.format(DATE_FORMAT).to_string(),
            job_title: row.job_title,
            company_name: row.company_name,
            description: row.description,
            location: row.location,
        }
    }
}

// --- Serialization Helpers ---

/// Splits a stored comma-delimited list into trimmed items, preserving order. Interior empty
/// items are kept; an absent or empty string is an empty list.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.filter(|raw| !raw.is_empty())
        .map(|raw| raw.split(',').map(|item| item.trim().to_string()).collect())
        .unwrap_or_default()
}

/// Splits "city, state" on the first comma. Without a comma the whole text is the city.
pub fn split_location(raw: &str) -> WorkerLocation {
    match raw.split_once(',') {
        Some((city, state)) => WorkerLocation {
            city: city.trim().to_string(),
            state: Some(state.trim().to_string()),
        },
        None => WorkerLocation {
            city: raw.trim().to_string(),
            state: None,
        },
    }
}

/// Splits "street, city, state". City and state are only set when enough segments exist.
pub fn split_address(raw: &str) -> Option<EmployerAddress> {
    if raw.is_empty() {
        return None;
    }
    let mut segments = raw.split(',').map(|segment| segment.trim().to_string());
    Some(EmployerAddress {
        street: segments.next().unwrap_or_default(),
        city: segments.next(),
        state: segments.next(),
    })
}
