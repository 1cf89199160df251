use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    models::{
        Application, AppliedJob, Employer, EmployerPatch, Identity, Job, NewEmployer, NewJob,
        NewUser, NewWorker, User, UserAccount, Worker, WorkerPatch,
    },
    repository::{
        ALREADY_APPLIED, EMAIL_TAKEN, EMPLOYER_EXISTS, JOB_NOT_FOUND, RepoResult, Repository,
        RepositoryError, WORKER_EXISTS,
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    workers: Vec<Worker>,
    employers: Vec<Employer>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn account(&self, user: &User) -> UserAccount {
        UserAccount {
            user: user.clone(),
            worker: self.workers.iter().find(|w| w.user_id == user.id).cloned(),
            employer: self.employers.iter().find(|e| e.user_id == user.id).cloned(),
        }
    }
}

/// InMemoryRepository
///
/// A `Repository` kept entirely in process memory, used by the test suites and by local
/// runs without `DATABASE_URL`.
///
/// Every operation holds one lock for its whole duration, so each check-then-insert is
/// atomic and a failed operation never leaves a partial write: all validation happens
/// before the first mutation.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub async fn job_count(&self) -> usize {
        self.tables.lock().await.jobs.len()
    }

    /// Number of stored applications.
    pub async fn application_count(&self) -> usize {
        self.tables.lock().await.applications.len()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let created = User {
            id: tables.next_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            location: user.location,
            skills: user.skills,
            company_name: user.company_name,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn resolve_identity(&self, id: i64) -> RepoResult<Option<Identity>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| Identity {
                user_id: u.id,
                has_worker_profile: tables.workers.iter().any(|w| w.user_id == u.id),
                has_employer_profile: tables.employers.iter().any(|e| e.user_id == u.id),
            }))
    }

    async fn get_account(&self, id: i64) -> RepoResult<Option<UserAccount>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| tables.account(u)))
    }

    async fn list_worker_accounts(&self) -> RepoResult<Vec<UserAccount>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| tables.workers.iter().any(|w| w.user_id == u.id))
            .map(|u| tables.account(u))
            .collect())
    }

    async fn create_worker(&self, user_id: i64, worker: NewWorker) -> RepoResult<Worker> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(RepositoryError::NotFound("User not found".to_string()));
        }
        if tables.workers.iter().any(|w| w.user_id == user_id) {
            return Err(RepositoryError::Conflict(WORKER_EXISTS.to_string()));
        }

        let created = Worker {
            id: tables.next_id(),
            user_id,
            name: worker.name,
            age: worker.age,
            years_experience: worker.years_experience,
            contact_number: worker.contact_number,
            email: worker.email,
            bio: worker.bio,
            profile_picture: worker.profile_picture,
            skills: worker.skills,
            desired_salary: worker.desired_salary,
            preferred_job_titles: worker.preferred_job_titles,
            location: worker.location,
            join_date: Utc::now(),
        };
        tables.workers.push(created.clone());
        Ok(created)
    }

    async fn get_worker_by_user(&self, user_id: i64) -> RepoResult<Option<Worker>> {
        let tables = self.tables.lock().await;
        Ok(tables.workers.iter().find(|w| w.user_id == user_id).cloned())
    }

    async fn update_worker(&self, user_id: i64, patch: WorkerPatch) -> RepoResult<Option<Worker>> {
        let mut tables = self.tables.lock().await;
        let Some(worker) = tables.workers.iter_mut().find(|w| w.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            worker.name = name;
        }
        if let Some(age) = patch.age {
            worker.age = age;
        }
        if let Some(years) = patch.years_experience {
            worker.years_experience = years;
        }
        if let Some(contact) = patch.contact_number {
            worker.contact_number = contact;
        }
        if let Some(email) = patch.email {
            worker.email = email;
        }
        worker.bio = patch.bio.or(worker.bio.take());
        worker.profile_picture = patch.profile_picture.or(worker.profile_picture.take());
        worker.skills = patch.skills.or(worker.skills.take());
        worker.desired_salary = patch.desired_salary.or(worker.desired_salary);
        worker.preferred_job_titles = patch
            .preferred_job_titles
            .or(worker.preferred_job_titles.take());
        worker.location = patch.location.or(worker.location.take());

        Ok(Some(worker.clone()))
    }

    async fn list_workers(&self) -> RepoResult<Vec<Worker>> {
        Ok(self.tables.lock().await.workers.clone())
    }

    async fn create_employer(
        &self,
        user_id: i64,
        employer: NewEmployer,
    ) -> RepoResult<Employer> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(RepositoryError::NotFound("User not found".to_string()));
        }
        if tables.employers.iter().any(|e| e.user_id == user_id) {
            return Err(RepositoryError::Conflict(EMPLOYER_EXISTS.to_string()));
        }

        let created = Employer {
            id: tables.next_id(),
            user_id,
            name: employer.name,
            company_name: employer.company_name,
            address: employer.address,
            contact_number: employer.contact_number,
            email: employer.email,
            industry: employer.industry,
            company_logo: employer.company_logo,
            company_size: employer.company_size,
            website: employer.website,
            description: employer.description,
        };
        tables.employers.push(created.clone());
        Ok(created)
    }

    async fn get_employer_by_user(&self, user_id: i64) -> RepoResult<Option<Employer>> {
        let tables = self.tables.lock().await;
        Ok(tables.employers.iter().find(|e| e.user_id == user_id).cloned())
    }

    async fn update_employer(
        &self,
        user_id: i64,
        patch: EmployerPatch,
    ) -> RepoResult<Option<Employer>> {
        let mut tables = self.tables.lock().await;
        let Some(employer) = tables.employers.iter_mut().find(|e| e.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            employer.name = name;
        }
        if let Some(company) = patch.company_name {
            employer.company_name = company;
        }
        if let Some(address) = patch.address {
            employer.address = address;
        }
        if let Some(contact) = patch.contact_number {
            employer.contact_number = contact;
        }
        if let Some(email) = patch.email {
            employer.email = email;
        }
        if let Some(industry) = patch.industry {
            employer.industry = industry;
        }
        employer.company_logo = patch.company_logo.or(employer.company_logo.take());
        employer.company_size = patch.company_size.or(employer.company_size.take());
        employer.website = patch.website.or(employer.website.take());
        employer.description = patch.description.or(employer.description.take());

        Ok(Some(employer.clone()))
    }

    async fn list_employers(&self) -> RepoResult<Vec<Employer>> {
        Ok(self.tables.lock().await.employers.clone())
    }

    async fn list_jobs(&self) -> RepoResult<Vec<Job>> {
        Ok(self.tables.lock().await.jobs.clone())
    }

    async fn create_job(&self, employer_id: i64, job: NewJob) -> RepoResult<Job> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == employer_id) {
            return Err(RepositoryError::NotFound("Employer not found".to_string()));
        }

        let created = Job {
            id: tables.next_id(),
            title: job.title,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            salary_type: job.salary_type,
            posted_date: Utc::now(),
            employer_id,
            job_type: job.job_type,
            deadline_date: job.deadline_date,
            description: job.description,
            location: job.location,
        };
        tables.jobs.push(created.clone());
        Ok(created)
    }

    async fn get_job(&self, id: i64) -> RepoResult<Option<Job>> {
        let tables = self.tables.lock().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn create_application(&self, worker_id: i64, job_id: i64) -> RepoResult<Application> {
        let mut tables = self.tables.lock().await;
        if !tables.jobs.iter().any(|j| j.id == job_id) {
            return Err(RepositoryError::NotFound(JOB_NOT_FOUND.to_string()));
        }
        if tables
            .applications
            .iter()
            .any(|a| a.worker_id == worker_id && a.job_id == job_id)
        {
            return Err(RepositoryError::Conflict(ALREADY_APPLIED.to_string()));
        }

        let created = Application {
            id: tables.next_id(),
            worker_id,
            job_id,
            status: "pending".to_string(),
            applied_on: Utc::now(),
        };
        tables.applications.push(created.clone());
        Ok(created)
    }

    async fn list_applications_for_job(&self, job_id: i64) -> RepoResult<Vec<Application>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn list_applications_for_worker(&self, worker_id: i64) -> RepoResult<Vec<AppliedJob>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applications
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .map(|a| {
                let job = tables.jobs.iter().find(|j| j.id == a.job_id);
                let company_name = job.and_then(|j| {
                    tables
                        .employers
                        .iter()
                        .find(|e| e.user_id == j.employer_id)
                        .map(|e| e.company_name.clone())
                });
                AppliedJob {
                    id: a.id,
                    job_id: a.job_id,
                    status: a.status.clone(),
                    applied_on: a.applied_on,
                    job_title: job.map(|j| j.title.clone()),
                    company_name,
                    description: job.and_then(|j| j.description.clone()),
                    location: job.and_then(|j| j.location.clone()),
                }
            })
            .collect())
    }
}
