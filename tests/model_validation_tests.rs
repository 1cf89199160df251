use chrono::{DateTime, Utc};
use job_board::models::{
    AppliedJob, AppliedJobView, Application, ApplicationSummary, Employer, EmployerView,
    PostJobRequest, User, UserAccount, UserView, Worker, WorkerProfileRequest, WorkerView,
};
use serde_json::json;

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

fn sample_worker() -> Worker {
    Worker {
        id: 3,
        user_id: 1,
        name: "W".into(),
        age: 30,
        years_experience: 5,
        contact_number: "555".into(),
        email: "w@b.com".into(),
        bio: None,
        profile_picture: None,
        skills: Some("Go,Rust, Python".into()),
        desired_salary: Some(90_000),
        preferred_job_titles: Some("Backend Engineer, SRE".into()),
        location: Some("Lagos".into()),
        join_date: at("2024-02-03T04:05:06Z"),
    }
}

#[test]
fn test_worker_view_wire_shape() {
    let json = serde_json::to_value(WorkerView::from(sample_worker())).unwrap();

    assert_eq!(json["skills"], json!(["Go", "Rust", "Python"]));
    assert_eq!(json["preferred_job_titles"], json!(["Backend Engineer", "SRE"]));
    // No comma: the whole text is the city.
    assert_eq!(json["location"], json!({ "city": "Lagos", "state": null }));
    assert_eq!(json["join_date"], "2024-02-03 04:05:06");
}

#[test]
fn test_worker_view_empty_fields_render_as_absent() {
    let worker = Worker {
        location: Some(String::new()),
        skills: Some(String::new()),
        preferred_job_titles: Some("Go,,Rust,".into()),
        ..sample_worker()
    };

    let json = serde_json::to_value(WorkerView::from(worker)).unwrap();
    assert!(json["location"].is_null());
    assert_eq!(json["skills"], json!([]));
    assert_eq!(json["preferred_job_titles"], json!(["Go", "", "Rust", ""]));
}

#[test]
fn test_employer_view_address_segments() {
    let employer = Employer {
        id: 1,
        user_id: 2,
        name: "Boss".into(),
        company_name: "Acme".into(),
        address: "1 Main St, Boston".into(),
        contact_number: "555".into(),
        email: "boss@acme.com".into(),
        industry: String::new(),
        company_logo: None,
        company_size: None,
        website: None,
        description: None,
    };

    let json = serde_json::to_value(EmployerView::from(employer)).unwrap();
    assert_eq!(
        json["address"],
        json!({ "street": "1 Main St", "city": "Boston", "state": null })
    );
}

#[test]
fn test_user_view_never_exposes_password_digest() {
    let account = UserAccount {
        user: User {
            id: 1,
            name: "A".into(),
            email: "a@b.com".into(),
            password_hash: "$argon2id$secret".into(),
            ..User::default()
        },
        worker: Some(sample_worker()),
        employer: None,
    };

    let output = serde_json::to_string(&UserView::from(account)).unwrap();
    assert!(!output.contains("argon2"));
    assert!(!output.contains("password"));
    assert!(output.contains(r#""employer":null"#));
}

#[test]
fn test_applied_job_view_uses_camel_case_keys() {
    let view = AppliedJobView::from(AppliedJob {
        id: 10,
        job_id: 4,
        status: "pending".into(),
        applied_on: at("2024-05-06T23:59:00Z"),
        job_title: None,
        company_name: None,
        description: None,
        location: None,
    });

    let json = serde_json::to_value(view).unwrap();
    assert_eq!(json["jobId"], 4);
    assert_eq!(json["appliedAt"], "2024-05-06");
    // Job-derived fields are null when the job is gone.
    assert!(json["jobTitle"].is_null());
    assert!(json["companyName"].is_null());
}

#[test]
fn test_application_summary_reports_applicant_as_user_id() {
    let summary = ApplicationSummary::from(Application {
        id: 1,
        worker_id: 9,
        job_id: 4,
        status: "pending".into(),
        applied_on: at("2024-05-06T10:00:00Z"),
    });

    assert_eq!(
        serde_json::to_value(summary).unwrap(),
        json!({ "id": 1, "user_id": 9, "status": "pending", "applied_on": "2024-05-06" })
    );
}

#[test]
fn test_post_job_request_drops_client_employer_id() {
    let request: PostJobRequest =
        serde_json::from_value(json!({ "title": "Engineer", "employer_id": 999 })).unwrap();

    let output = serde_json::to_string(&request).unwrap();
    assert!(!output.contains("employer_id"));
    assert!(!output.contains("999"));
}

#[test]
fn test_post_job_request_empty_deadline_is_absent() {
    let request: PostJobRequest =
        serde_json::from_value(json!({ "title": "Engineer", "deadline_date": "" })).unwrap();

    let job = request.into_new_job().unwrap();
    assert_eq!(job.deadline_date, None);
    assert_eq!(job.job_type, "full-time");
}

#[test]
fn test_worker_profile_request_accepts_skill_array_and_experience_alias() {
    let request: WorkerProfileRequest = serde_json::from_value(json!({
        "experience": 4,
        "skills": ["Go", "Rust"],
    }))
    .unwrap();

    let patch = request.into_patch();
    assert_eq!(patch.years_experience, Some(4));
    assert_eq!(patch.skills.as_deref(), Some("Go,Rust"));
    assert_eq!(patch.name, None);
}
