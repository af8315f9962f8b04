use chrono::{Duration, Utc};

use crate::models::{JobApplication, JobStatus};

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// Demonstration dataset used when the store has nothing persisted yet.
/// Dates are relative to "now" so the list always looks current.
pub fn sample_jobs() -> Vec<JobApplication> {
    vec![
        JobApplication {
            id: "job-1".to_string(),
            company_name: "TechCorp".to_string(),
            job_title: "Frontend Developer".to_string(),
            date_applied: days_ago(12),
            job_link: Some("https://example.com/job1".to_string()),
            resume_text: None,
            status: JobStatus::Interview,
            notes: Some("Had first interview on May 1st. Waiting for feedback.".to_string()),
            follow_up_date: None,
            last_updated: days_ago(5),
        },
        JobApplication {
            id: "job-2".to_string(),
            company_name: "WebSolutions Inc.".to_string(),
            job_title: "React Developer".to_string(),
            date_applied: days_ago(20),
            job_link: Some("https://example.com/job2".to_string()),
            resume_text: None,
            status: JobStatus::Rejected,
            notes: Some("Received rejection email on May 5th.".to_string()),
            follow_up_date: None,
            last_updated: days_ago(3),
        },
        JobApplication {
            id: "job-3".to_string(),
            company_name: "DataViz LLC".to_string(),
            job_title: "UI/UX Developer".to_string(),
            date_applied: days_ago(8),
            job_link: Some("https://example.com/job3".to_string()),
            resume_text: None,
            status: JobStatus::Applied,
            notes: Some("Application submitted through their careers portal.".to_string()),
            follow_up_date: None,
            last_updated: days_ago(8),
        },
        JobApplication {
            id: "job-4".to_string(),
            company_name: "StartupX".to_string(),
            job_title: "Full Stack Developer".to_string(),
            date_applied: days_ago(2),
            job_link: Some("https://example.com/job4".to_string()),
            resume_text: Some("Sample resume text for this application...".to_string()),
            status: JobStatus::Applied,
            notes: None,
            follow_up_date: None,
            last_updated: days_ago(2),
        },
        JobApplication {
            id: "job-5".to_string(),
            company_name: "BigTech Co.".to_string(),
            job_title: "Senior Frontend Engineer".to_string(),
            date_applied: days_ago(30),
            job_link: Some("https://example.com/job5".to_string()),
            resume_text: None,
            status: JobStatus::Offer,
            notes: Some("Received offer: $120k/year. Need to respond by May 15th.".to_string()),
            follow_up_date: None,
            last_updated: days_ago(1),
        },
        JobApplication {
            id: "job-6".to_string(),
            company_name: "Agency XYZ".to_string(),
            job_title: "JavaScript Developer".to_string(),
            date_applied: days_ago(15),
            job_link: Some("https://example.com/job6".to_string()),
            resume_text: None,
            status: JobStatus::Interview,
            notes: Some("Technical interview scheduled for next week.".to_string()),
            follow_up_date: None,
            last_updated: days_ago(2),
        },
        JobApplication {
            id: "job-7".to_string(),
            company_name: "InnovateTech".to_string(),
            job_title: "React Native Developer".to_string(),
            date_applied: days_ago(1),
            job_link: Some("https://example.com/job7".to_string()),
            resume_text: None,
            status: JobStatus::Interested,
            notes: Some("Interesting position, need to prepare resume for this role.".to_string()),
            follow_up_date: None,
            last_updated: days_ago(1),
        },
        JobApplication {
            id: "job-8".to_string(),
            company_name: "SoftwarePro".to_string(),
            job_title: "Frontend Architect".to_string(),
            date_applied: days_ago(5),
            job_link: Some("https://example.com/job8".to_string()),
            resume_text: None,
            status: JobStatus::Applied,
            notes: Some("Applied via LinkedIn Easy Apply.".to_string()),
            follow_up_date: None,
            last_updated: days_ago(5),
        },
    ]
}
