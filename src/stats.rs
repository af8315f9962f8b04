use chrono::{DateTime, Duration, Utc};

use crate::filter::parse_instant;
use crate::models::{JobApplication, JobStatus};

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: Vec<(JobStatus, usize)>,
    /// Applications dated within the last 7 days.
    pub recent: usize,
}

pub fn dashboard_stats(jobs: &[JobApplication], now: DateTime<Utc>) -> DashboardStats {
    let by_status = JobStatus::ALL
        .iter()
        .map(|status| {
            let count = jobs.iter().filter(|j| j.status == *status).count();
            (*status, count)
        })
        .collect();

    let week_ago = now - Duration::days(7);
    let recent = jobs
        .iter()
        .filter(|j| parse_instant(&j.date_applied) >= week_ago)
        .count();

    DashboardStats {
        total: jobs.len(),
        by_status,
        recent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// An "applied" entry older than five days with no scheduled follow-up.
    Stale,
    /// A follow-up date the user set explicitly.
    Scheduled,
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub job_id: String,
    pub kind: ReminderKind,
    pub title: String,
    pub date: DateTime<Utc>,
}

/// Builds the "upcoming reminders" panel: stale applications that deserve a
/// nudge today, plus future scheduled follow-ups. Sorted by date, capped
/// at five.
pub fn upcoming_reminders(jobs: &[JobApplication], now: DateTime<Utc>) -> Vec<Reminder> {
    let mut reminders = Vec::new();
    let stale_cutoff = now - Duration::days(5);

    for job in jobs {
        if job.status == JobStatus::Applied && parse_instant(&job.date_applied) < stale_cutoff {
            reminders.push(Reminder {
                job_id: job.id.clone(),
                kind: ReminderKind::Stale,
                title: format!(
                    "Follow up with {} ({})",
                    job.company_name, job.job_title
                ),
                date: now,
            });
        }

        if let Some(follow_up) = job.follow_up_date.as_deref() {
            let date = parse_instant(follow_up);
            if date > now {
                reminders.push(Reminder {
                    job_id: job.id.clone(),
                    kind: ReminderKind::Scheduled,
                    title: format!(
                        "Scheduled follow-up for {} ({})",
                        job.company_name, job.job_title
                    ),
                    date,
                });
            }
        }
    }

    reminders.sort_by_key(|r| r.date);
    reminders.truncate(5);
    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(id: &str, status: JobStatus, date_applied: &str) -> JobApplication {
        JobApplication {
            id: id.to_string(),
            company_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            date_applied: date_applied.to_string(),
            job_link: None,
            resume_text: None,
            status,
            notes: None,
            follow_up_date: None,
            last_updated: date_applied.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_status_counts_cover_all_statuses() {
        let jobs = vec![
            job("a", JobStatus::Applied, "2024-06-10"),
            job("b", JobStatus::Applied, "2024-06-01"),
            job("c", JobStatus::Offer, "2024-05-01"),
        ];

        let stats = dashboard_stats(&jobs, now());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.len(), JobStatus::ALL.len());
        let applied = stats
            .by_status
            .iter()
            .find(|(s, _)| *s == JobStatus::Applied)
            .unwrap();
        assert_eq!(applied.1, 2);
        let interview = stats
            .by_status
            .iter()
            .find(|(s, _)| *s == JobStatus::Interview)
            .unwrap();
        assert_eq!(interview.1, 0);
    }

    #[test]
    fn test_recent_counts_last_seven_days() {
        let jobs = vec![
            job("a", JobStatus::Applied, "2024-06-14"),
            job("b", JobStatus::Applied, "2024-06-09"),
            job("c", JobStatus::Applied, "2024-06-01"),
        ];
        let stats = dashboard_stats(&jobs, now());
        assert_eq!(stats.recent, 2);
    }

    #[test]
    fn test_stale_applied_entries_get_reminders() {
        let jobs = vec![
            job("old", JobStatus::Applied, "2024-06-01"),
            job("fresh", JobStatus::Applied, "2024-06-14"),
            job("rejected", JobStatus::Rejected, "2024-06-01"),
        ];

        let reminders = upcoming_reminders(&jobs, now());
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].job_id, "old");
        assert_eq!(reminders[0].kind, ReminderKind::Stale);
    }

    #[test]
    fn test_future_follow_up_dates_are_scheduled_reminders() {
        let mut j = job("a", JobStatus::Interview, "2024-06-14");
        j.follow_up_date = Some("2024-06-20".to_string());
        let mut past = job("b", JobStatus::Interview, "2024-06-14");
        past.follow_up_date = Some("2024-06-01".to_string());

        let reminders = upcoming_reminders(&[j, past], now());
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].kind, ReminderKind::Scheduled);
        assert_eq!(reminders[0].job_id, "a");
    }

    #[test]
    fn test_reminders_sorted_and_capped_at_five() {
        let mut jobs = Vec::new();
        for i in 0..8 {
            let mut j = job(&format!("j{i}"), JobStatus::Interview, "2024-06-14");
            j.follow_up_date = Some(format!("2024-06-{}", 30 - i));
            jobs.push(j);
        }

        let reminders = upcoming_reminders(&jobs, now());
        assert_eq!(reminders.len(), 5);
        for pair in reminders.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
    }
}
