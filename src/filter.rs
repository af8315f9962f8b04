use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::cmp::Ordering;

use crate::models::{JobApplication, JobFilter, SortDirection, SortKey};

/// Applies a filter to the job collection and returns the display
/// order. Pure: the input slice is never touched and identical inputs
/// always produce the same sequence.
pub fn apply<'a>(jobs: &'a [JobApplication], filter: &JobFilter) -> Vec<&'a JobApplication> {
    let mut matched: Vec<&JobApplication> = jobs.iter().filter(|j| matches(j, filter)).collect();
    matched.sort_by(|a, b| compare(a, b, filter.sort_by, filter.sort_direction));
    matched
}

fn matches(job: &JobApplication, filter: &JobFilter) -> bool {
    if let Some(status) = filter.status {
        if job.status != status {
            return false;
        }
    }

    if let Some(search) = filter.search.as_deref() {
        let needle = search.to_lowercase();
        if !needle.is_empty() {
            let in_company = job.company_name.to_lowercase().contains(&needle);
            let in_title = job.job_title.to_lowercase().contains(&needle);
            if !in_company && !in_title {
                return false;
            }
        }
    }

    true
}

/// Company names compare case-insensitively in code-point order. This is a
/// rough stand-in for locale-aware collation, which the standard library
/// does not provide; accented names may sort after 'z'.
fn compare(a: &JobApplication, b: &JobApplication, key: SortKey, dir: SortDirection) -> Ordering {
    let ascending = match key {
        SortKey::DateApplied => parse_instant(&a.date_applied).cmp(&parse_instant(&b.date_applied)),
        SortKey::CompanyName => a
            .company_name
            .to_lowercase()
            .cmp(&b.company_name.to_lowercase()),
        SortKey::LastUpdated => parse_instant(&a.last_updated).cmp(&parse_instant(&b.last_updated)),
    };
    match dir {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}

/// Dates arrive either as full RFC 3339 instants or bare `YYYY-MM-DD`
/// strings (the seed data and form inputs use the latter). Anything
/// unparseable sorts as the earliest possible instant.
pub fn parse_instant(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_time(NaiveTime::MIN).and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;

    fn job(id: &str, company: &str, title: &str, status: JobStatus) -> JobApplication {
        JobApplication {
            id: id.to_string(),
            company_name: company.to_string(),
            job_title: title.to_string(),
            date_applied: "2024-01-01".to_string(),
            job_link: None,
            resume_text: None,
            status,
            notes: None,
            follow_up_date: None,
            last_updated: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_status_filter_keeps_only_matching_jobs() {
        let jobs = vec![
            job("a", "Acme", "Engineer", JobStatus::Applied),
            job("b", "Beta", "Designer", JobStatus::Offer),
        ];
        let filter = JobFilter {
            status: Some(JobStatus::Applied),
            ..Default::default()
        };

        let result = apply(&jobs, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].company_name, "Acme");
    }

    #[test]
    fn test_search_is_case_insensitive_over_company_and_title() {
        let jobs = vec![
            job("a", "Acme", "Engineer", JobStatus::Applied),
            job("b", "Beta", "Designer", JobStatus::Offer),
            job("c", "Gamma", "Data ENGINEER", JobStatus::Interested),
        ];
        let filter = JobFilter {
            search: Some("engineer".to_string()),
            ..Default::default()
        };

        let result = apply(&jobs, &filter);
        let ids: Vec<&str> = result.iter().map(|j| j.id.as_str()).collect();
        assert!(ids.contains(&"a"));
        assert!(ids.contains(&"c"));
        assert!(!ids.contains(&"b"));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let jobs = vec![
            job("a", "Acme", "Engineer", JobStatus::Applied),
            job("b", "Beta", "Designer", JobStatus::Offer),
        ];
        let filter = JobFilter {
            search: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(apply(&jobs, &filter).len(), 2);
    }

    #[test]
    fn test_sort_date_applied_ascending() {
        let mut early = job("a", "Acme", "Engineer", JobStatus::Applied);
        early.date_applied = "2024-01-10".to_string();
        let mut late = job("b", "Beta", "Designer", JobStatus::Applied);
        late.date_applied = "2024-03-01".to_string();

        let jobs = vec![late, early];
        let filter = JobFilter {
            sort_by: SortKey::DateApplied,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };

        let result = apply(&jobs, &filter);
        assert_eq!(result[0].id, "a");
        assert_eq!(result[1].id, "b");
    }

    #[test]
    fn test_default_sort_is_date_applied_descending() {
        let mut early = job("a", "Acme", "Engineer", JobStatus::Applied);
        early.date_applied = "2024-01-10".to_string();
        let mut late = job("b", "Beta", "Designer", JobStatus::Applied);
        late.date_applied = "2024-03-01".to_string();

        let jobs = vec![early, late];
        let result = apply(&jobs, &JobFilter::default());
        assert_eq!(result[0].id, "b");
    }

    #[test]
    fn test_sort_company_name_is_case_insensitive() {
        let jobs = vec![
            job("a", "zeta", "Engineer", JobStatus::Applied),
            job("b", "Acme", "Engineer", JobStatus::Applied),
            job("c", "beta", "Engineer", JobStatus::Applied),
        ];
        let filter = JobFilter {
            sort_by: SortKey::CompanyName,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };

        let result = apply(&jobs, &filter);
        let companies: Vec<&str> = result.iter().map(|j| j.company_name.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "beta", "zeta"]);
    }

    #[test]
    fn test_sort_last_updated_handles_mixed_date_formats() {
        let mut a = job("a", "Acme", "Engineer", JobStatus::Applied);
        a.last_updated = "2024-02-01T09:30:00+00:00".to_string();
        let mut b = job("b", "Beta", "Designer", JobStatus::Applied);
        b.last_updated = "2024-02-02".to_string();

        let jobs = vec![a, b];
        let filter = JobFilter {
            sort_by: SortKey::LastUpdated,
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };

        let result = apply(&jobs, &filter);
        assert_eq!(result[0].id, "b");
    }

    #[test]
    fn test_apply_is_deterministic_and_side_effect_free() {
        let jobs = vec![
            job("a", "Acme", "Engineer", JobStatus::Applied),
            job("b", "Beta", "Designer", JobStatus::Offer),
            job("c", "Gamma", "Manager", JobStatus::Interview),
        ];
        let filter = JobFilter {
            search: Some("e".to_string()),
            ..Default::default()
        };

        let first: Vec<String> = apply(&jobs, &filter).iter().map(|j| j.id.clone()).collect();
        let second: Vec<String> = apply(&jobs, &filter).iter().map(|j| j.id.clone()).collect();
        assert_eq!(first, second);
        // Input order untouched.
        assert_eq!(jobs[0].id, "a");
        assert_eq!(jobs[2].id, "c");
    }

    #[test]
    fn test_no_matches_returns_empty() {
        let jobs = vec![job("a", "Acme", "Engineer", JobStatus::Applied)];
        let filter = JobFilter {
            status: Some(JobStatus::Offer),
            ..Default::default()
        };
        assert!(apply(&jobs, &filter).is_empty());
    }

    #[test]
    fn test_parse_instant_garbage_sorts_first() {
        assert_eq!(parse_instant("not a date"), DateTime::<Utc>::MIN_UTC);
        assert!(parse_instant("2024-01-01") > DateTime::<Utc>::MIN_UTC);
    }
}
