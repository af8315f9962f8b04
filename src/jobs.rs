use anyhow::Result;
use chrono::Utc;

use crate::models::{JobApplication, JobDraft};
use crate::seed;
use crate::store::{JsonStore, JOBS_KEY};

/// Owns the job-application collection. Every mutation writes the whole
/// collection back through the store before returning.
pub struct JobRepository {
    store: JsonStore,
    jobs: Vec<JobApplication>,
    seq: u64,
}

impl JobRepository {
    /// Loads the persisted collection, seeding the demonstration dataset
    /// when the store reports nothing usable. The seed is written through
    /// immediately so its relative dates stay fixed across runs.
    pub fn load(store: JsonStore) -> Result<Self> {
        let jobs = match store.load(JOBS_KEY) {
            Some(jobs) => jobs,
            None => {
                let seeded = seed::sample_jobs();
                store.save(JOBS_KEY, &seeded)?;
                seeded
            }
        };
        Ok(Self {
            store,
            jobs,
            seq: 0,
        })
    }

    /// Snapshot of the collection in insertion order. Display ordering is
    /// the filter engine's job, not ours.
    pub fn list(&self) -> &[JobApplication] {
        &self.jobs
    }

    pub fn get(&self, id: &str) -> Option<&JobApplication> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Records a new application. Input validation (non-empty company and
    /// title) belongs to the caller; the repository accepts any well-formed
    /// draft and assigns the id and timestamp.
    pub fn add(&mut self, draft: JobDraft) -> Result<&JobApplication> {
        let id = self.next_id();
        let job = JobApplication {
            id,
            company_name: draft.company_name,
            job_title: draft.job_title,
            date_applied: draft.date_applied,
            job_link: draft.job_link,
            resume_text: draft.resume_text,
            status: draft.status,
            notes: draft.notes,
            follow_up_date: draft.follow_up_date,
            last_updated: Utc::now().to_rfc3339(),
        };
        self.jobs.push(job);
        self.store.save(JOBS_KEY, &self.jobs)?;
        Ok(self.jobs.last().expect("just pushed"))
    }

    /// Replaces the entity with a matching id, refreshing `last_updated`.
    /// Returns false (and leaves the collection untouched) when the id is
    /// unknown; surfacing that to the user is the caller's call.
    pub fn update(&mut self, mut job: JobApplication) -> Result<bool> {
        let Some(existing) = self.jobs.iter_mut().find(|j| j.id == job.id) else {
            return Ok(false);
        };
        job.last_updated = Utc::now().to_rfc3339();
        *existing = job;
        self.store.save(JOBS_KEY, &self.jobs)?;
        Ok(true)
    }

    /// Removes the entity with a matching id; no-op when absent.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != id);
        if self.jobs.len() == before {
            return Ok(false);
        }
        self.store.save(JOBS_KEY, &self.jobs)?;
        Ok(true)
    }

    /// Time-based token with an in-process sequence so that ids stay unique
    /// even when several adds land in the same millisecond.
    fn next_id(&mut self) -> String {
        self.seq += 1;
        format!("job-{}-{}", Utc::now().timestamp_millis(), self.seq)
    }
}
