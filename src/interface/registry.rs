//! Active job registry

use std::collections::HashMap;
use tracing::warn;

use crate::models::Job;

/// Jobs currently running, keyed by correlation id
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: HashMap<String, Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a job; an id that is still active is replaced
    pub fn insert(&mut self, cid: String, job: Job) {
        if let Some(previous) = self.jobs.insert(cid.clone(), job) {
            warn!(
                "Job {} registered while still active, replacing {:?}",
                cid, previous.specs
            );
        }
    }

    /// Stop tracking a job; unknown ids return `None`
    pub fn remove(&mut self, cid: &str) -> Option<Job> {
        self.jobs.remove(cid)
    }

    pub fn get(&self, cid: &str) -> Option<&Job> {
        self.jobs.get(cid)
    }

    pub fn contains(&self, cid: &str) -> bool {
        self.jobs.contains_key(cid)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}
