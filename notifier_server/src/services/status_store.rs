//! Last-known status per job.
//!
//! In-memory only: history is lost on restart and every job starts out unknown.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::events::status::{JobStatus, StatusUpdate};

/// Storage for per-job status records.
pub trait StatusStore: Send + Sync {
    /// Current record for `job`; the default (unknown) record if never seen.
    fn get(&self, job: &str) -> JobStatus;

    fn set(&self, job: &str, status: JobStatus);

    /// Forget every job.
    fn reset(&self);

    fn snapshot(&self) -> BTreeMap<String, JobStatus>;

    /// Hand the job's record to `decide` and apply the update it returns.
    ///
    /// Implementations shared between concurrent requests must make this
    /// atomic per job. The default is a plain get-then-set.
    fn transition(
        &self,
        job: &str,
        decide: &mut dyn FnMut(&JobStatus) -> Option<StatusUpdate>,
    ) -> JobStatus {
        let mut record = self.get(job);
        if let Some(update) = decide(&record) {
            record.apply(&update);
            self.set(job, record.clone());
        }
        record
    }
}

/// Process-wide store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    jobs: Mutex<HashMap<String, JobStatus>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> MutexGuard<'_, HashMap<String, JobStatus>> {
        // A panic mid-update leaves at worst one stale record.
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatusStore for MemoryStatusStore {
    fn get(&self, job: &str) -> JobStatus {
        self.jobs().get(job).cloned().unwrap_or_default()
    }

    fn set(&self, job: &str, status: JobStatus) {
        self.jobs().insert(job.to_string(), status);
    }

    fn reset(&self) {
        let mut jobs = self.jobs();
        let cleared = jobs.len();
        jobs.clear();
        tracing::info!(cleared, "Job status store reset");
    }

    fn snapshot(&self) -> BTreeMap<String, JobStatus> {
        self.jobs()
            .iter()
            .map(|(name, status)| (name.clone(), status.clone()))
            .collect()
    }

    fn transition(
        &self,
        job: &str,
        decide: &mut dyn FnMut(&JobStatus) -> Option<StatusUpdate>,
    ) -> JobStatus {
        let mut jobs = self.jobs();
        let current = jobs.get(job).cloned().unwrap_or_default();
        match decide(&current) {
            Some(update) => {
                let record = jobs.entry(job.to_string()).or_default();
                record.apply(&update);
                record.clone()
            }
            None => current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::build_event::{BuildNumber, BuildStatus};

    fn finished(status: BuildStatus) -> StatusUpdate {
        StatusUpdate::Finished {
            number: BuildNumber::Number(1u64.into()),
            status,
        }
    }

    #[test]
    fn unknown_job_has_default_record() {
        let store = MemoryStatusStore::new();
        assert_eq!(store.get("nope"), JobStatus::default());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn transition_applies_returned_update() {
        let store = MemoryStatusStore::new();
        let record = store.transition("job", &mut |prior| {
            assert_eq!(prior.last_status, None);
            Some(finished(BuildStatus::Failure))
        });
        assert_eq!(record.last_status, Some(BuildStatus::Failure));
        assert_eq!(store.get("job").last_status, Some(BuildStatus::Failure));

        store.transition("job", &mut |prior| {
            assert!(prior.is_failing());
            None
        });
        assert_eq!(store.get("job").last_status, Some(BuildStatus::Failure));
    }

    #[test]
    fn transition_without_update_creates_nothing() {
        let store = MemoryStatusStore::new();
        store.transition("quiet", &mut |_| None);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn reset_forgets_all_jobs() {
        let store = MemoryStatusStore::new();
        store.transition("a", &mut |_| Some(finished(BuildStatus::Failure)));
        store.transition("b", &mut |_| Some(finished(BuildStatus::Success)));
        assert_eq!(store.snapshot().len(), 2);

        store.reset();
        assert_eq!(store.get("a"), JobStatus::default());
        assert!(store.snapshot().is_empty());

        store.reset();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn concurrent_transitions_on_one_job_are_serialized() {
        let store = std::sync::Arc::new(MemoryStatusStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.transition("shared", &mut |prior| {
                            let next = match prior.last_status {
                                Some(BuildStatus::Failure) => BuildStatus::Success,
                                _ => BuildStatus::Failure,
                            };
                            Some(finished(next))
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // 800 alternations starting from unknown end on SUCCESS.
        assert_eq!(store.get("shared").last_status, Some(BuildStatus::Success));
    }
}
