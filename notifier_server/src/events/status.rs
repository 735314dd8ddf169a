//! Status update definitions and the per-job aggregate they fold into.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::build_event::{BuildNumber, BuildStatus};

/// Changes a classified event makes to a job's record.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    /// A build started. Notes the job as building without touching its last terminal status.
    Started { number: BuildNumber },
    /// A build reached a recognized terminal status.
    Finished {
        number: BuildNumber,
        status: BuildStatus,
    },
}

/// Last known state of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobStatus {
    /// Last terminal status. `None` means the job was never seen finishing.
    pub last_status: Option<BuildStatus>,
    pub building: bool,
    pub last_build: Option<BuildNumber>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobStatus {
    pub fn apply(&mut self, update: &StatusUpdate) {
        match update {
            StatusUpdate::Started { number } => {
                self.building = true;
                self.last_build = Some(number.clone());
            }
            StatusUpdate::Finished { number, status } => {
                self.last_status = Some(status.clone());
                self.building = false;
                self.last_build = Some(number.clone());
            }
        }
        self.updated_at = Some(Utc::now());
    }

    pub fn is_failing(&self) -> bool {
        self.last_status.as_ref().is_some_and(BuildStatus::is_bad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(n: u64) -> BuildNumber {
        BuildNumber::Number(n.into())
    }

    #[test]
    fn start_keeps_terminal_status() {
        let mut job = JobStatus::default();
        job.apply(&StatusUpdate::Finished {
            number: number(1),
            status: BuildStatus::Failure,
        });
        job.apply(&StatusUpdate::Started { number: number(2) });

        assert_eq!(job.last_status, Some(BuildStatus::Failure));
        assert!(job.building);
        assert!(job.is_failing());
        assert_eq!(job.last_build, Some(number(2)));
    }

    #[test]
    fn finish_clears_building() {
        let mut job = JobStatus::default();
        job.apply(&StatusUpdate::Started { number: number(3) });
        job.apply(&StatusUpdate::Finished {
            number: number(3),
            status: BuildStatus::Success,
        });

        assert!(!job.building);
        assert!(!job.is_failing());
        assert!(job.updated_at.is_some());
    }
}
