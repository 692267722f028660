//! In-memory tracker for background dataset reloads.
//!
//! Each reload started with `?background=true` gets a job whose progress log
//! and final [`LoadReport`] can be polled. Finished jobs beyond
//! [`MAX_FINISHED_JOBS`] are dropped oldest first.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::LoadReport;

/// Completed or failed jobs kept for polling.
pub const MAX_FINISHED_JOBS: usize = 64;

/// A timestamped progress message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Job status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

/// Reload job metadata and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadJob {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Set once the feeds were fetched, whether or not the reload succeeded.
    pub report: Option<LoadReport>,
}

/// In-memory job tracker, cheap to clone into spawned tasks.
#[derive(Clone, Default)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<Uuid, ReloadJob>>>,
}

impl JobTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a running job and return its ID, pruning old finished jobs.
    pub fn create_job(&self) -> Uuid {
        let job_id = Uuid::new_v4();
        let job = ReloadJob {
            job_id,
            status: JobStatus::Running,
            logs: vec![],
            created_at: Utc::now(),
            completed_at: None,
            report: None,
        };
        let mut jobs = self.jobs.write();
        prune_finished(&mut jobs);
        jobs.insert(job_id, job);
        job_id
    }

    /// Append a log entry to a job. Unknown IDs are ignored.
    pub fn log(&self, job_id: &Uuid, level: LogLevel, message: impl Into<String>) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            job.logs.push(LogEntry {
                timestamp: Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Mark a job as completed with the report of the installed dataset.
    pub fn complete_job(&self, job_id: &Uuid, report: LoadReport) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            job.status = JobStatus::Completed;
            job.completed_at = Some(Utc::now());
            job.report = Some(report);
        }
    }

    /// Mark a job as failed, recording the error as its last log entry.
    pub fn fail_job(&self, job_id: &Uuid, error_message: impl Into<String>, report: Option<LoadReport>) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            let now = Utc::now();
            job.status = JobStatus::Failed;
            job.completed_at = Some(now);
            job.report = report;
            job.logs.push(LogEntry {
                timestamp: now,
                level: LogLevel::Error,
                message: error_message.into(),
            });
        }
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: &Uuid) -> Option<ReloadJob> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Number of tracked jobs, running and finished.
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}

/// Drop the oldest finished jobs so that inserting one more stays within
/// [`MAX_FINISHED_JOBS`] finished entries. Running jobs are never dropped.
fn prune_finished(jobs: &mut HashMap<Uuid, ReloadJob>) {
    let mut finished: Vec<(DateTime<Utc>, Uuid)> = jobs
        .values()
        .filter_map(|job| job.completed_at.map(|at| (at, job.job_id)))
        .collect();
    if finished.len() < MAX_FINISHED_JOBS {
        return;
    }
    finished.sort();
    let excess = finished.len() + 1 - MAX_FINISHED_JOBS;
    for (_, id) in finished.into_iter().take(excess) {
        jobs.remove(&id);
    }
}
