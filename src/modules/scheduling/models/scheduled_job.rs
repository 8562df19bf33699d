use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::moviments::Moviment;

/// Outbox entry asking for a balance update at `run_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: Uuid,
    /// Unique across the queue; enqueueing an existing key is a no-op
    pub idempotency_key: String,
    pub commitment_id: Uuid,
    pub sequence: i32,
    /// Posting handed to the balance update
    pub posting: Moviment,
    pub run_at: DateTime<Utc>,
    pub status: JobStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledJob {
    /// A pending job that runs at the posting's effective date
    pub fn for_posting(
        commitment_id: Uuid,
        sequence: i32,
        idempotency_key: String,
        posting: Moviment,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            idempotency_key,
            commitment_id,
            sequence,
            run_at: posting.created_on,
            posting,
            status: JobStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, JobStatus::Pending | JobStatus::Failed) && self.run_at <= now
    }
}

/// Lifecycle of an outbox job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for `run_at`
    Pending,
    /// Claimed by a runner
    Running,
    Completed,
    /// Last attempt failed; retried at `run_at`
    Failed,
    /// Attempts exhausted
    Dead,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Dead => "dead",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for JobStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "dead" => Ok(Self::Dead),
            _ => Err(format!("Invalid job status: {}", value)),
        }
    }
}

/// Whether an enqueue created a job or hit an existing idempotency key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Enqueued,
    Duplicate,
}

/// Totals of one scheduling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    pub scheduled: usize,
    pub duplicates: usize,
}
