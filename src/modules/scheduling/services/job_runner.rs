use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;
use crate::core::Result;
use crate::modules::balances::BalanceUpdater;
use crate::modules::scheduling::{models::ScheduledJob, repositories::JobQueue};

/// Background worker that applies due balance updates.
///
/// Each tick claims due jobs from the queue and runs the balance update for
/// their posting. Failed attempts are retried with increasing delays
/// (1 min, 5 min, then every 30 min) until `max_attempts`, after which the
/// job is dead-lettered.
pub struct JobRunner {
    queue: Arc<dyn JobQueue>,
    balances: Arc<dyn BalanceUpdater>,
    config: SchedulerConfig,
}

enum JobOutcome {
    Completed,
    Retried,
    Dead,
}

/// Outcome counts of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub claimed: usize,
    pub completed: usize,
    pub retried: usize,
    pub dead: usize,
    /// Jobs whose outcome could not be recorded; the lease reclaims them
    pub errors: usize,
}

impl JobRunner {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        balances: Arc<dyn BalanceUpdater>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            queue,
            balances,
            config,
        }
    }

    /// Poll forever. Spawn as a tokio task from main.rs
    pub async fn start(self: Arc<Self>) {
        info!(
            poll_interval_secs = self.config.poll_interval_secs,
            batch_size = self.config.batch_size,
            "Starting balance update job runner"
        );

        let mut ticker = interval(StdDuration::from_secs(self.config.poll_interval_secs));

        loop {
            ticker.tick().await;

            match self.run_due_jobs(Utc::now()).await {
                Ok(summary) => {
                    if summary.claimed > 0 {
                        info!(
                            claimed = summary.claimed,
                            completed = summary.completed,
                            retried = summary.retried,
                            dead = summary.dead,
                            errors = summary.errors,
                            "Balance update jobs processed"
                        );
                    }
                }
                Err(e) => {
                    error!(error = %e, "Error processing scheduled jobs");
                }
            }
        }
    }

    /// Claim and run every job due at `now`
    pub async fn run_due_jobs(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        let jobs = self.queue.claim_due(now, self.config.batch_size).await?;

        let mut summary = RunSummary {
            claimed: jobs.len(),
            ..RunSummary::default()
        };

        for job in jobs {
            let outcome = match self.balances.create_or_update_balance(&job.posting).await {
                Ok(()) => self
                    .queue
                    .mark_completed(job.id, now)
                    .await
                    .map(|()| JobOutcome::Completed),
                Err(e) => self
                    .record_failure(&job, &e.to_string(), now)
                    .await
                    .map(|retry| if retry { JobOutcome::Retried } else { JobOutcome::Dead }),
            };

            match outcome {
                Ok(JobOutcome::Completed) => summary.completed += 1,
                Ok(JobOutcome::Retried) => summary.retried += 1,
                Ok(JobOutcome::Dead) => summary.dead += 1,
                Err(e) => {
                    error!(
                        job_id = %job.id,
                        idempotency_key = %job.idempotency_key,
                        error = %e,
                        "Failed to record job outcome"
                    );
                    summary.errors += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Returns true when the job will be retried, false when dead-lettered
    async fn record_failure(
        &self,
        job: &ScheduledJob,
        error: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let attempts = job.attempts + 1;

        if attempts >= self.config.max_attempts as i32 {
            error!(
                job_id = %job.id,
                idempotency_key = %job.idempotency_key,
                attempts = attempts,
                error = %error,
                "Balance update failed permanently"
            );
            self.queue
                .mark_failed(job.id, attempts, error, None, now)
                .await?;
            return Ok(false);
        }

        let retry_at = now + Self::retry_delay(attempts);
        warn!(
            job_id = %job.id,
            idempotency_key = %job.idempotency_key,
            attempts = attempts,
            retry_at = %retry_at,
            error = %error,
            "Balance update failed, will retry"
        );
        self.queue
            .mark_failed(job.id, attempts, error, Some(retry_at), now)
            .await?;

        Ok(true)
    }

    /// Delay before retrying after `attempts` failures
    pub fn retry_delay(attempts: i32) -> Duration {
        match attempts {
            i32::MIN..=1 => Duration::minutes(1),
            2 => Duration::minutes(5),
            _ => Duration::minutes(30),
        }
    }
}
