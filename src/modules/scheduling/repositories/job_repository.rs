// MySQL-backed outbox for scheduled balance updates
//
// Implements:
// - Idempotent enqueue keyed on idempotency_key
// - Claiming due jobs with row locks (SKIP LOCKED) so concurrent runners
//   never pick the same job; unreadable rows are dead-lettered on claim
// - Completion / failure / dead-letter transitions
// - Listing a commitment's jobs in sequence order

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use crate::core::{parse_id, AppError, Result};
use crate::modules::moviments::Moviment;
use crate::modules::scheduling::models::{EnqueueOutcome, JobStatus, ScheduledJob};

/// Running jobs not updated for this long are considered abandoned
pub const RUNNING_LEASE_MINUTES: i64 = 15;

/// Storage for scheduled jobs
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Store `job` unless a job with the same idempotency key exists
    async fn enqueue(&self, job: ScheduledJob) -> Result<EnqueueOutcome>;

    /// Mark up to `limit` due jobs as running and return them
    async fn claim_due(&self, now: DateTime<Utc>, limit: u32) -> Result<Vec<ScheduledJob>>;

    async fn mark_completed(&self, id: Uuid, now: DateTime<Utc>) -> Result<()>;

    /// Record a failed attempt; `retry_at = None` dead-letters the job
    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        retry_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<()>;

    async fn list_by_commitment(&self, commitment_id: Uuid) -> Result<Vec<ScheduledJob>>;
}

pub struct MySqlJobQueue {
    pool: MySqlPool,
}

impl MySqlJobQueue {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledJobRow {
    id: String,
    idempotency_key: String,
    commitment_id: String,
    sequence: i32,
    payload: String,
    run_at: DateTime<Utc>,
    status: String,
    attempts: i32,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ScheduledJobRow> for ScheduledJob {
    type Error = AppError;

    fn try_from(row: ScheduledJobRow) -> Result<Self> {
        let posting: Moviment = serde_json::from_str(&row.payload)?;

        Ok(ScheduledJob {
            id: parse_id(&row.id, "scheduled_jobs.id")?,
            idempotency_key: row.idempotency_key,
            commitment_id: parse_id(&row.commitment_id, "scheduled_jobs.commitment_id")?,
            sequence: row.sequence,
            posting,
            run_at: row.run_at,
            status: JobStatus::try_from(row.status).map_err(AppError::Internal)?,
            attempts: row.attempts,
            last_error: row.last_error,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl JobQueue for MySqlJobQueue {
    async fn enqueue(&self, job: ScheduledJob) -> Result<EnqueueOutcome> {
        let payload = serde_json::to_string(&job.posting)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO scheduled_jobs (
                id, idempotency_key, commitment_id, sequence, payload,
                run_at, status, attempts, last_error, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.id.to_string())
        .bind(&job.idempotency_key)
        .bind(job.commitment_id.to_string())
        .bind(job.sequence)
        .bind(payload)
        .bind(job.run_at)
        .bind(job.status.as_str())
        .bind(job.attempts)
        .bind(&job.last_error)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(EnqueueOutcome::Enqueued),
            // only the idempotency key can collide; ids are fresh v4 uuids
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(EnqueueOutcome::Duplicate)
            }
            Err(e) => Err(AppError::scheduling(format!("Failed to enqueue job: {}", e))),
        }
    }

    async fn claim_due(&self, now: DateTime<Utc>, limit: u32) -> Result<Vec<ScheduledJob>> {
        let lease_expired = now - Duration::minutes(RUNNING_LEASE_MINUTES);

        let mut tx = self.pool.begin().await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let rows = sqlx::query_as::<_, ScheduledJobRow>(
            r#"
            SELECT
                id, idempotency_key, commitment_id, sequence, payload,
                run_at, status, attempts, last_error, created_at, updated_at
            FROM scheduled_jobs
            WHERE (status IN ('pending', 'failed') AND run_at <= ?)
               OR (status = 'running' AND updated_at <= ?)
            ORDER BY run_at ASC
            LIMIT ?
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(now)
        .bind(lease_expired)
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        let mut jobs = Vec::with_capacity(rows.len());
        for row in rows {
            let row_id = row.id.clone();
            let mut job = match ScheduledJob::try_from(row) {
                Ok(job) => job,
                Err(e) => {
                    tracing::error!(job_id = %row_id, error = %e, "Dead-lettering unreadable scheduled job");
                    sqlx::query(
                        r#"
                        UPDATE scheduled_jobs
                        SET status = 'dead', last_error = ?, updated_at = ?
                        WHERE id = ?
                        "#,
                    )
                    .bind(format!("Unreadable job: {}", e))
                    .bind(now)
                    .bind(&row_id)
                    .execute(&mut *tx)
                    .await?;
                    continue;
                }
            };

            sqlx::query("UPDATE scheduled_jobs SET status = 'running', updated_at = ? WHERE id = ?")
                .bind(now)
                .bind(job.id.to_string())
                .execute(&mut *tx)
                .await?;

            job.status = JobStatus::Running;
            job.updated_at = now;
            jobs.push(job);
        }

        tx.commit().await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(jobs)
    }

    async fn mark_completed(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE scheduled_jobs
            SET status = 'completed', last_error = NULL, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Scheduled job not found"));
        }

        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        retry_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let (status, run_at) = match retry_at {
            Some(at) => (JobStatus::Failed, Some(at)),
            None => (JobStatus::Dead, None),
        };

        let rows_affected = sqlx::query(
            r#"
            UPDATE scheduled_jobs
            SET status = ?, attempts = ?, last_error = ?,
                run_at = COALESCE(?, run_at), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(attempts)
        .bind(error)
        .bind(run_at)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Scheduled job not found"));
        }

        Ok(())
    }

    async fn list_by_commitment(&self, commitment_id: Uuid) -> Result<Vec<ScheduledJob>> {
        let rows = sqlx::query_as::<_, ScheduledJobRow>(
            r#"
            SELECT
                id, idempotency_key, commitment_id, sequence, payload,
                run_at, status, attempts, last_error, created_at, updated_at
            FROM scheduled_jobs
            WHERE commitment_id = ?
            ORDER BY sequence ASC
            "#,
        )
        .bind(commitment_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ScheduledJob::try_from).collect()
    }
}
