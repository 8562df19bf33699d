use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::Result;
use crate::modules::installments::services::ScheduledPosting;
use crate::modules::scheduling::{
    models::{EnqueueOutcome, ScheduleReport, ScheduledJob},
    repositories::JobQueue,
};

/// Requests one balance update per posting, at the posting's effective date
#[derive(Clone)]
pub struct PostingScheduler {
    queue: Arc<dyn JobQueue>,
}

impl PostingScheduler {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    /// Enqueue every posting of `commitment_id` in order.
    ///
    /// Postings whose idempotency key is already queued are counted as
    /// duplicates. The first enqueue error aborts the pass; postings
    /// enqueued before it stay queued.
    pub async fn schedule(
        &self,
        commitment_id: Uuid,
        postings: &[ScheduledPosting],
    ) -> Result<ScheduleReport> {
        let mut report = ScheduleReport::default();

        for posting in postings {
            let job = ScheduledJob::for_posting(
                commitment_id,
                posting.sequence,
                posting.idempotency_key.clone(),
                posting.moviment.clone(),
            );
            let run_at = job.run_at;

            match self.queue.enqueue(job).await? {
                EnqueueOutcome::Enqueued => {
                    report.scheduled += 1;
                    debug!(
                        commitment_id = %commitment_id,
                        sequence = posting.sequence,
                        run_at = %run_at,
                        "Balance update scheduled"
                    );
                }
                EnqueueOutcome::Duplicate => report.duplicates += 1,
            }
        }

        info!(
            commitment_id = %commitment_id,
            scheduled = report.scheduled,
            duplicates = report.duplicates,
            "Postings scheduled"
        );

        Ok(report)
    }

    pub async fn jobs_for(&self, commitment_id: Uuid) -> Result<Vec<ScheduledJob>> {
        self.queue.list_by_commitment(commitment_id).await
    }
}
