use chrono::Months;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::installments::models::InstallmentMoviment;
use crate::modules::moviments::Moviment;

/// One future posting derived from a commitment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPosting {
    /// 1-based position within the commitment
    pub sequence: i32,
    /// Stable per (commitment, sequence); the job queue deduplicates on it
    pub idempotency_key: String,
    pub moviment: Moviment,
}

/// Turns an installment commitment into its dated postings
pub struct InstallmentExpander;

impl InstallmentExpander {
    /// Expand `commitment` into exactly `months` postings.
    ///
    /// Month offsets run from `start_month` (inclusive) to `end_month`
    /// (exclusive). The k-th posting is dated `created_on + offset months`,
    /// clamped to the end of shorter months, and labelled
    /// `(k/N)-Total:{value}-{description}` with the total printed without
    /// trailing zeros, so labels do not depend on the stored scale.
    pub fn expand(commitment: &InstallmentMoviment) -> Result<Vec<ScheduledPosting>> {
        let capacity = usize::try_from(commitment.months).unwrap_or(0);
        let mut postings = Vec::with_capacity(capacity);

        for (index, month) in (commitment.start_month..commitment.end_month).enumerate() {
            let sequence = index as i32 + 1;

            let offset = u32::try_from(month).map_err(|_| {
                AppError::validation(format!("Month offset {} cannot be negative", month))
            })?;
            let effective_date = commitment
                .created_on
                .checked_add_months(Months::new(offset))
                .ok_or_else(|| {
                    AppError::validation(format!("Month offset {} is out of range", month))
                })?;

            let description = format!(
                "({}/{})-Total:{}-{}",
                sequence,
                commitment.months,
                commitment.value.normalize(),
                commitment.description
            );
            let idempotency_key = Self::idempotency_key(commitment.id, sequence);

            let mut moviment = Moviment::new(
                commitment.installment_value(sequence),
                description,
                commitment.category,
                commitment.moviment_type,
                commitment.account_id,
                commitment.user_id,
            )
            .with_id(Self::posting_id(commitment.id, &idempotency_key));
            moviment.override_created_date(effective_date);

            postings.push(ScheduledPosting {
                sequence,
                idempotency_key,
                moviment,
            });
        }

        debug!(
            commitment_id = %commitment.id,
            postings = postings.len(),
            "Expanded installment commitment"
        );

        Ok(postings)
    }

    pub fn idempotency_key(commitment_id: Uuid, sequence: i32) -> String {
        format!("installment:{}:{}", commitment_id, sequence)
    }

    /// Deterministic posting id, so a re-expanded posting keeps its identity
    pub fn posting_id(commitment_id: Uuid, idempotency_key: &str) -> Uuid {
        Uuid::new_v5(&commitment_id, idempotency_key.as_bytes())
    }
}
