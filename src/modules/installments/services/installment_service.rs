// InstallmentService: orchestration of the create-installment command
//
// Implements:
// - Resolving the referenced user and account
// - Validation with every violated rule reported together
// - Persisting the commitment, expanding it and scheduling its postings
// - Read-side queries and rescheduling of a persisted commitment

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::accounts::AccountRepository;
use crate::modules::installments::{
    models::{CreateInstallmentMovimentCommand, InstallmentMoviment},
    repositories::InstallmentRepository,
    services::{InstallmentExpander, ScheduledPosting},
    validators::InstallmentMovimentValidator,
};
use crate::modules::scheduling::{PostingScheduler, ScheduleReport, ScheduledJob};
use crate::modules::users::UserRepository;

/// Result of a successful create command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentCreated {
    pub id: Uuid,
    pub postings_scheduled: usize,
    pub duplicates_skipped: usize,
}

/// Service for installment commitment business logic
pub struct InstallmentService {
    users: Arc<dyn UserRepository>,
    accounts: Arc<dyn AccountRepository>,
    installments: Arc<dyn InstallmentRepository>,
    scheduler: PostingScheduler,
    validator: InstallmentMovimentValidator,
}

impl InstallmentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        accounts: Arc<dyn AccountRepository>,
        installments: Arc<dyn InstallmentRepository>,
        scheduler: PostingScheduler,
    ) -> Self {
        Self {
            users,
            accounts,
            installments,
            scheduler,
            validator: InstallmentMovimentValidator::new(),
        }
    }

    /// Create an installment commitment and schedule its postings
    ///
    /// # Business Rules
    /// - Unknown user or account fails with NotFound before anything is stored
    /// - All validation violations are reported in one error
    /// - The commitment is persisted before any posting is scheduled
    /// - A scheduling failure leaves the commitment persisted; `reschedule`
    ///   completes it without duplicating postings
    pub async fn create(&self, command: CreateInstallmentMovimentCommand) -> Result<InstallmentCreated> {
        let commitment = self.prepare(command).await?;

        self.installments.insert(&commitment).await?;

        let postings = InstallmentExpander::expand(&commitment)?;
        let report = self.scheduler.schedule(commitment.id, &postings).await?;

        info!(
            commitment_id = %commitment.id,
            account_id = %commitment.account_id,
            months = commitment.months,
            value = %commitment.value,
            "Installment commitment created"
        );

        Ok(InstallmentCreated {
            id: commitment.id,
            postings_scheduled: report.scheduled,
            duplicates_skipped: report.duplicates,
        })
    }

    /// Validate and expand without persisting or scheduling
    pub async fn preview(&self, command: CreateInstallmentMovimentCommand) -> Result<Vec<ScheduledPosting>> {
        let commitment = self.prepare(command).await?;
        InstallmentExpander::expand(&commitment)
    }

    pub async fn get(&self, id: Uuid) -> Result<InstallmentMoviment> {
        self.installments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment not found"))
    }

    /// Scheduled jobs of a commitment, in installment order
    pub async fn schedule_for(&self, id: Uuid) -> Result<Vec<ScheduledJob>> {
        let commitment = self.get(id).await?;
        self.scheduler.jobs_for(commitment.id).await
    }

    /// Re-expand a persisted commitment and enqueue whatever is missing
    pub async fn reschedule(&self, id: Uuid) -> Result<ScheduleReport> {
        let commitment = self.get(id).await?;
        let postings = InstallmentExpander::expand(&commitment)?;
        self.scheduler.schedule(commitment.id, &postings).await
    }

    /// Resolve references, build the commitment and run the business rules
    async fn prepare(&self, command: CreateInstallmentMovimentCommand) -> Result<InstallmentMoviment> {
        if self.users.find_by_id(command.user_id).await?.is_none() {
            return Err(AppError::not_found("Invalid user"));
        }

        let account = self
            .accounts
            .find_by_id(command.account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid account"))?;

        let commitment = InstallmentMoviment::new(
            command.value,
            command.months,
            command.start_month,
            command.description,
            command.category,
            command.moviment_type,
            command.account_id,
            command.user_id,
            account.currency,
        );

        let mut violations = self.validator.violations(&commitment);
        if !account.belongs_to(command.user_id) {
            violations.push("Account does not belong to user".to_string());
        }

        if !violations.is_empty() {
            warn!(
                account_id = %commitment.account_id,
                violations = violations.len(),
                "Installment commitment rejected"
            );
            return Err(AppError::Validation(violations));
        }

        Ok(commitment)
    }
}
