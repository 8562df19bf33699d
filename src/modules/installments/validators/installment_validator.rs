use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::installments::models::InstallmentMoviment;

/// Longest commitment a user may declare (30 years)
pub const MAX_MONTHS: i32 = 360;
/// Furthest in the future the first installment may start
pub const MAX_START_MONTH: i32 = 120;
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Business rules for installment commitments.
///
/// Every rule is evaluated; violations are collected rather than returned
/// on the first failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstallmentMovimentValidator;

impl InstallmentMovimentValidator {
    pub fn new() -> Self {
        Self
    }

    /// All rule violations for `commitment`, empty when valid
    pub fn violations(&self, commitment: &InstallmentMoviment) -> Vec<String> {
        let mut errors = Vec::new();

        if commitment.value <= Decimal::ZERO {
            errors.push("Value must be greater than zero".to_string());
        } else if let Err(e) = commitment.currency.validate_amount(commitment.value) {
            errors.push(e);
        }

        if commitment.months <= 0 {
            errors.push("Months must be greater than zero".to_string());
        } else if commitment.months > MAX_MONTHS {
            errors.push(format!("Months must be at most {}", MAX_MONTHS));
        }

        if commitment.start_month < 0 {
            errors.push("Start month cannot be negative".to_string());
        } else if commitment.start_month > MAX_START_MONTH {
            errors.push(format!("Start month must be at most {}", MAX_START_MONTH));
        }

        if commitment.value > Decimal::ZERO
            && commitment.months > 0
            && commitment.installments_value < commitment.currency.smallest_unit()
        {
            errors.push(format!(
                "Value {} is too small to split into {} installments",
                commitment.value, commitment.months
            ));
        }

        let description = commitment.description.trim();
        if description.is_empty() {
            errors.push("Description is required".to_string());
        } else if description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            ));
        }

        if commitment.account_id.is_nil() {
            errors.push("Account is required".to_string());
        }

        if commitment.user_id.is_nil() {
            errors.push("User is required".to_string());
        }

        errors
    }

    pub fn validate(&self, commitment: &InstallmentMoviment) -> Result<()> {
        let errors = self.violations(commitment);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}
