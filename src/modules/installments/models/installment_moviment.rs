use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Currency;
use crate::modules::moviments::{Category, MovimentType};

/// A purchase or income split evenly across consecutive months.
///
/// `end_month` and `installments_value` are derived at construction.
/// `installments_value` is `value / months` truncated to the currency's
/// scale; the last installment absorbs whatever the truncation left over,
/// so the installments always sum to `value` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentMoviment {
    pub id: Uuid,
    /// Total value of the commitment
    pub value: Decimal,
    pub months: i32,
    /// Month offset (from `created_on`) of the first installment
    pub start_month: i32,
    /// Exclusive month offset after the last installment
    pub end_month: i32,
    pub installments_value: Decimal,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub moviment_type: MovimentType,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub currency: Currency,
    pub created_on: DateTime<Utc>,
}

impl InstallmentMoviment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        value: Decimal,
        months: i32,
        start_month: i32,
        description: String,
        category: Category,
        moviment_type: MovimentType,
        account_id: Uuid,
        user_id: Uuid,
        currency: Currency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            months,
            start_month,
            end_month: start_month.saturating_add(months),
            installments_value: Self::split_value(value, months, currency),
            description,
            category,
            moviment_type,
            account_id,
            user_id,
            currency,
            created_on: Utc::now(),
        }
    }

    /// Pin the creation timestamp, which anchors every installment date
    pub fn with_created_on(mut self, created_on: DateTime<Utc>) -> Self {
        self.created_on = created_on;
        self
    }

    fn split_value(value: Decimal, months: i32, currency: Currency) -> Decimal {
        if months <= 0 {
            return Decimal::ZERO;
        }
        currency.truncate(value / Decimal::from(months))
    }

    /// Value of the final installment, including the truncation remainder
    pub fn last_installment_value(&self) -> Decimal {
        if self.months <= 0 {
            return Decimal::ZERO;
        }
        self.value - self.installments_value * Decimal::from(self.months - 1)
    }

    /// Value of the installment at 1-based `sequence`
    pub fn installment_value(&self, sequence: i32) -> Decimal {
        if sequence == self.months {
            self.last_installment_value()
        } else {
            self.installments_value
        }
    }
}

/// Input of the create-installment command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInstallmentMovimentCommand {
    pub value: Decimal,
    pub months: i32,
    #[serde(default)]
    pub start_month: i32,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub moviment_type: MovimentType,
    pub account_id: Uuid,
    pub user_id: Uuid,
}
