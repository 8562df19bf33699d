use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Currency;
use crate::modules::moviments::Moviment;
use crate::modules::users::User;

/// Account aggregate: the owning user, its ledger entries and running balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Owner details, absent when the user row could not be loaded
    pub user: Option<User>,
    pub moviments: Vec<Moviment>,
    pub currency: Currency,
    pub balance: Decimal,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl Account {
    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Balance implied by the loaded moviments
    pub fn ledger_total(&self) -> Decimal {
        self.moviments.iter().map(Moviment::signed_value).sum()
    }
}
