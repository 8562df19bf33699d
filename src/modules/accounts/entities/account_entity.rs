use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::modules::users::UserEntity;

/// Row shape of the `accounts` table
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: String,
    pub user_id: String,
    pub currency: String,
    pub balance: Decimal,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
}

/// Row shape of the `moviments` table
#[derive(Debug, Clone, FromRow)]
pub struct MovimentEntity {
    pub id: String,
    pub account_id: String,
    pub user_id: String,
    pub value: Decimal,
    pub description: String,
    pub category: String,
    pub moviment_type: String,
    pub created_on: DateTime<Utc>,
}

/// An account row together with its loaded relations
#[derive(Debug, Clone)]
pub struct AccountEntity {
    pub id: String,
    pub user_id: String,
    pub user: Option<UserEntity>,
    pub moviments: Vec<MovimentEntity>,
    pub currency: String,
    pub balance: Decimal,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl AccountEntity {
    pub fn from_row(row: AccountRow, user: Option<UserEntity>, moviments: Vec<MovimentEntity>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user,
            moviments,
            currency: row.currency,
            balance: row.balance,
            created_on: row.created_on,
            updated_on: row.updated_on,
        }
    }
}
