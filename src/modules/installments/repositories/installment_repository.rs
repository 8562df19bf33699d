// Provides MySQL persistence for installment commitments
//
// Implements:
// - Insert a validated commitment
// - Read a commitment by ID

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use crate::core::{parse_id, AppError, Currency, Result};
use crate::modules::installments::models::InstallmentMoviment;
use crate::modules::moviments::{Category, MovimentType};

/// Persistence for installment commitments
#[async_trait]
pub trait InstallmentRepository: Send + Sync {
    async fn insert(&self, commitment: &InstallmentMoviment) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InstallmentMoviment>>;
}

pub struct MySqlInstallmentRepository {
    pool: MySqlPool,
}

impl MySqlInstallmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstallmentRepository for MySqlInstallmentRepository {
    async fn insert(&self, commitment: &InstallmentMoviment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO installment_moviments (
                id, account_id, user_id, value, installments_value, months,
                start_month, end_month, description, category, moviment_type,
                currency, created_on
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(commitment.id.to_string())
        .bind(commitment.account_id.to_string())
        .bind(commitment.user_id.to_string())
        .bind(commitment.value)
        .bind(commitment.installments_value)
        .bind(commitment.months)
        .bind(commitment.start_month)
        .bind(commitment.end_month)
        .bind(&commitment.description)
        .bind(commitment.category.as_str())
        .bind(commitment.moviment_type.as_str())
        .bind(commitment.currency.as_str())
        .bind(commitment.created_on)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to insert installment: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InstallmentMoviment>> {
        let row = sqlx::query_as::<_, InstallmentMovimentRow>(
            r#"
            SELECT
                id, account_id, user_id, value, installments_value, months,
                start_month, end_month, description, category, moviment_type,
                currency, created_on
            FROM installment_moviments
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch installment: {}", e)))?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }
}

/// Database row representation
#[derive(Debug, FromRow)]
struct InstallmentMovimentRow {
    id: String,
    account_id: String,
    user_id: String,
    value: Decimal,
    installments_value: Decimal,
    months: i32,
    start_month: i32,
    end_month: i32,
    description: String,
    category: String,
    moviment_type: String,
    currency: String,
    created_on: DateTime<Utc>,
}

impl TryFrom<InstallmentMovimentRow> for InstallmentMoviment {
    type Error = AppError;

    fn try_from(row: InstallmentMovimentRow) -> Result<Self> {
        Ok(InstallmentMoviment {
            id: parse_id(&row.id, "installment_moviments.id")?,
            value: row.value,
            months: row.months,
            start_month: row.start_month,
            end_month: row.end_month,
            installments_value: row.installments_value,
            description: row.description,
            category: Category::try_from(row.category).map_err(AppError::Internal)?,
            moviment_type: MovimentType::try_from(row.moviment_type)
                .map_err(AppError::Internal)?,
            account_id: parse_id(&row.account_id, "installment_moviments.account_id")?,
            user_id: parse_id(&row.user_id, "installment_moviments.user_id")?,
            currency: Currency::try_from(row.currency).map_err(AppError::Internal)?,
            created_on: row.created_on,
        })
    }
}
