// Persists postings as moviments and keeps the account balance in step
//
// Both writes happen in one transaction, under a row lock on the account.
// The moviment is keyed on the posting id, so replaying a posting leaves
// the balance untouched.

use chrono::Utc;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::moviments::Moviment;

pub struct BalanceRepository {
    pool: MySqlPool,
}

impl BalanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert `moviment` and adjust its account balance.
    ///
    /// Returns false when the moviment had already been applied, and
    /// NotFound when its account does not exist.
    pub async fn apply_moviment(&self, moviment: &Moviment) -> Result<bool> {
        let mut tx = self.pool.begin().await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        // serialises every posting of this account
        let account = sqlx::query_scalar::<_, String>("SELECT id FROM accounts WHERE id = ? FOR UPDATE")
            .bind(moviment.account_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to lock account: {}", e)))?;

        if account.is_none() {
            return Err(AppError::not_found("Account not found"));
        }

        let applied = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM moviments WHERE id = ?")
            .bind(moviment.id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to look up moviment: {}", e)))?
            > 0;

        if applied {
            return Ok(false);
        }

        Self::insert_moviment_with_tx(&mut tx, moviment).await?;

        sqlx::query(
            r#"
            UPDATE accounts
            SET balance = balance + ?, updated_on = ?
            WHERE id = ?
            "#,
        )
        .bind(moviment.signed_value())
        .bind(Utc::now())
        .bind(moviment.account_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update balance: {}", e)))?;

        tx.commit().await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(true)
    }

    async fn insert_moviment_with_tx(
        tx: &mut Transaction<'_, MySql>,
        moviment: &Moviment,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO moviments (
                id, account_id, user_id, value, description,
                category, moviment_type, created_on
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(moviment.id.to_string())
        .bind(moviment.account_id.to_string())
        .bind(moviment.user_id.to_string())
        .bind(moviment.value)
        .bind(&moviment.description)
        .bind(moviment.category.as_str())
        .bind(moviment.moviment_type.as_str())
        .bind(moviment.created_on)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to insert moviment: {}", e)))?;

        Ok(())
    }
}
