// MySQL access for the account aggregate
//
// Rows are loaded into `AccountEntity` (account + user + moviments) and
// turned into the domain `Account` by the account mapper.

use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::accounts::{
    entities::{AccountEntity, AccountRow, MovimentEntity},
    mappings::map_account,
    models::Account,
};
use crate::modules::users::UserEntity;

/// Read access to accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Account header and owner, without ledger entries
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Full aggregate including every moviment, oldest first
    async fn find_with_moviments(&self, id: Uuid) -> Result<Option<Account>>;
}

pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn load(&self, id: Uuid, with_moviments: bool) -> Result<Option<AccountEntity>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, user_id, currency, balance, created_on, updated_on
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, created_on
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(&row.user_id)
        .fetch_optional(&self.pool)
        .await?;

        let moviments = if with_moviments {
            sqlx::query_as::<_, MovimentEntity>(
                r#"
                SELECT id, account_id, user_id, value, description,
                       category, moviment_type, created_on
                FROM moviments
                WHERE account_id = ?
                ORDER BY created_on ASC
                "#,
            )
            .bind(&row.id)
            .fetch_all(&self.pool)
            .await?
        } else {
            Vec::new()
        };

        Ok(Some(AccountEntity::from_row(row, user, moviments)))
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        map_account(self.load(id, false).await?)
    }

    async fn find_with_moviments(&self, id: Uuid) -> Result<Option<Account>> {
        map_account(self.load(id, true).await?)
    }
}
