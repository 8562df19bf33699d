use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use crate::core::{parse_id, AppError, Result};
use crate::modules::users::models::User;

/// Read access to users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

/// MySQL-backed user lookups
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Row shape of the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_on: DateTime<Utc>,
}

impl TryFrom<UserEntity> for User {
    type Error = AppError;

    fn try_from(row: UserEntity) -> Result<Self> {
        Ok(User {
            id: parse_id(&row.id, "users.id")?,
            name: row.name,
            email: row.email,
            created_on: row.created_on,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, created_on
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
