/// User repository - owner lookup for the auth gate
use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace an owner's token (used by the seed binary)
    pub async fn upsert(&self, user_id: &str, token: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, token, created_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (id) DO UPDATE SET token = EXCLUDED.token",
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, token, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
