use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::UserId;
use crate::domains::users::models::user::UserProfile;

#[async_trait]
pub trait BaseUserStore: Send + Sync {
    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>>;

    /// Batch profile lookup; unknown ids are simply absent from the result
    async fn find_profiles(&self, ids: &[UserId]) -> Result<Vec<UserProfile>>;
}

/// Postgres-backed user profile reads
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseUserStore for PgUserStore {
    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, display_name, avatar_url, expo_push_token FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_profiles(&self, ids: &[UserId]) -> Result<Vec<UserProfile>> {
        let profiles = sqlx::query_as::<_, UserProfile>(
            "SELECT id, display_name, avatar_url, expo_push_token FROM users WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}
