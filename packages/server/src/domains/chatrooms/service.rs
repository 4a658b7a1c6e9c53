use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::common::{ChatRoomId, UserId};
use crate::kernel::BaseChatService;

/// Postgres-backed chat room provisioning.
///
/// Rooms are keyed by the normalized (smaller, larger) user pair with a
/// unique index, so concurrent create calls for the same pair converge on
/// one row. The upsert's no-op DO UPDATE makes RETURNING yield the existing
/// row instead of nothing on conflict.
pub struct PgChatService {
    pool: PgPool,
}

impl PgChatService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Normalize a pair so (a,b) and (b,a) key the same room
pub fn normalize_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[async_trait]
impl BaseChatService for PgChatService {
    async fn create_or_get_room(&self, a: UserId, b: UserId) -> Result<ChatRoomId> {
        let (user_a, user_b) = normalize_pair(a, b);

        let (room_id,) = sqlx::query_as::<_, (ChatRoomId,)>(
            "INSERT INTO chat_rooms (id, user_a, user_b)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_a, user_b) DO UPDATE SET user_a = EXCLUDED.user_a
             RETURNING id",
        )
        .bind(ChatRoomId::new())
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&self.pool)
        .await?;

        debug!(room_id = %room_id, "Chat room ready for pair");

        Ok(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_normalization_is_order_independent() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(normalize_pair(a, b), normalize_pair(b, a));
    }
}
