use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ChatRoomId, UserId};

/// ChatRoom - a two-party room, keyed by the normalized user pair.
///
/// `user_a` always holds the smaller UUID of the pair so the unique index on
/// (user_a, user_b) makes room creation idempotent per unordered pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatRoom {
    pub id: ChatRoomId,
    pub user_a: UserId,
    pub user_b: UserId,
    pub created_at: DateTime<Utc>,
}
