// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Connection
// formation and the decision machine are domain functions that use these
// traits.
//
// Naming convention: Base* for trait names (e.g., BaseEmbeddingService)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{ChatRoomId, UserId};
use crate::domains::notifications::NotificationKind;

// =============================================================================
// Embedding Service Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseEmbeddingService: Send + Sync {
    /// Generate embedding for text (returns 1536-dimensional vector)
    async fn generate(&self, text: &str) -> Result<Vec<f32>>;
}

// =============================================================================
// Chat Service Trait (Infrastructure - chat subsystem boundary)
// =============================================================================

#[async_trait]
pub trait BaseChatService: Send + Sync {
    /// Create (or retrieve, if one already exists) the two-party chat room
    /// for the given pair of users.
    ///
    /// Idempotent per unordered pair: the same pair always maps to the same
    /// room, never a duplicate. Callers rely on this guarantee and do not
    /// deduplicate rooms themselves.
    async fn create_or_get_room(&self, a: UserId, b: UserId) -> Result<ChatRoomId>;
}

// =============================================================================
// Notification Service Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseNotificationService: Send + Sync {
    /// Deliver a notification to a user.
    ///
    /// Callers treat delivery as fire-and-forget: failures are logged at the
    /// call site and never propagated into the surrounding operation.
    async fn notify(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        payload: serde_json::Value,
    ) -> Result<()>;
}
