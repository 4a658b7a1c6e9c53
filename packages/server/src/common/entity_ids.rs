//! Typed ID definitions for all domain entities.
//!
//! Type aliases over `Id<T>` give compile-time safety for ID usage
//! throughout the application: a `UserId` cannot be passed where a
//! `GoalId` is expected.

pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for Goal entities.
pub struct Goal;

/// Marker type for Connection entities (helper/seeker matches).
pub struct Connection;

/// Marker type for ChatRoom entities.
pub struct ChatRoom;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Goal entities.
pub type GoalId = Id<Goal>;

/// Typed ID for Connection entities.
pub type ConnectionId = Id<Connection>;

/// Typed ID for ChatRoom entities.
pub type ChatRoomId = Id<ChatRoom>;
