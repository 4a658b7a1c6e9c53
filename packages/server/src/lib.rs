// DreamNest Matching Core
//
// This crate implements the goal-matching / connection-formation engine for
// the DreamNest goal-tracking platform: embedding-based matching between new
// goals and help offers, bidirectional connection records, and the two-sided
// accept/reject decision machine that lazily provisions a chat room.
//
// HTTP routing, auth, chat message transport, and file storage live in other
// services and are reached through the traits in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
