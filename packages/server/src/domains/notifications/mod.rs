// Notifications domain - push delivery via Expo.
//
// Callers always treat delivery as fire-and-forget: a failed send is logged
// at the call site and never rolls back the operation that triggered it.

pub mod expo;

pub use expo::ExpoNotificationService;

use serde::{Deserialize, Serialize};

/// The notification types this subsystem emits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent to the seeker when a match proposes someone who may help them
    MatchFoundSeeker,
    /// Sent to the helper when a match proposes someone they may help
    MatchFoundHelper,
    /// Sent to both parties once a connection finalizes
    ConnectionAccepted,
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::MatchFoundSeeker => "Someone may be able to help you",
            NotificationKind::MatchFoundHelper => "You may be able to help someone",
            NotificationKind::ConnectionAccepted => "Connection accepted",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            NotificationKind::MatchFoundSeeker => {
                "We found a match for one of your goals. Take a look!"
            }
            NotificationKind::MatchFoundHelper => {
                "Someone is working on a goal that fits your offer to help."
            }
            NotificationKind::ConnectionAccepted => {
                "You both said yes. Your chat room is ready."
            }
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::MatchFoundSeeker => write!(f, "match_found_seeker"),
            NotificationKind::MatchFoundHelper => write!(f, "match_found_helper"),
            NotificationKind::ConnectionAccepted => write!(f, "connection_accepted"),
        }
    }
}
