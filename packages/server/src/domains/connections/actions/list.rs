//! Connection listings with the mini-profiles and goal titles callers render.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::common::{ChatRoomId, ConnectionId, GoalId, UserId};
use crate::domains::connections::errors::ConnectionError;
use crate::domains::connections::models::connection::{ConnectionStatus, Decision};
use crate::domains::users::models::user::UserProfile;
use crate::kernel::ServerDeps;

/// API shape of one connection in a listing
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionView {
    pub id: ConnectionId,
    pub helper: UserProfile,
    pub seeker: UserProfile,
    pub goal_id: GoalId,
    /// None when the goal has since been deleted by its owner
    pub goal_title: Option<String>,
    pub similarity: f32,
    pub status: ConnectionStatus,
    pub helper_decision: Decision,
    pub seeker_decision: Decision,
    pub chat_room_id: Option<ChatRoomId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// All connections the user is party to, newest first
pub async fn list_connections(
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<Vec<ConnectionView>, ConnectionError> {
    let connections = deps.connections.list_for_user(user_id).await?;
    if connections.is_empty() {
        return Ok(Vec::new());
    }

    let mut user_ids: Vec<UserId> = Vec::new();
    let mut goal_ids: Vec<GoalId> = Vec::new();
    for connection in &connections {
        for id in [connection.helper_id, connection.seeker_id] {
            if !user_ids.contains(&id) {
                user_ids.push(id);
            }
        }
        if !goal_ids.contains(&connection.goal_id) {
            goal_ids.push(connection.goal_id);
        }
    }

    let profiles: HashMap<UserId, UserProfile> = deps
        .users
        .find_profiles(&user_ids)
        .await?
        .into_iter()
        .map(|profile| (profile.id, profile))
        .collect();

    let titles = deps.goals.titles_by_ids(&goal_ids).await?;

    let mut views = Vec::with_capacity(connections.len());
    for connection in connections {
        let (Some(helper), Some(seeker)) = (
            profiles.get(&connection.helper_id),
            profiles.get(&connection.seeker_id),
        ) else {
            // Account deletion can orphan a connection's party
            warn!(connection_id = %connection.id, "Skipping connection with missing profile");
            continue;
        };

        views.push(ConnectionView {
            id: connection.id,
            helper: helper.clone(),
            seeker: seeker.clone(),
            goal_id: connection.goal_id,
            goal_title: titles.get(&connection.goal_id).cloned(),
            similarity: connection.similarity,
            status: connection.status,
            helper_decision: connection.helper_decision,
            seeker_decision: connection.seeker_decision,
            chat_room_id: connection.chat_room_id,
            created_at: connection.created_at,
            updated_at: connection.updated_at,
        });
    }

    Ok(views)
}
