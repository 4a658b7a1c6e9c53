//! The two-sided decision state machine.
//!
//! Acceptance requires unanimity; rejection is unilateral and final. The
//! finalize-on-accept check rides on the store's atomic `apply_decision`
//! step, so under concurrent accepts exactly one caller owns chat-room
//! provisioning. Side effects after the decisive transition (room creation,
//! notifications) are at-least-once: their failures are logged, never
//! unwound.

use futures::future::join_all;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::common::{ConnectionId, UserId};
use crate::domains::connections::errors::ConnectionError;
use crate::domains::connections::models::connection::{Connection, ConnectionStatus, Decision};
use crate::domains::notifications::NotificationKind;
use crate::kernel::ServerDeps;

/// Record the acting user's acceptance.
///
/// Leaves the connection pending until the other side also accepts; on the
/// second acceptance the connection finalizes and a chat room is provisioned
/// exactly once. Repeating an already-recorded acceptance is a no-op.
#[instrument(skip(deps), fields(connection_id = %id, actor = %actor))]
pub async fn accept_connection(
    actor: UserId,
    id: ConnectionId,
    deps: &ServerDeps,
) -> Result<Connection, ConnectionError> {
    decide(actor, id, Decision::Accepted, deps).await
}

/// Record the acting user's rejection.
///
/// Immediately moves the connection to rejected regardless of the other
/// side's decision.
#[instrument(skip(deps), fields(connection_id = %id, actor = %actor))]
pub async fn reject_connection(
    actor: UserId,
    id: ConnectionId,
    deps: &ServerDeps,
) -> Result<Connection, ConnectionError> {
    decide(actor, id, Decision::Rejected, deps).await
}

async fn decide(
    actor: UserId,
    id: ConnectionId,
    decision: Decision,
    deps: &ServerDeps,
) -> Result<Connection, ConnectionError> {
    let connection = deps
        .connections
        .find_by_id(id)
        .await?
        .ok_or(ConnectionError::NotFound)?;

    let side = connection.side_of(actor).ok_or(ConnectionError::Forbidden)?;

    if connection.status.is_terminal() {
        // Double-submitting the decision that got us here is harmless
        if connection.decision_for(side) == decision {
            return Ok(connection);
        }
        return Err(ConnectionError::InvalidState(format!(
            "connection is already {}",
            connection.status
        )));
    }

    match connection.decision_for(side) {
        recorded if recorded == decision => return Ok(connection),
        Decision::Pending => {}
        recorded => {
            return Err(ConnectionError::InvalidState(format!(
                "already responded with {}",
                recorded
            )))
        }
    }

    match deps.connections.apply_decision(id, side, decision).await? {
        Some(updated) => {
            if decision == Decision::Accepted && updated.status == ConnectionStatus::Accepted {
                // This call flipped the overall status, so it owns finalization
                Ok(finalize_accepted(updated, deps).await)
            } else {
                Ok(updated)
            }
        }
        None => {
            // Lost a race between the read above and the update; classify
            // from the row as it is now.
            let current = deps
                .connections
                .find_by_id(id)
                .await?
                .ok_or(ConnectionError::NotFound)?;

            if current.decision_for(side) == decision {
                Ok(current)
            } else {
                Err(ConnectionError::InvalidState(format!(
                    "connection is already {}",
                    current.status
                )))
            }
        }
    }
}

/// Provision the chat room and notify both parties.
///
/// The connection is already accepted when this runs; a room or delivery
/// failure leaves it accepted with the side effect retried out of band.
async fn finalize_accepted(mut connection: Connection, deps: &ServerDeps) -> Connection {
    info!(
        connection_id = %connection.id,
        helper_id = %connection.helper_id,
        seeker_id = %connection.seeker_id,
        "Both sides accepted, provisioning chat room"
    );

    match deps
        .chat_service
        .create_or_get_room(connection.helper_id, connection.seeker_id)
        .await
    {
        Ok(room_id) => {
            if let Err(e) = deps.connections.attach_chat_room(connection.id, room_id).await {
                error!(
                    error = %e,
                    connection_id = %connection.id,
                    "Failed to store chat room id"
                );
            }
            connection.chat_room_id = Some(room_id);
        }
        Err(e) => {
            error!(
                error = %e,
                connection_id = %connection.id,
                "Chat room provisioning failed; connection remains accepted"
            );
        }
    }

    let payload = json!({
        "connection_id": connection.id,
        "goal_id": connection.goal_id,
        "chat_room_id": connection.chat_room_id,
    });

    let recipients = [connection.helper_id, connection.seeker_id];
    let results = join_all(recipients.iter().map(|&user_id| {
        deps.notification_service
            .notify(user_id, NotificationKind::ConnectionAccepted, payload.clone())
    }))
    .await;

    for (user_id, result) in recipients.iter().zip(results) {
        if let Err(e) = result {
            warn!(
                error = %e,
                user_id = %user_id,
                connection_id = %connection.id,
                "Failed to deliver acceptance notification"
            );
        }
    }

    connection
}
