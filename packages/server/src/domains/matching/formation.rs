//! Connection formation - the matching pass that runs synchronously after a
//! goal's embeddings are computed.
//!
//! Direction A ("seek help"): the new goal's embedding against every stored
//! help offer; the matched offer's owner becomes the helper, the goal owner
//! the seeker. Direction B ("offer help"), only when the goal owner supplied
//! help text: their help embedding against every other user's goals, with
//! the roles reversed and the matched goal as the subject.

use anyhow::Result;
use futures::future::join_all;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::domains::connections::models::connection::{Connection, NewConnection};
use crate::domains::goals::models::goal::Goal;
use crate::domains::matching::similarity::find_matches;
use crate::domains::notifications::NotificationKind;
use crate::kernel::ServerDeps;

/// Run both match directions for a freshly embedded goal, insert the
/// proposed connections (duplicates on the (helper, seeker, goal) key are
/// suppressed, so a re-run creates nothing new), and dispatch match
/// notifications for the rows actually created.
#[instrument(skip_all, fields(goal_id = %goal.id, owner_id = %goal.owner_id))]
pub async fn form_connections(
    goal: &Goal,
    goal_embedding: &[f32],
    help_embedding: Option<&[f32]>,
    deps: &ServerDeps,
) -> Result<Vec<Connection>> {
    let mut proposals: Vec<NewConnection> = Vec::new();

    // Direction A: who can help with this goal
    let offers = deps
        .help_offers
        .offer_candidates_excluding(goal.owner_id)
        .await?;
    let offer_count = offers.len();

    for (offer, similarity) in find_matches(goal_embedding, goal.owner_id, offers, &deps.matching)
    {
        proposals.push(NewConnection {
            helper_id: offer.user_id,
            seeker_id: goal.owner_id,
            goal_id: goal.id,
            similarity,
        });
    }

    debug!(
        candidates = offer_count,
        matched = proposals.len(),
        "Scanned help offers"
    );

    // Direction B: whose goals can this owner help with
    if let Some(help_embedding) = help_embedding {
        let goals = deps
            .goals
            .goal_candidates_excluding(goal.owner_id)
            .await?;
        let goal_count = goals.len();
        let before = proposals.len();

        for (candidate, similarity) in
            find_matches(help_embedding, goal.owner_id, goals, &deps.matching)
        {
            proposals.push(NewConnection {
                helper_id: goal.owner_id,
                seeker_id: candidate.owner_id,
                goal_id: candidate.goal_id,
                similarity,
            });
        }

        debug!(
            candidates = goal_count,
            matched = proposals.len() - before,
            "Scanned goals against help offer"
        );
    }

    let created = deps.connections.insert_pending(proposals).await?;

    info!(connection_count = created.len(), "Connections formed");

    notify_matches(&created, deps).await;

    Ok(created)
}

/// Two notifications per created connection: the seeker hears someone may
/// help them, the helper hears they may help someone. Fire-and-forget -
/// delivery failure never fails formation.
async fn notify_matches(created: &[Connection], deps: &ServerDeps) {
    let mut dispatches = Vec::with_capacity(created.len() * 2);
    for connection in created {
        let payload = json!({
            "connection_id": connection.id,
            "goal_id": connection.goal_id,
            "similarity": connection.similarity,
        });
        dispatches.push((
            connection.seeker_id,
            NotificationKind::MatchFoundSeeker,
            payload.clone(),
        ));
        dispatches.push((
            connection.helper_id,
            NotificationKind::MatchFoundHelper,
            payload,
        ));
    }

    let results = join_all(dispatches.iter().map(|(user_id, kind, payload)| {
        deps.notification_service
            .notify(*user_id, *kind, payload.clone())
    }))
    .await;

    for ((user_id, kind, _), result) in dispatches.iter().zip(results) {
        if let Err(e) = result {
            warn!(
                error = %e,
                user_id = %user_id,
                kind = %kind,
                "Failed to deliver match notification"
            );
        }
    }
}
