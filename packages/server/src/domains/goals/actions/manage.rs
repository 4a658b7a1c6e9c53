//! Owner-only goal mutations: progress updates and deletion.

use tracing::info;

use crate::common::{GoalId, UserId};
use crate::domains::goals::errors::GoalError;
use crate::domains::goals::models::goal::Goal;
use crate::kernel::ServerDeps;

/// Update a goal's progress percentage (0..=100)
pub async fn update_progress(
    actor: UserId,
    goal_id: GoalId,
    progress: i32,
    deps: &ServerDeps,
) -> Result<Goal, GoalError> {
    if !(0..=100).contains(&progress) {
        return Err(GoalError::InvalidProgress(progress));
    }

    let goal = deps
        .goals
        .find_by_id(goal_id)
        .await?
        .ok_or(GoalError::NotFound)?;

    if goal.owner_id != actor {
        return Err(GoalError::Forbidden);
    }

    deps.goals
        .update_progress(goal_id, progress)
        .await?
        .ok_or(GoalError::NotFound)
}

/// Delete a goal.
///
/// Connections that reference the goal are kept as history; listings
/// tolerate the missing title.
pub async fn delete_goal(actor: UserId, goal_id: GoalId, deps: &ServerDeps) -> Result<(), GoalError> {
    let goal = deps
        .goals
        .find_by_id(goal_id)
        .await?
        .ok_or(GoalError::NotFound)?;

    if goal.owner_id != actor {
        return Err(GoalError::Forbidden);
    }

    deps.goals.delete(goal_id).await?;
    info!(goal_id = %goal_id, "Goal deleted");

    Ok(())
}
