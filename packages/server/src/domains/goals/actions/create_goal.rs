//! Goal creation pipeline: embed, persist, form connections.
//!
//! Ordering within one request is strict - embedding runs before the goal is
//! persisted, persistence before matching, matching before notification
//! dispatch. Embedding failure aborts the whole operation; by then nothing
//! has been written, so there is no partial goal to roll back.

use tracing::{debug, info, instrument};

use crate::common::UserId;
use crate::domains::connections::models::connection::Connection;
use crate::domains::goals::errors::GoalError;
use crate::domains::goals::models::goal::{Goal, NewGoalRecord};
use crate::domains::matching::form_connections;
use crate::kernel::ServerDeps;

/// Input for goal creation
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    /// Free text describing how the owner can help others, if they offered
    pub help_text: Option<String>,
}

/// A created goal together with the connections the matching pass proposed
#[derive(Debug, Clone)]
pub struct CreatedGoal {
    pub goal: Goal,
    pub connections: Vec<Connection>,
}

#[instrument(skip(input, deps), fields(owner_id = %input.owner_id))]
pub async fn create_goal(input: CreateGoal, deps: &ServerDeps) -> Result<CreatedGoal, GoalError> {
    info!(title = %input.title, "Creating goal");

    let embedding = deps
        .embedding_service
        .generate(&Goal::embedding_text(&input.title, &input.description))
        .await
        .map_err(GoalError::EmbeddingFailed)?;

    debug!(dimensions = embedding.len(), "Generated goal embedding");

    // Empty help text means no offer was made; absence of an embedding is
    // distinct from an embedding of empty text.
    let help_text = input
        .help_text
        .filter(|text| !text.trim().is_empty());

    let help_embedding = match &help_text {
        Some(text) => Some(
            deps.embedding_service
                .generate(text)
                .await
                .map_err(GoalError::EmbeddingFailed)?,
        ),
        None => None,
    };

    let goal = deps
        .goals
        .insert(NewGoalRecord {
            owner_id: input.owner_id,
            title: input.title,
            description: input.description,
            help_text,
            embedding: embedding.clone(),
            help_embedding: help_embedding.clone(),
        })
        .await?;

    let connections =
        form_connections(&goal, &embedding, help_embedding.as_deref(), deps).await?;

    info!(
        goal_id = %goal.id,
        connection_count = connections.len(),
        "Goal created"
    );

    Ok(CreatedGoal { goal, connections })
}
