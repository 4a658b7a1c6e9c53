//! Test fixtures for seeding users, offers, and goals.

use dreamnest_core::common::UserId;
use dreamnest_core::domains::goals::actions::{create_goal, CreateGoal, CreatedGoal};
use dreamnest_core::domains::goals::{Goal, GoalError};

use super::TestHarness;

/// Seed a user with a registered push token
pub fn seed_user(harness: &TestHarness, name: &str) -> UserId {
    harness.mocks.users.seed_user(name)
}

/// Seed a user whose help offer carries the given embedding
pub fn seed_helper(
    harness: &TestHarness,
    name: &str,
    offer_text: &str,
    embedding: Vec<f32>,
) -> UserId {
    let user_id = harness.mocks.users.seed_user(name);
    harness
        .mocks
        .help_offers
        .seed_offer(user_id, offer_text, Some(embedding));
    user_id
}

/// Create a goal whose text embeds to `embedding`, with no help offered
pub async fn create_goal_with_vector(
    harness: &TestHarness,
    owner_id: UserId,
    title: &str,
    description: &str,
    embedding: Vec<f32>,
) -> Result<CreatedGoal, GoalError> {
    harness
        .mocks
        .embedding_service
        .set_vector(&Goal::embedding_text(title, description), embedding);

    create_goal(
        CreateGoal {
            owner_id,
            title: title.to_string(),
            description: description.to_string(),
            help_text: None,
        },
        &harness.deps,
    )
    .await
}

/// Create a goal that also offers help, with canned embeddings for both texts
pub async fn create_goal_offering_help(
    harness: &TestHarness,
    owner_id: UserId,
    title: &str,
    description: &str,
    goal_embedding: Vec<f32>,
    help_text: &str,
    help_embedding: Vec<f32>,
) -> Result<CreatedGoal, GoalError> {
    harness
        .mocks
        .embedding_service
        .set_vector(&Goal::embedding_text(title, description), goal_embedding);
    harness
        .mocks
        .embedding_service
        .set_vector(help_text, help_embedding);

    create_goal(
        CreateGoal {
            owner_id,
            title: title.to_string(),
            description: description.to_string(),
            help_text: Some(help_text.to_string()),
        },
        &harness.deps,
    )
    .await
}
