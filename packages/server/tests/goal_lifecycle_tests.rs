//! Integration tests for goal creation, progress updates, and deletion.

mod common;

use crate::common::{create_goal_offering_help, create_goal_with_vector, seed_user, TestHarness};
use dreamnest_core::common::GoalId;
use dreamnest_core::domains::goals::actions::{delete_goal, update_progress};
use dreamnest_core::domains::goals::GoalError;
use test_context::test_context;

/// A freshly created goal is persisted with zero progress and the trimmed
/// help text it was created with.
#[test_context(TestHarness)]
#[tokio::test]
async fn created_goal_is_persisted(ctx: &TestHarness) {
    let owner = seed_user(ctx, "Jordan");

    let created = create_goal_offering_help(
        ctx,
        owner,
        "Run a marathon",
        "Finish by spring",
        vec![1.0, 0.0, 0.0],
        "Happy to pace other runners",
        vec![0.9, 0.1, 0.0],
    )
    .await
    .unwrap();

    assert_eq!(created.goal.owner_id, owner);
    assert_eq!(created.goal.title, "Run a marathon");
    assert_eq!(created.goal.progress, 0);
    assert_eq!(
        created.goal.help_text.as_deref(),
        Some("Happy to pace other runners")
    );

    let listed = ctx.deps.goals.list_for_user(owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.goal.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn progress_updates_persist(ctx: &TestHarness) {
    let owner = seed_user(ctx, "Jordan");
    let created = create_goal_with_vector(ctx, owner, "Run", "26.2", vec![1.0, 0.0, 0.0])
        .await
        .unwrap();

    let updated = update_progress(owner, created.goal.id, 40, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(updated.progress, 40);

    let stored = ctx
        .deps
        .goals
        .find_by_id(created.goal.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.progress, 40);
}

/// Progress is a percentage; values outside 0..=100 are rejected without
/// touching the stored goal.
#[test_context(TestHarness)]
#[tokio::test]
async fn out_of_range_progress_is_rejected(ctx: &TestHarness) {
    let owner = seed_user(ctx, "Jordan");
    let created = create_goal_with_vector(ctx, owner, "Run", "26.2", vec![1.0, 0.0, 0.0])
        .await
        .unwrap();

    for bad in [-1, 101] {
        let result = update_progress(owner, created.goal.id, bad, &ctx.deps).await;
        assert!(matches!(result, Err(GoalError::InvalidProgress(p)) if p == bad));
    }

    let stored = ctx
        .deps
        .goals
        .find_by_id(created.goal.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.progress, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_the_owner_can_mutate_a_goal(ctx: &TestHarness) {
    let owner = seed_user(ctx, "Jordan");
    let stranger = seed_user(ctx, "Riley");
    let created = create_goal_with_vector(ctx, owner, "Run", "26.2", vec![1.0, 0.0, 0.0])
        .await
        .unwrap();

    let update = update_progress(stranger, created.goal.id, 50, &ctx.deps).await;
    assert!(matches!(update, Err(GoalError::Forbidden)));

    let delete = delete_goal(stranger, created.goal.id, &ctx.deps).await;
    assert!(matches!(delete, Err(GoalError::Forbidden)));

    assert!(ctx
        .deps
        .goals
        .find_by_id(created.goal.id)
        .await
        .unwrap()
        .is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn owner_can_delete_their_goal(ctx: &TestHarness) {
    let owner = seed_user(ctx, "Jordan");
    let created = create_goal_with_vector(ctx, owner, "Run", "26.2", vec![1.0, 0.0, 0.0])
        .await
        .unwrap();

    delete_goal(owner, created.goal.id, &ctx.deps).await.unwrap();

    assert!(ctx
        .deps
        .goals
        .find_by_id(created.goal.id)
        .await
        .unwrap()
        .is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn mutating_an_unknown_goal_is_not_found(ctx: &TestHarness) {
    let user = seed_user(ctx, "Jordan");

    let update = update_progress(user, GoalId::new(), 10, &ctx.deps).await;
    assert!(matches!(update, Err(GoalError::NotFound)));

    let delete = delete_goal(user, GoalId::new(), &ctx.deps).await;
    assert!(matches!(delete, Err(GoalError::NotFound)));
}
