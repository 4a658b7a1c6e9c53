//! Integration tests for connection listings.

mod common;

use crate::common::{create_goal_with_vector, seed_helper, seed_user, TestHarness};
use dreamnest_core::domains::connections::actions::{accept_connection, list_connections};
use dreamnest_core::domains::connections::{ConnectionStatus, Decision};
use dreamnest_core::domains::goals::actions::delete_goal;
use test_context::test_context;

/// Listings carry both mini-profiles, the goal title, and the similarity
/// score alongside the raw connection fields.
#[test_context(TestHarness)]
#[tokio::test]
async fn listing_includes_profiles_and_goal_title(ctx: &TestHarness) {
    let helper = seed_helper(ctx, "Maya", "I coach runners", vec![1.0, 0.0, 0.0]);
    let seeker = seed_user(ctx, "Jordan");

    let created =
        create_goal_with_vector(ctx, seeker, "Run a marathon", "26.2", vec![1.0, 0.0, 0.0])
            .await
            .unwrap();

    let views = list_connections(seeker, &ctx.deps).await.unwrap();
    assert_eq!(views.len(), 1);

    let view = &views[0];
    assert_eq!(view.id, created.connections[0].id);
    assert_eq!(view.helper.id, helper);
    assert_eq!(view.helper.display_name, "Maya");
    assert_eq!(view.seeker.id, seeker);
    assert_eq!(view.seeker.display_name, "Jordan");
    assert_eq!(view.goal_title.as_deref(), Some("Run a marathon"));
    assert!((view.similarity - 1.0).abs() < 1e-6);
    assert_eq!(view.status, ConnectionStatus::Pending);
    assert_eq!(view.helper_decision, Decision::Pending);
    assert!(view.chat_room_id.is_none());

    // Both parties see the same connection
    let helper_views = list_connections(helper, &ctx.deps).await.unwrap();
    assert_eq!(helper_views.len(), 1);
    assert_eq!(helper_views[0].id, view.id);
}

/// Deleting the goal keeps the connection in listings; only the title goes.
#[test_context(TestHarness)]
#[tokio::test]
async fn deleted_goal_leaves_connection_without_title(ctx: &TestHarness) {
    seed_helper(ctx, "Maya", "I coach runners", vec![1.0, 0.0, 0.0]);
    let seeker = seed_user(ctx, "Jordan");

    let created =
        create_goal_with_vector(ctx, seeker, "Run a marathon", "26.2", vec![1.0, 0.0, 0.0])
            .await
            .unwrap();
    delete_goal(seeker, created.goal.id, &ctx.deps).await.unwrap();

    let views = list_connections(seeker, &ctx.deps).await.unwrap();
    assert_eq!(views.len(), 1);
    assert!(views[0].goal_title.is_none());
    assert_eq!(views[0].goal_id, created.goal.id);
}

/// Accepted connections surface their chat room id in listings.
#[test_context(TestHarness)]
#[tokio::test]
async fn accepted_connection_lists_its_chat_room(ctx: &TestHarness) {
    let helper = seed_helper(ctx, "Maya", "I coach runners", vec![1.0, 0.0, 0.0]);
    let seeker = seed_user(ctx, "Jordan");

    let created =
        create_goal_with_vector(ctx, seeker, "Run a marathon", "26.2", vec![1.0, 0.0, 0.0])
            .await
            .unwrap();
    let connection_id = created.connections[0].id;
    accept_connection(helper, connection_id, &ctx.deps).await.unwrap();
    accept_connection(seeker, connection_id, &ctx.deps).await.unwrap();

    let views = list_connections(seeker, &ctx.deps).await.unwrap();
    assert_eq!(views[0].status, ConnectionStatus::Accepted);
    assert!(views[0].chat_room_id.is_some());
}

/// Users with no connections get an empty listing, not an error.
#[test_context(TestHarness)]
#[tokio::test]
async fn uninvolved_user_sees_empty_listing(ctx: &TestHarness) {
    seed_helper(ctx, "Maya", "I coach runners", vec![1.0, 0.0, 0.0]);
    let seeker = seed_user(ctx, "Jordan");
    create_goal_with_vector(ctx, seeker, "Run a marathon", "26.2", vec![1.0, 0.0, 0.0])
        .await
        .unwrap();

    let bystander = seed_user(ctx, "Riley");
    let views = list_connections(bystander, &ctx.deps).await.unwrap();
    assert!(views.is_empty());
}
