//! Integration tests for the two-sided decision state machine.
//!
//! Acceptance requires unanimity, rejection is unilateral, terminal states
//! refuse further transitions, and chat provisioning happens exactly once
//! even under concurrent acceptance.

mod common;

use crate::common::{create_goal_with_vector, seed_helper, seed_user, TestHarness};
use dreamnest_core::common::{ConnectionId, UserId};
use dreamnest_core::domains::connections::actions::{accept_connection, reject_connection};
use dreamnest_core::domains::connections::{
    Connection, ConnectionError, ConnectionStatus, Decision,
};
use dreamnest_core::domains::notifications::NotificationKind;
use test_context::test_context;

/// Seed a helper and seeker with one pending connection between them
async fn pending_connection(ctx: &TestHarness) -> (UserId, UserId, Connection) {
    let helper = seed_helper(ctx, "Maya", "I coach runners", vec![1.0, 0.0, 0.0]);
    let seeker = seed_user(ctx, "Jordan");

    let created =
        create_goal_with_vector(ctx, seeker, "Run a marathon", "26.2", vec![1.0, 0.0, 0.0])
            .await
            .unwrap();

    assert_eq!(created.connections.len(), 1);
    (helper, seeker, created.connections[0].clone())
}

// =============================================================================
// Acceptance
// =============================================================================

/// One side accepting leaves the connection pending with no chat room.
#[test_context(TestHarness)]
#[tokio::test]
async fn single_accept_stays_pending(ctx: &TestHarness) {
    let (helper, _seeker, connection) = pending_connection(ctx).await;

    let updated = accept_connection(helper, connection.id, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(updated.status, ConnectionStatus::Pending);
    assert_eq!(updated.helper_decision, Decision::Accepted);
    assert_eq!(updated.seeker_decision, Decision::Pending);
    assert!(updated.chat_room_id.is_none());
    assert_eq!(ctx.mocks.chat_service.room_count(), 0);
}

/// The second acceptance finalizes the connection, provisions a chat room,
/// and notifies both parties.
#[test_context(TestHarness)]
#[tokio::test]
async fn second_accept_finalizes_and_provisions_chat(ctx: &TestHarness) {
    let (helper, seeker, connection) = pending_connection(ctx).await;

    accept_connection(helper, connection.id, &ctx.deps)
        .await
        .unwrap();
    let finalized = accept_connection(seeker, connection.id, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(finalized.status, ConnectionStatus::Accepted);
    assert!(finalized.chat_room_id.is_some());
    assert_eq!(ctx.mocks.chat_service.room_count(), 1);

    // The stored row carries the room too
    let stored = ctx
        .deps
        .connections
        .find_by_id(connection.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.chat_room_id, finalized.chat_room_id);

    assert!(ctx
        .mocks
        .notification_service
        .sent_to(helper)
        .contains(&NotificationKind::ConnectionAccepted));
    assert!(ctx
        .mocks
        .notification_service
        .sent_to(seeker)
        .contains(&NotificationKind::ConnectionAccepted));
}

/// Both sides accepting at nearly the same time creates exactly one room.
#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_accepts_provision_exactly_one_room(ctx: &TestHarness) {
    let (helper, seeker, connection) = pending_connection(ctx).await;

    let (a, b) = tokio::join!(
        accept_connection(helper, connection.id, &ctx.deps),
        accept_connection(seeker, connection.id, &ctx.deps),
    );
    a.unwrap();
    b.unwrap();

    let stored = ctx
        .deps
        .connections
        .find_by_id(connection.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ConnectionStatus::Accepted);
    assert!(stored.chat_room_id.is_some());
    assert_eq!(ctx.mocks.chat_service.create_calls(), 1);
    assert_eq!(ctx.mocks.chat_service.room_count(), 1);
}

/// The same user double-submitting accept is a no-op the second time.
#[test_context(TestHarness)]
#[tokio::test]
async fn repeated_accept_from_same_user_is_noop(ctx: &TestHarness) {
    let (helper, seeker, connection) = pending_connection(ctx).await;

    let (first, second) = tokio::join!(
        accept_connection(helper, connection.id, &ctx.deps),
        accept_connection(helper, connection.id, &ctx.deps),
    );
    first.unwrap();
    second.unwrap();
    assert_eq!(ctx.mocks.chat_service.create_calls(), 0);

    // And after finalization, repeating the accept stays a no-op: no second
    // provisioning call.
    accept_connection(seeker, connection.id, &ctx.deps)
        .await
        .unwrap();
    let replay = accept_connection(helper, connection.id, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(replay.status, ConnectionStatus::Accepted);
    assert_eq!(ctx.mocks.chat_service.create_calls(), 1);
}

// =============================================================================
// Rejection
// =============================================================================

/// Either side rejecting immediately moves the connection to rejected,
/// regardless of the other side's decision.
#[test_context(TestHarness)]
#[tokio::test]
async fn reject_is_unilateral(ctx: &TestHarness) {
    let (_helper, seeker, connection) = pending_connection(ctx).await;

    let updated = reject_connection(seeker, connection.id, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(updated.status, ConnectionStatus::Rejected);
    assert_eq!(updated.seeker_decision, Decision::Rejected);
    assert_eq!(updated.helper_decision, Decision::Pending);
    assert_eq!(ctx.mocks.chat_service.room_count(), 0);
}

/// Rejection wins even when the other side already accepted.
#[test_context(TestHarness)]
#[tokio::test]
async fn reject_overrides_prior_accept_by_other_side(ctx: &TestHarness) {
    let (helper, seeker, connection) = pending_connection(ctx).await;

    accept_connection(helper, connection.id, &ctx.deps)
        .await
        .unwrap();
    let updated = reject_connection(seeker, connection.id, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(updated.status, ConnectionStatus::Rejected);
    assert_eq!(ctx.mocks.chat_service.room_count(), 0);
}

/// Rejected is terminal: later accepts are refused.
#[test_context(TestHarness)]
#[tokio::test]
async fn accept_after_rejection_is_refused(ctx: &TestHarness) {
    let (helper, seeker, connection) = pending_connection(ctx).await;

    reject_connection(seeker, connection.id, &ctx.deps)
        .await
        .unwrap();
    let result = accept_connection(helper, connection.id, &ctx.deps).await;

    assert!(matches!(result, Err(ConnectionError::InvalidState(_))));
    assert_eq!(ctx.mocks.chat_service.room_count(), 0);
}

/// A user who accepted cannot change their mind to reject.
#[test_context(TestHarness)]
#[tokio::test]
async fn changing_a_recorded_decision_is_refused(ctx: &TestHarness) {
    let (helper, _seeker, connection) = pending_connection(ctx).await;

    accept_connection(helper, connection.id, &ctx.deps)
        .await
        .unwrap();
    let result = reject_connection(helper, connection.id, &ctx.deps).await;

    assert!(matches!(result, Err(ConnectionError::InvalidState(_))));
}

// =============================================================================
// Authorization and lookup
// =============================================================================

/// Only the helper and seeker may decide on a connection.
#[test_context(TestHarness)]
#[tokio::test]
async fn third_parties_are_forbidden(ctx: &TestHarness) {
    let (_helper, _seeker, connection) = pending_connection(ctx).await;
    let outsider = seed_user(ctx, "Riley");

    let result = accept_connection(outsider, connection.id, &ctx.deps).await;

    assert!(matches!(result, Err(ConnectionError::Forbidden)));
}

/// Deciding on an unknown connection id is not-found.
#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_connection_is_not_found(ctx: &TestHarness) {
    let user = seed_user(ctx, "Riley");

    let result = accept_connection(user, ConnectionId::new(), &ctx.deps).await;

    assert!(matches!(result, Err(ConnectionError::NotFound)));
}

// =============================================================================
// Side-effect failure policy
// =============================================================================

/// A chat subsystem failure after the decisive transition leaves the
/// connection accepted; only the room is missing.
#[test_context(TestHarness)]
#[tokio::test]
async fn chat_failure_does_not_unwind_acceptance(ctx: &TestHarness) {
    let (helper, seeker, connection) = pending_connection(ctx).await;
    ctx.mocks.chat_service.set_failing(true);

    accept_connection(helper, connection.id, &ctx.deps)
        .await
        .unwrap();
    let finalized = accept_connection(seeker, connection.id, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(finalized.status, ConnectionStatus::Accepted);
    assert!(finalized.chat_room_id.is_none());

    let stored = ctx
        .deps
        .connections
        .find_by_id(connection.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ConnectionStatus::Accepted);
}
