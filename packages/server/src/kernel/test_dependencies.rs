// TestDependencies - mock implementations for testing
//
// Provides mock services and in-memory stores that can be wired into
// ServerDeps for tests. The in-memory connection store mirrors the Postgres
// store's atomicity contract: apply_decision runs as one mutex-held step.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::common::{ChatRoomId, ConnectionId, GoalId, UserId};
use crate::domains::chatrooms::service::normalize_pair;
use crate::domains::connections::models::connection::{
    Connection, ConnectionStatus, Decision, NewConnection, Side,
};
use crate::domains::connections::store::BaseConnectionStore;
use crate::domains::goals::models::goal::{Goal, NewGoalRecord};
use crate::domains::goals::store::{BaseGoalStore, GoalCandidate};
use crate::domains::help_offers::models::help_offer::HelpOffer;
use crate::domains::help_offers::store::{BaseHelpOfferStore, OfferCandidate};
use crate::domains::matching::MatchingConfig;
use crate::domains::notifications::NotificationKind;
use crate::domains::users::models::user::UserProfile;
use crate::domains::users::store::BaseUserStore;
use crate::kernel::{
    BaseChatService, BaseEmbeddingService, BaseNotificationService, ServerDeps,
};

// =============================================================================
// Mock Embedding Service
// =============================================================================

/// Returns canned vectors keyed by exact input text.
///
/// Unknown texts get a zero vector, which scores 0.0 against everything and
/// therefore never matches.
pub struct MockEmbeddingService {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    failing: Mutex<bool>,
}

impl MockEmbeddingService {
    pub fn new() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            failing: Mutex::new(false),
        }
    }

    pub fn set_vector(&self, text: &str, vector: Vec<f32>) {
        self.vectors.lock().unwrap().insert(text.to_string(), vector);
    }

    /// Make every subsequent generate call fail
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

impl Default for MockEmbeddingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmbeddingService for MockEmbeddingService {
    async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        if *self.failing.lock().unwrap() {
            anyhow::bail!("embedding provider unavailable");
        }

        Ok(self
            .vectors
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0, 0.0, 0.0]))
    }
}

// =============================================================================
// Mock Notification Service
// =============================================================================

pub struct MockNotificationService {
    sent: Mutex<Vec<(UserId, NotificationKind, serde_json::Value)>>,
    failing: Mutex<bool>,
}

impl MockNotificationService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn sent(&self) -> Vec<(UserId, NotificationKind, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, user_id: UserId) -> Vec<NotificationKind> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(recipient, _, _)| *recipient == user_id)
            .map(|(_, kind, _)| *kind)
            .collect()
    }
}

impl Default for MockNotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotificationService for MockNotificationService {
    async fn notify(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        payload: serde_json::Value,
    ) -> Result<()> {
        if *self.failing.lock().unwrap() {
            anyhow::bail!("push relay unavailable");
        }

        self.sent.lock().unwrap().push((user_id, kind, payload));
        Ok(())
    }
}

// =============================================================================
// Mock Chat Service
// =============================================================================

/// Idempotent per unordered pair, like the real chat subsystem: the same two
/// users always get the same room.
pub struct MockChatService {
    rooms: Mutex<HashMap<(UserId, UserId), ChatRoomId>>,
    create_calls: Mutex<u32>,
    failing: Mutex<bool>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            create_calls: Mutex::new(0),
            failing: Mutex::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// How many distinct rooms exist
    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }

    /// How many create_or_get_room calls were made
    pub fn create_calls(&self) -> u32 {
        *self.create_calls.lock().unwrap()
    }
}

impl Default for MockChatService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseChatService for MockChatService {
    async fn create_or_get_room(&self, a: UserId, b: UserId) -> Result<ChatRoomId> {
        *self.create_calls.lock().unwrap() += 1;

        if *self.failing.lock().unwrap() {
            anyhow::bail!("chat subsystem unavailable");
        }

        let key = normalize_pair(a, b);
        let mut rooms = self.rooms.lock().unwrap();
        Ok(*rooms.entry(key).or_insert_with(ChatRoomId::new))
    }
}

// =============================================================================
// In-memory Goal Store
// =============================================================================

struct StoredGoal {
    goal: Goal,
    embedding: Option<Vec<f32>>,
}

pub struct InMemoryGoalStore {
    goals: Mutex<HashMap<GoalId, StoredGoal>>,
}

impl InMemoryGoalStore {
    pub fn new() -> Self {
        Self {
            goals: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryGoalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseGoalStore for InMemoryGoalStore {
    async fn insert(&self, record: NewGoalRecord) -> Result<Goal> {
        let now = Utc::now();
        let goal = Goal {
            id: GoalId::new(),
            owner_id: record.owner_id,
            title: record.title,
            description: record.description,
            help_text: record.help_text,
            progress: 0,
            created_at: now,
            updated_at: now,
        };

        self.goals.lock().unwrap().insert(
            goal.id,
            StoredGoal {
                goal: goal.clone(),
                embedding: Some(record.embedding),
            },
        );

        Ok(goal)
    }

    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .get(&id)
            .map(|stored| stored.goal.clone()))
    }

    async fn list_for_user(&self, owner_id: UserId) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .lock()
            .unwrap()
            .values()
            .filter(|stored| stored.goal.owner_id == owner_id)
            .map(|stored| stored.goal.clone())
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    async fn update_progress(&self, id: GoalId, progress: i32) -> Result<Option<Goal>> {
        let mut goals = self.goals.lock().unwrap();
        Ok(goals.get_mut(&id).map(|stored| {
            stored.goal.progress = progress;
            stored.goal.updated_at = Utc::now();
            stored.goal.clone()
        }))
    }

    async fn delete(&self, id: GoalId) -> Result<()> {
        self.goals.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn goal_candidates_excluding(&self, owner_id: UserId) -> Result<Vec<GoalCandidate>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .values()
            .filter(|stored| stored.goal.owner_id != owner_id)
            .filter_map(|stored| {
                stored.embedding.as_ref().map(|embedding| GoalCandidate {
                    goal_id: stored.goal.id,
                    owner_id: stored.goal.owner_id,
                    embedding: embedding.clone(),
                })
            })
            .collect())
    }

    async fn titles_by_ids(&self, ids: &[GoalId]) -> Result<HashMap<GoalId, String>> {
        let goals = self.goals.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| goals.get(id).map(|stored| (*id, stored.goal.title.clone())))
            .collect())
    }
}

// =============================================================================
// In-memory Help Offer Store
// =============================================================================

struct StoredOffer {
    offer: HelpOffer,
    embedding: Option<Vec<f32>>,
}

pub struct InMemoryHelpOfferStore {
    offers: Mutex<HashMap<UserId, StoredOffer>>,
}

impl InMemoryHelpOfferStore {
    pub fn new() -> Self {
        Self {
            offers: Mutex::new(HashMap::new()),
        }
    }

    /// Seed one user's help offer, optionally with an embedding
    pub fn seed_offer(&self, user_id: UserId, help_text: &str, embedding: Option<Vec<f32>>) {
        let now = Utc::now();
        self.offers.lock().unwrap().insert(
            user_id,
            StoredOffer {
                offer: HelpOffer {
                    user_id,
                    help_text: help_text.to_string(),
                    created_at: now,
                    updated_at: now,
                },
                embedding,
            },
        );
    }
}

impl Default for InMemoryHelpOfferStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseHelpOfferStore for InMemoryHelpOfferStore {
    async fn offer_candidates_excluding(&self, owner_id: UserId) -> Result<Vec<OfferCandidate>> {
        Ok(self
            .offers
            .lock()
            .unwrap()
            .values()
            .filter(|stored| stored.offer.user_id != owner_id)
            .filter_map(|stored| {
                stored.embedding.as_ref().map(|embedding| OfferCandidate {
                    user_id: stored.offer.user_id,
                    embedding: embedding.clone(),
                })
            })
            .collect())
    }

    async fn find_missing_embeddings(&self) -> Result<Vec<HelpOffer>> {
        Ok(self
            .offers
            .lock()
            .unwrap()
            .values()
            .filter(|stored| stored.embedding.is_none() && !stored.offer.help_text.is_empty())
            .map(|stored| stored.offer.clone())
            .collect())
    }

    async fn update_embedding(&self, user_id: UserId, embedding: &[f32]) -> Result<()> {
        if let Some(stored) = self.offers.lock().unwrap().get_mut(&user_id) {
            stored.embedding = Some(embedding.to_vec());
            stored.offer.updated_at = Utc::now();
        }
        Ok(())
    }
}

// =============================================================================
// In-memory User Store
// =============================================================================

pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a user with a push token, returning their id
    pub fn seed_user(&self, display_name: &str) -> UserId {
        let id = UserId::new();
        self.users.lock().unwrap().insert(
            id,
            UserProfile {
                id,
                display_name: display_name.to_string(),
                avatar_url: None,
                expo_push_token: Some(format!("ExponentPushToken[{}]", id)),
            },
        );
        id
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseUserStore for InMemoryUserStore {
    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_profiles(&self, ids: &[UserId]) -> Result<Vec<UserProfile>> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

// =============================================================================
// In-memory Connection Store
// =============================================================================

pub struct InMemoryConnectionStore {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionStore {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }
}

impl Default for InMemoryConnectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseConnectionStore for InMemoryConnectionStore {
    async fn insert_pending(&self, proposals: Vec<NewConnection>) -> Result<Vec<Connection>> {
        let mut connections = self.connections.lock().unwrap();
        let mut inserted = Vec::new();

        for proposal in proposals {
            let duplicate = connections.values().any(|existing| {
                existing.helper_id == proposal.helper_id
                    && existing.seeker_id == proposal.seeker_id
                    && existing.goal_id == proposal.goal_id
            });
            if duplicate {
                continue;
            }

            let now = Utc::now();
            let connection = Connection {
                id: ConnectionId::new(),
                helper_id: proposal.helper_id,
                seeker_id: proposal.seeker_id,
                goal_id: proposal.goal_id,
                similarity: proposal.similarity,
                status: ConnectionStatus::Pending,
                helper_decision: Decision::Pending,
                seeker_decision: Decision::Pending,
                chat_room_id: None,
                created_at: now,
                updated_at: now,
            };
            connections.insert(connection.id, connection.clone());
            inserted.push(connection);
        }

        Ok(inserted)
    }

    async fn find_by_id(&self, id: ConnectionId) -> Result<Option<Connection>> {
        Ok(self.connections.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Connection>> {
        let mut connections: Vec<Connection> = self
            .connections
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.helper_id == user_id || c.seeker_id == user_id)
            .cloned()
            .collect();
        connections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(connections)
    }

    async fn apply_decision(
        &self,
        id: ConnectionId,
        side: Side,
        decision: Decision,
    ) -> Result<Option<Connection>> {
        if decision == Decision::Pending {
            anyhow::bail!("cannot apply a pending decision");
        }

        // Single critical section, like the Postgres store's one conditional
        // UPDATE.
        let mut connections = self.connections.lock().unwrap();
        let Some(connection) = connections.get_mut(&id) else {
            return Ok(None);
        };

        if connection.status != ConnectionStatus::Pending
            || connection.decision_for(side) != Decision::Pending
        {
            return Ok(None);
        }

        match side {
            Side::Helper => connection.helper_decision = decision,
            Side::Seeker => connection.seeker_decision = decision,
        }

        match decision {
            Decision::Rejected => connection.status = ConnectionStatus::Rejected,
            Decision::Accepted => {
                if connection.decision_for(side.opposite()) == Decision::Accepted {
                    connection.status = ConnectionStatus::Accepted;
                }
            }
            Decision::Pending => unreachable!(),
        }

        connection.updated_at = Utc::now();
        Ok(Some(connection.clone()))
    }

    async fn attach_chat_room(&self, id: ConnectionId, room_id: ChatRoomId) -> Result<()> {
        let mut connections = self.connections.lock().unwrap();
        if let Some(connection) = connections.get_mut(&id) {
            if connection.chat_room_id.is_none() {
                connection.chat_room_id = Some(room_id);
                connection.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}

// =============================================================================
// Wiring
// =============================================================================

/// Fully in-memory dependency set for tests
pub struct TestDependencies {
    pub goals: Arc<InMemoryGoalStore>,
    pub help_offers: Arc<InMemoryHelpOfferStore>,
    pub users: Arc<InMemoryUserStore>,
    pub connections: Arc<InMemoryConnectionStore>,
    pub embedding_service: Arc<MockEmbeddingService>,
    pub chat_service: Arc<MockChatService>,
    pub notification_service: Arc<MockNotificationService>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            goals: Arc::new(InMemoryGoalStore::new()),
            help_offers: Arc::new(InMemoryHelpOfferStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            connections: Arc::new(InMemoryConnectionStore::new()),
            embedding_service: Arc::new(MockEmbeddingService::new()),
            chat_service: Arc::new(MockChatService::new()),
            notification_service: Arc::new(MockNotificationService::new()),
        }
    }

    /// Build ServerDeps over these mocks
    pub fn server_deps(&self, matching: MatchingConfig) -> ServerDeps {
        ServerDeps::new(
            self.goals.clone(),
            self.help_offers.clone(),
            self.users.clone(),
            self.connections.clone(),
            self.embedding_service.clone(),
            self.chat_service.clone(),
            self.notification_service.clone(),
            matching,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
