//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. All external collaborators - storage, the embedding provider,
//! the chat subsystem, notification delivery - sit behind trait abstractions
//! so tests can swap in the in-memory versions from test_dependencies.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::domains::chatrooms::PgChatService;
use crate::domains::connections::store::{BaseConnectionStore, PgConnectionStore};
use crate::domains::goals::store::{BaseGoalStore, PgGoalStore};
use crate::domains::help_offers::store::{BaseHelpOfferStore, PgHelpOfferStore};
use crate::domains::matching::MatchingConfig;
use crate::domains::notifications::ExpoNotificationService;
use crate::domains::users::store::{BaseUserStore, PgUserStore};
use crate::kernel::{
    BaseChatService, BaseEmbeddingService, BaseNotificationService, OpenAIEmbeddingService,
};

/// Server dependencies accessible to domain actions
#[derive(Clone)]
pub struct ServerDeps {
    pub goals: Arc<dyn BaseGoalStore>,
    pub help_offers: Arc<dyn BaseHelpOfferStore>,
    pub users: Arc<dyn BaseUserStore>,
    pub connections: Arc<dyn BaseConnectionStore>,
    pub embedding_service: Arc<dyn BaseEmbeddingService>,
    pub chat_service: Arc<dyn BaseChatService>,
    pub notification_service: Arc<dyn BaseNotificationService>,
    /// Matching configuration, fixed at construction time
    pub matching: MatchingConfig,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        goals: Arc<dyn BaseGoalStore>,
        help_offers: Arc<dyn BaseHelpOfferStore>,
        users: Arc<dyn BaseUserStore>,
        connections: Arc<dyn BaseConnectionStore>,
        embedding_service: Arc<dyn BaseEmbeddingService>,
        chat_service: Arc<dyn BaseChatService>,
        notification_service: Arc<dyn BaseNotificationService>,
        matching: MatchingConfig,
    ) -> Self {
        Self {
            goals,
            help_offers,
            users,
            connections,
            embedding_service,
            chat_service,
            notification_service,
            matching,
        }
    }

    /// Production wiring: Postgres stores, OpenAI embeddings, Expo push
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        let users: Arc<dyn BaseUserStore> = Arc::new(PgUserStore::new(pool.clone()));

        Self {
            goals: Arc::new(PgGoalStore::new(pool.clone())),
            help_offers: Arc::new(PgHelpOfferStore::new(pool.clone())),
            users: users.clone(),
            connections: Arc::new(PgConnectionStore::new(pool.clone())),
            embedding_service: Arc::new(OpenAIEmbeddingService::new(
                config.openai_api_key.clone(),
            )),
            chat_service: Arc::new(PgChatService::new(pool)),
            notification_service: Arc::new(ExpoNotificationService::new(
                config.expo_access_token.clone(),
                users,
            )),
            matching: config.matching(),
        }
    }
}
