//! Application state wiring all services together.
//!
//! Services are generic over repository/provider/hasher traits; AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;

use chrono::Utc;

use chatdesk_core::auth::service::AuthService;
use chatdesk_core::chat::exchange::ChatExchange;
use chatdesk_core::profile::service::ProfileService;
use chatdesk_infra::config::AppConfig;
use chatdesk_infra::crypto::credentials::Argon2Credentials;
use chatdesk_infra::llm::deepseek::DeepSeekProvider;
use chatdesk_infra::mail::log::LogMailer;
use chatdesk_infra::sqlite::conversation::SqliteConversationRepository;
use chatdesk_infra::sqlite::pool::DatabasePool;
use chatdesk_infra::sqlite::profile::SqliteProfileRepository;
use chatdesk_infra::sqlite::session::{PurgeCounts, SqliteSessionRepository};
use chatdesk_infra::sqlite::user::SqliteUserRepository;
use chatdesk_infra::storage::AvatarStore;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatExchange = ChatExchange<SqliteConversationRepository, DeepSeekProvider>;

pub type ConcreteProfileService = ProfileService<SqliteProfileRepository>;

pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, SqliteSessionRepository, Argon2Credentials, LogMailer>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ConcreteChatExchange>,
    pub profiles: Arc<ConcreteProfileService>,
    pub auth: Arc<ConcreteAuthService>,
    pub avatars: AvatarStore,
    pub config: Arc<AppConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Connect to the database (running migrations) and wire services.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        let db_pool = DatabasePool::new(&config.database_url()).await?;
        Self::with_pool(config, db_pool)
    }

    /// Wire services on top of an existing pool.
    pub fn with_pool(config: AppConfig, db_pool: DatabasePool) -> anyhow::Result<Self> {
        let provider = DeepSeekProvider::new(config.api_key.clone(), &config.completion)?;
        let chat = ChatExchange::new(
            SqliteConversationRepository::new(db_pool.clone()),
            provider,
            config.completion.clone(),
        );

        let profiles = ProfileService::new(SqliteProfileRepository::new(db_pool.clone()));

        let mut auth = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool.clone()),
            Argon2Credentials::new(),
            LogMailer::new(config.mail_from.clone()),
        );
        if let Some(url) = &config.public_url {
            auth = auth.with_public_url(url.clone());
        }

        Ok(Self {
            chat: Arc::new(chat),
            profiles: Arc::new(profiles),
            auth: Arc::new(auth),
            avatars: AvatarStore::new(config.media_dir()),
            config: Arc::new(config),
            db_pool,
        })
    }

    /// Delete expired sessions and spent password reset links.
    pub async fn purge_expired_credentials(&self) -> anyhow::Result<PurgeCounts> {
        let counts = SqliteSessionRepository::new(self.db_pool.clone())
            .purge_expired(Utc::now())
            .await?;
        tracing::info!(
            sessions = counts.sessions,
            resets = counts.resets,
            "Expired credentials purged"
        );
        Ok(counts)
    }
}
