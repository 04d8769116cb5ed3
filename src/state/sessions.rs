//! Session storage implementation
//!
//! This module handles sign-in sessions using Redis: opaque tokens
//! mapped to user ids, with expiration handled by key TTL.

use redis::AsyncCommands;
use tracing::{debug, error};
use uuid::Uuid;
use crate::config::RedisConfig;
use crate::utils::errors::Result;

/// Redis-backed session store
#[derive(Clone)]
pub struct SessionStore {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl SessionStore {
    /// Create a new session store instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Create a session for a user and return the opaque token
    pub async fn create(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let key = self.session_key(&token);
        let mut conn = self.connection_manager.clone();

        match conn.set_ex::<_, _, ()>(&key, user_id, self.config.session_ttl_seconds).await {
            Ok(_) => {
                debug!(user_id = user_id, "Session created");
                Ok(token)
            }
            Err(e) => {
                error!(user_id = user_id, error = %e, "Failed to store session");
                Err(e.into())
            }
        }
    }

    /// Resolve a session token to a user id
    pub async fn resolve(&self, token: &str) -> Result<Option<i64>> {
        let key = self.session_key(token);
        let mut conn = self.connection_manager.clone();

        let user_id: Option<i64> = conn.get(&key).await?;
        debug!(found = user_id.is_some(), "Session lookup");
        Ok(user_id)
    }

    /// Destroy a session
    pub async fn destroy(&self, token: &str) -> Result<()> {
        let key = self.session_key(token);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        if deleted > 0 {
            debug!("Session destroyed");
        }

        Ok(())
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn session_key(&self, token: &str) -> String {
        format!("{}session:{}", self.config.prefix, token)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
