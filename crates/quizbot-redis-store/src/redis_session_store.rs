//! `Redis` implementation of the `SessionStore` trait.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use tracing::debug;

use quizbot_core::error::DomainError;
use quizbot_core::store::SessionStore;

/// Default bound for connecting and for each command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection parameters for the Redis server.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// `AUTH` password, if the server requires one.
    pub password: Option<String>,
    /// Upper bound for establishing a connection.
    pub connection_timeout: Duration,
    /// Upper bound for any single command.
    pub response_timeout: Duration,
}

impl RedisSettings {
    /// Settings for `host:port` with the default timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, password: Option<String>) -> Self {
        Self {
            host: host.into(),
            port,
            password,
            connection_timeout: DEFAULT_TIMEOUT,
            response_timeout: DEFAULT_TIMEOUT,
        }
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                password: self.password.clone(),
                ..RedisConnectionInfo::default()
            },
        }
    }
}

/// Redis-backed session store.
///
/// The connection manager reconnects transparently; commands issued while
/// the server is unreachable fail within the response timeout.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: ConnectionManager,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore").finish_non_exhaustive()
    }
}

fn unavailable(err: &redis::RedisError) -> DomainError {
    DomainError::StoreUnavailable(err.to_string())
}

impl RedisSessionStore {
    /// Connects to the server described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the server cannot be reached
    /// within the connection timeout.
    pub async fn connect(settings: &RedisSettings) -> Result<Self, DomainError> {
        let client = redis::Client::open(settings.connection_info()).map_err(|e| unavailable(&e))?;
        Self::from_client(client, settings.connection_timeout, settings.response_timeout).await
    }

    /// Connects using a `redis://` URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the URL is invalid or the
    /// server cannot be reached.
    pub async fn connect_url(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(|e| unavailable(&e))?;
        Self::from_client(client, DEFAULT_TIMEOUT, DEFAULT_TIMEOUT).await
    }

    async fn from_client(
        client: redis::Client,
        connection_timeout: Duration,
        response_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(connection_timeout)
            .set_response_timeout(response_timeout)
            .set_number_of_retries(2);
        let connection = ConnectionManager::new_with_config(client, config)
            .await
            .map_err(|e| unavailable(&e))?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| unavailable(&e))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut connection = self.connection.clone();
        connection
            .set::<_, _, ()>(key, value)
            .await
            .map_err(|e| unavailable(&e))
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, DomainError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut connection = self.connection.clone();
        redis::cmd("MGET")
            .arg(keys)
            .query_async::<Vec<Option<String>>>(&mut connection)
            .await
            .map_err(|e| unavailable(&e))
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), DomainError> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set(key, value).ignore();
        }
        debug!(keys = entries.len(), "writing session update");
        let mut connection = self.connection.clone();
        pipe.query_async::<()>(&mut connection)
            .await
            .map_err(|e| unavailable(&e))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut connection = self.connection.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut connection)
            .await
            .map(|_| ())
            .map_err(|e| unavailable(&e))
    }
}
