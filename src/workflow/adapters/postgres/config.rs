//! Connection and isolation settings for the `PostgreSQL` adapter.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// `PostgreSQL` connection pool type used by workflow adapters.
pub type WorkflowPgPool = Pool<ConnectionManager<PgConnection>>;

/// Environment variable holding the connection URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable holding the maximum pool size.
pub const POOL_SIZE_ENV: &str = "TRELLIS_PG_POOL_SIZE";

/// Environment variable holding the transaction isolation level.
pub const ISOLATION_ENV: &str = "TRELLIS_PG_ISOLATION";

/// Isolation level workflow transactions begin with.
///
/// Repositioning reads a range of orders and then writes each of them, so
/// anything weaker than `Serializable` lets two concurrent moves in one
/// project interleave and leave duplicate orders behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IsolationLevel {
    /// `READ COMMITTED`.
    ReadCommitted,
    /// `REPEATABLE READ`.
    RepeatableRead,
    /// `SERIALIZABLE`.
    #[default]
    Serializable,
}

impl IsolationLevel {
    /// Returns the statement that opens a transaction at this level.
    #[must_use]
    pub const fn begin_sql(self) -> &'static str {
        match self {
            Self::ReadCommitted => "BEGIN ISOLATION LEVEL READ COMMITTED",
            Self::RepeatableRead => "BEGIN ISOLATION LEVEL REPEATABLE READ",
            Self::Serializable => "BEGIN ISOLATION LEVEL SERIALIZABLE",
        }
    }
}

impl TryFrom<&str> for IsolationLevel {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "read_committed" => Ok(Self::ReadCommitted),
            "repeatable_read" => Ok(Self::RepeatableRead),
            "serializable" => Ok(Self::Serializable),
            _ => Err(ConfigError::InvalidIsolationLevel(value.to_owned())),
        }
    }
}

/// Errors raised while reading adapter configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No connection URL was provided.
    #[error("{DATABASE_URL_ENV} is not set")]
    MissingDatabaseUrl,

    /// The pool size is not a positive integer.
    #[error("invalid pool size '{0}', expected a positive integer")]
    InvalidPoolSize(String),

    /// The isolation level is not recognised.
    #[error("invalid isolation level '{0}'")]
    InvalidIsolationLevel(String),
}

/// Settings for [`super::PostgresWorkflowStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresStoreConfig {
    database_url: String,
    max_pool_size: u32,
    connection_timeout: Duration,
    isolation_level: IsolationLevel,
}

impl PostgresStoreConfig {
    /// Default maximum number of pooled connections.
    pub const DEFAULT_POOL_SIZE: u32 = 10;

    /// Default time to wait for a pooled connection.
    pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: Self::DEFAULT_POOL_SIZE,
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
            isolation_level: IsolationLevel::default(),
        }
    }

    /// Reads the configuration from `DATABASE_URL`, `TRELLIS_PG_POOL_SIZE`,
    /// and `TRELLIS_PG_ISOLATION`. Unset optional variables keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is missing or an optional value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var(DATABASE_URL_ENV).map_err(|_| ConfigError::MissingDatabaseUrl)?;
        let mut config = Self::new(database_url);

        if let Ok(raw) = env::var(POOL_SIZE_ENV) {
            let size = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| ConfigError::InvalidPoolSize(raw.clone()))?;
            config = config.with_max_pool_size(size);
        }
        if let Ok(raw) = env::var(ISOLATION_ENV) {
            config = config.with_isolation_level(IsolationLevel::try_from(raw.as_str())?);
        }
        Ok(config)
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Sets the time to wait for a pooled connection.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the isolation level transactions begin with.
    #[must_use]
    pub const fn with_isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = level;
        self
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    /// Returns the time to wait for a pooled connection.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Returns the isolation level transactions begin with.
    #[must_use]
    pub const fn isolation_level(&self) -> IsolationLevel {
        self.isolation_level
    }

    /// Builds a connection pool from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when the pool cannot open its first connection.
    pub fn build_pool(&self) -> Result<WorkflowPgPool, PoolError> {
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.as_str());
        Pool::builder()
            .max_size(self.max_pool_size)
            .connection_timeout(self.connection_timeout)
            .build(manager)
    }
}
