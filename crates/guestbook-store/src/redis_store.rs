//! Redis-backed store: one connection manager per endpoint.
//!
//! Each endpoint connects on first use, so the service starts even while
//! Redis is still coming up; until then individual calls fail with
//! `Unavailable`. Once established, `ConnectionManager` reconnects on its own
//! and is cheap to clone, so each command clones the handle instead of
//! holding a lock.

use async_trait::async_trait;
use guestbook_core::config::RedisConfig;
use guestbook_core::error::{GuestbookError, Result};
use guestbook_core::traits::GuestbookStore;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::OnceCell;

pub struct RedisStore {
    primary: Endpoint,
    replica: Endpoint,
}

impl RedisStore {
    /// Validate both addresses. Connections are opened on first use.
    pub fn open(config: &RedisConfig) -> Result<Self> {
        let primary = Endpoint::new("primary", &config.master_url())?;
        let replica = Endpoint::new("replica", &config.slave_url())?;
        tracing::info!(
            "🗄️ Redis configured (primary={}, replica={})",
            config.master,
            config.slave
        );
        Ok(Self { primary, replica })
    }

    async fn primary(&self) -> Result<ConnectionManager> {
        self.primary.connection().await
    }

    async fn replica(&self) -> Result<ConnectionManager> {
        self.replica.connection().await
    }
}

struct Endpoint {
    role: &'static str,
    client: Client,
    conn: OnceCell<ConnectionManager>,
}

impl Endpoint {
    fn new(role: &'static str, url: &str) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| GuestbookError::Config(format!("Invalid Redis address {url}: {e}")))?;
        Ok(Self {
            role,
            client,
            conn: OnceCell::new(),
        })
    }

    /// The shared manager, connecting first if no attempt has succeeded yet.
    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                // One quick retry, so a request against a down Redis fails fast.
                let config = ConnectionManagerConfig::new().set_number_of_retries(1);
                let conn = self
                    .client
                    .get_connection_manager_with_config(config)
                    .await
                    .map_err(store_error)?;
                tracing::info!("🗄️ Redis {} connected", self.role);
                Ok::<_, GuestbookError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }
}

/// Split connectivity failures from command failures.
fn store_error(e: RedisError) -> GuestbookError {
    if e.is_connection_refusal() || e.is_io_error() || e.is_timeout() || e.is_connection_dropped() {
        GuestbookError::Unavailable(e.to_string())
    } else {
        GuestbookError::Store(e.to_string())
    }
}

#[async_trait]
impl GuestbookStore for RedisStore {
    fn backend(&self) -> &str {
        "redis"
    }

    async fn append(&self, list: &str, value: &str) -> Result<usize> {
        let mut conn = self.primary().await?;
        let len: usize = conn.rpush(list, value).await.map_err(store_error)?;
        tracing::debug!("RPUSH {list} → {len} entries");
        Ok(len)
    }

    async fn read_all(&self, list: &str) -> Result<Vec<String>> {
        let mut conn = self.replica().await?;
        conn.lrange(list, 0, -1).await.map_err(store_error)
    }

    async fn snapshot(&self, lists: &[&str]) -> Result<Vec<Vec<String>>> {
        if lists.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipe = redis::pipe();
        pipe.atomic();
        for list in lists {
            pipe.lrange(*list, 0, -1);
        }
        let mut conn = self.replica().await?;
        let snapshot: Vec<Vec<String>> = pipe.query_async(&mut conn).await.map_err(store_error)?;
        Ok(snapshot)
    }

    async fn get_counter(&self, hash: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.primary().await?;
        conn.hget(hash, field).await.map_err(store_error)
    }

    async fn increment_counter(&self, hash: &str, field: &str) -> Result<String> {
        let mut conn = self.primary().await?;
        let value: i64 = conn.hincr(hash, field, 1).await.map_err(store_error)?;
        Ok(value.to_string())
    }

    /// Raw INFO reply; the bytes are not required to be UTF-8.
    async fn info(&self) -> Result<Vec<u8>> {
        let mut conn = self.primary().await?;
        let info: Vec<u8> = redis::cmd("INFO")
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(info)
    }
}
