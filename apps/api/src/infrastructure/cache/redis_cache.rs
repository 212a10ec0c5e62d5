use anyhow::Result;
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::{future::Future, time::Duration};
use tracing::{debug, error, warn};

/// Lock TTL in seconds, so a crashed holder cannot block a key for long.
const LOCK_TTL_SECONDS: u64 = 10;
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(50);
/// 40 * 50ms = 2 seconds of waiting for a peer to fill the key.
const LOCK_MAX_RETRIES: u32 = 40;
/// How long a stale copy outlives the fresh one.
const STALE_EXTENSION_SECONDS: u64 = 120;

/// JSON fetch-through cache over a shared Redis connection.
///
/// Redis trouble degrades to a direct fetch. Errors from the fetch itself are
/// always returned to the caller.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        value
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, serde_json::to_string(value)?, ttl).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    /// Read `key`, or fill it from `fetch_fn` with stampede protection.
    ///
    /// A miss takes a `SET NX` lock; the winner fetches and writes both the fresh
    /// key and a longer-lived stale copy. Losers poll the fresh key, then fall
    /// back to the stale copy, then fetch directly.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl: u64, fetch_fn: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(cached)) => {
                debug!(key, "Cache hit");
                return Ok(cached);
            }
            Ok(None) => debug!(key, "Cache miss"),
            Err(e) => {
                error!(key, error = %e, "Redis read failed, bypassing cache");
                return fetch_fn().await;
            }
        }

        let stale_key = format!("{key}:stale");
        let lock_key = format!("{key}:lock");
        let mut conn = self.conn.clone();

        let lock_acquired = redis::cmd("SET")
            .arg(&lock_key)
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(LOCK_TTL_SECONDS)
            .query_async::<Option<String>>(&mut conn)
            .await
            .map(|reply| reply.is_some())
            .unwrap_or_else(|e| {
                error!(key, error = %e, "Cache lock failed, treating as held");
                false
            });

        if lock_acquired {
            let result = fetch_fn().await;
            if let Ok(value) = &result {
                if let Err(e) = self.set(key, value, ttl).await {
                    error!(key, error = %e, "Cache write failed");
                }
                if let Err(e) = self
                    .set(&stale_key, value, ttl + STALE_EXTENSION_SECONDS)
                    .await
                {
                    warn!(key, error = %e, "Stale copy write failed");
                }
            }
            if let Err(e) = conn.del::<_, ()>(&lock_key).await {
                warn!(key, error = %e, "Cache lock release failed; it expires in {LOCK_TTL_SECONDS}s");
            }
            return result;
        }

        for _ in 0..LOCK_MAX_RETRIES {
            tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
            match self.get::<T>(key).await {
                Ok(Some(cached)) => return Ok(cached),
                Ok(None) => continue,
                Err(e) => {
                    error!(key, error = %e, "Redis failed while waiting on peer");
                    break;
                }
            }
        }

        match self.get::<T>(&stale_key).await {
            Ok(Some(stale)) => {
                warn!(key, "Serving stale cache entry");
                return Ok(stale);
            }
            Ok(None) => {}
            Err(e) => error!(key, error = %e, "Stale cache read failed"),
        }

        warn!(key, "Cache fill timed out, fetching directly");
        fetch_fn().await
    }
}
