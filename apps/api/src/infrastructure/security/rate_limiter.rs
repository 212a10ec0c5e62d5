use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::warn;

/// Fixed-window counters in Redis. Fails open when Redis is unreachable.
#[derive(Clone)]
pub struct RateLimiter {
    conn: ConnectionManager,
}

impl RateLimiter {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Count one hit against `key` and report whether it stays within `limit`
    /// for the current `window_seconds` window.
    pub async fn check(&self, key: &str, limit: u32, window_seconds: u64) -> bool {
        let mut conn = self.conn.clone();
        let k = format!("rl:{key}");
        let count: u32 = match conn.incr(&k, 1).await {
            Ok(count) => count,
            Err(e) => {
                warn!(key, error = %e, "Rate limiter unavailable, allowing request");
                return true;
            }
        };
        if count == 1 {
            let _: redis::RedisResult<()> = conn.expire(&k, window_seconds as i64).await;
        }
        count <= limit
    }

    /// Succeeds once per `seconds` for `key`.
    pub async fn cooldown(&self, key: &str, seconds: u64) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(format!("cd:{key}"))
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(seconds)
            .query_async::<Option<String>>(&mut conn)
            .await
            .map(|reply| reply.is_some())
            .unwrap_or_else(|e| {
                warn!(key, error = %e, "Cooldown check unavailable, allowing request");
                true
            })
    }
}
