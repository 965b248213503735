//! Per-client fixed-window rate limiting
//!
//! Clients are identified by the `x-forwarded-for` header. Requests without
//! it share the `localhost` bucket.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use voice_relay_config::RateLimitConfig;

/// Counter state for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_reset_at: Instant,
}

/// Fixed-window request counter keyed by client identity
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    records: DashMap<String, RateLimitRecord>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            records: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_millis(config.window_ms))
    }

    /// Count a request from `identity`, returning whether it may proceed
    pub fn allow(&self, identity: &str) -> bool {
        self.allow_at(identity, Instant::now())
    }

    /// [`allow`](Self::allow) with an explicit clock reading
    pub fn allow_at(&self, identity: &str, now: Instant) -> bool {
        let fresh = RateLimitRecord {
            count: 1,
            window_reset_at: now + self.window,
        };

        let mut entry = self.records.entry(identity.to_string()).or_insert(RateLimitRecord {
            count: 0,
            window_reset_at: now,
        });
        let record = entry.value_mut();

        if record.count == 0 || now > record.window_reset_at {
            *record = fresh;
            return true;
        }

        if record.count >= self.max_requests {
            return false;
        }

        record.count += 1;
        true
    }

    /// Drop records whose window has elapsed, returning how many were removed
    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| now <= record.window_reset_at);
        before.saturating_sub(self.records.len())
    }

    /// Number of tracked clients
    pub fn tracked(&self) -> usize {
        self.records.len()
    }

    /// Current record for `identity`
    pub fn record(&self, identity: &str) -> Option<RateLimitRecord> {
        self.records.get(identity).map(|r| *r)
    }

    /// Periodically evict expired records
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.sweep_at(Instant::now());
                if removed > 0 {
                    tracing::debug!(removed, remaining = limiter.tracked(), "Swept rate limit records");
                }
            }
        })
    }
}

/// Client identity from `header`, or `fallback` when absent or unreadable
pub fn client_identity(headers: &HeaderMap, header: &str, fallback: &str) -> String {
    headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn limiter() -> RateLimiter {
        RateLimiter::new(10, Duration::from_millis(60_000))
    }

    #[test]
    fn test_eleventh_request_rejected() {
        let limiter = limiter();
        let start = Instant::now();

        for i in 0..10 {
            assert!(limiter.allow_at("client", start + Duration::from_millis(i)), "request {}", i + 1);
        }
        assert!(!limiter.allow_at("client", start + Duration::from_millis(10)));
        // Rejections do not increment the counter
        assert_eq!(limiter.record("client").unwrap().count, 10);
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..11 {
            limiter.allow_at("client", start);
        }
        // Still inside the window at exactly the reset instant
        assert!(!limiter.allow_at("client", start + Duration::from_millis(60_000)));

        let later = start + Duration::from_millis(60_001);
        assert!(limiter.allow_at("client", later));
        let record = limiter.record("client").unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.window_reset_at, later + Duration::from_millis(60_000));
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = limiter();
        let now = Instant::now();
        for _ in 0..10 {
            assert!(limiter.allow_at("a", now));
        }
        assert!(!limiter.allow_at("a", now));
        assert!(limiter.allow_at("b", now));
    }

    #[test]
    fn test_sweep_evicts_expired_records() {
        let limiter = limiter();
        let start = Instant::now();
        limiter.allow_at("old", start);
        limiter.allow_at("new", start + Duration::from_millis(30_000));

        let removed = limiter.sweep_at(start + Duration::from_millis(60_001));
        assert_eq!(removed, 1);
        assert!(limiter.record("old").is_none());
        assert!(limiter.record("new").is_some());
    }

    #[test]
    fn test_client_identity() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_identity(&headers, "x-forwarded-for", "localhost"), "localhost");

        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7"));
        assert_eq!(client_identity(&headers, "x-forwarded-for", "localhost"), "10.0.0.7");

        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(client_identity(&headers, "x-forwarded-for", "localhost"), "localhost");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_periodically() {
        let limiter = Arc::new(RateLimiter::new(10, Duration::from_millis(10)));
        // Window already over, so only the tick decides when it goes
        let expired = Instant::now().checked_sub(Duration::from_secs(1)).unwrap();
        limiter.allow_at("client", expired);
        assert_eq!(limiter.tracked(), 1);

        let handle = limiter.spawn_sweeper(Duration::from_secs(300));
        tokio::task::yield_now().await;
        assert_eq!(limiter.tracked(), 1);

        tokio::time::sleep(Duration::from_secs(301)).await;
        tokio::task::yield_now().await;

        assert_eq!(limiter.tracked(), 0);
        handle.abort();
    }
}
