//! Fixed-window request rate limiting, keyed by client address.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::config::RateLimitConfig;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request is allowed.
    Allowed { remaining: u32 },
    /// Rate limit exceeded.
    Exceeded { retry_after_secs: u64 },
}

impl Decision {
    /// Returns true if the request is allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// State for a single client's window.
#[derive(Debug, Clone)]
struct WindowState {
    count: u32,
    window_start: DateTime<Utc>,
}

impl WindowState {
    fn new() -> Self {
        Self {
            count: 0,
            window_start: Utc::now(),
        }
    }
}

/// A fixed-window rate limiter over client keys.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    enabled: bool,
    /// State per client key (the peer IP address).
    state: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl FixedWindowLimiter {
    /// Creates a limiter from configuration.
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::seconds(config.window_seconds as i64),
            enabled: config.enabled,
            state: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Checks whether a request from `key` is allowed and, if so, counts
    /// it against the current window.
    pub fn check_and_increment(&self, key: &str) -> Decision {
        if !self.enabled {
            return Decision::Allowed {
                remaining: self.max_requests,
            };
        }

        let mut state = self.state.write().unwrap();
        let now = Utc::now();

        let window_state = state.entry(key.to_string()).or_insert_with(WindowState::new);

        if now - window_state.window_start >= self.window {
            window_state.window_start = now;
            window_state.count = 0;
        }

        if window_state.count >= self.max_requests {
            let resets_at = window_state.window_start + self.window;
            let retry_after_secs = (resets_at - now).num_seconds().max(1) as u64;
            return Decision::Exceeded { retry_after_secs };
        }

        window_state.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - window_state.count,
        }
    }
}

impl Clone for FixedWindowLimiter {
    fn clone(&self) -> Self {
        Self {
            max_requests: self.max_requests,
            window: self.window,
            enabled: self.enabled,
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_seconds: u64, enabled: bool) -> FixedWindowLimiter {
        FixedWindowLimiter::new(&RateLimitConfig {
            enabled,
            max_requests,
            window_seconds,
        })
    }

    #[test]
    fn allows_under_limit() {
        let limiter = limiter(10, 60, true);

        for i in 0..10 {
            let decision = limiter.check_and_increment("10.0.0.1");
            assert_eq!(
                decision,
                Decision::Allowed {
                    remaining: 10 - i - 1
                }
            );
        }
    }

    #[test]
    fn blocks_over_limit() {
        let limiter = limiter(5, 60, true);

        for _ in 0..5 {
            assert!(limiter.check_and_increment("10.0.0.1").is_allowed());
        }

        let decision = limiter.check_and_increment("10.0.0.1");
        assert!(!decision.is_allowed());
        assert!(matches!(decision, Decision::Exceeded { retry_after_secs } if retry_after_secs >= 1));
    }

    #[test]
    fn keys_are_isolated() {
        let limiter = limiter(2, 60, true);

        limiter.check_and_increment("10.0.0.1");
        limiter.check_and_increment("10.0.0.1");

        assert!(!limiter.check_and_increment("10.0.0.1").is_allowed());
        assert!(limiter.check_and_increment("10.0.0.2").is_allowed());
    }

    #[test]
    fn disabled_limiter_always_allows() {
        let limiter = limiter(1, 60, false);

        for _ in 0..100 {
            assert!(limiter.check_and_increment("10.0.0.1").is_allowed());
        }
    }
}
