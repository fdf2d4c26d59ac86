//! Rate limiting as an injected capability.
//!
//! Handlers never reach for a global limiter: `AppState` carries one
//! `Arc<dyn RateLimiter>` per endpoint family, keyed GCRA limiters from
//! `governor` in production.

mod gcra;

pub use self::gcra::GovernorLimiter;

use crate::config::RateLimitSettings;
use crate::error::{ApiError, ApiResult};
use log::warn;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

pub trait RateLimiter: Send + Sync {
    /// Counts one request for `key` and decides whether it may proceed.
    fn check(&self, key: &str) -> RateDecision;
}

/// Limiters per endpoint family.
#[derive(Clone)]
pub struct RateLimiters {
    /// LLM-backed endpoints, keyed by agency.
    pub ai: Arc<dyn RateLimiter>,
    /// Login, keyed by peer address and email.
    pub auth: Arc<dyn RateLimiter>,
}

impl RateLimiters {
    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        let ai_window = Duration::from_secs(settings.ai_window_secs.max(1));
        let auth_window = Duration::from_secs(settings.auth_window_secs.max(1));
        Self {
            ai: Arc::new(GovernorLimiter::new(settings.ai_requests, ai_window)),
            auth: Arc::new(GovernorLimiter::new(settings.auth_requests, auth_window)),
        }
    }
}

/// Turns a `Limited` decision into a 429.
pub fn enforce(limiter: &dyn RateLimiter, key: &str) -> ApiResult<()> {
    match limiter.check(key) {
        RateDecision::Allowed => Ok(()),
        RateDecision::Limited { retry_after } => {
            let retry_after_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            warn!("rate limit exceeded for {} (retry in {}s)", key, retry_after_secs);
            Err(ApiError::RateLimited {
                retry_after_secs: retry_after_secs.max(1),
            })
        }
    }
}
