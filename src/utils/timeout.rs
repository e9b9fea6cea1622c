//! Timeout validation and bounded waiting for browser operations

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::browser::{BrowserError, BrowserResult};
use crate::utils::errors::ConfigError;

/// Maximum timeout for browser navigation operations (5 minutes)
/// Covers slow-loading sites, heavy SPAs, and network delays
pub const MAX_NAVIGATION_TIMEOUT_MS: u64 = 300_000; // 5 minutes

/// Maximum timeout for in-page waits and delays (30 seconds)
pub const MAX_INTERACTION_TIMEOUT_MS: u64 = 30_000; // 30 seconds

/// Validate timeout for navigation operations
///
/// # Returns
/// * `Ok(Duration)` - Validated Duration object
/// * `Err(ConfigError)` - If timeout is zero or exceeds MAX_NAVIGATION_TIMEOUT_MS
pub fn validate_navigation_timeout(
    field: &'static str,
    timeout_ms: u64,
) -> Result<Duration, ConfigError> {
    if timeout_ms == 0 {
        return Err(ConfigError::InvalidSetting {
            field,
            reason: "navigation timeout must be greater than zero".to_string(),
        });
    }

    if timeout_ms > MAX_NAVIGATION_TIMEOUT_MS {
        return Err(ConfigError::InvalidSetting {
            field,
            reason: format!(
                "cannot exceed {}ms ({} minutes). Received: {}ms ({:.1} minutes)",
                MAX_NAVIGATION_TIMEOUT_MS,
                MAX_NAVIGATION_TIMEOUT_MS / 60_000,
                timeout_ms,
                timeout_ms as f64 / 60_000.0
            ),
        });
    }

    Ok(Duration::from_millis(timeout_ms))
}

/// Validate timeout for waits that happen on an already loaded page
/// (load-state cap, settle delay). Zero is allowed and means "don't wait".
pub fn validate_interaction_timeout(
    field: &'static str,
    timeout_ms: u64,
) -> Result<Duration, ConfigError> {
    if timeout_ms > MAX_INTERACTION_TIMEOUT_MS {
        return Err(ConfigError::InvalidSetting {
            field,
            reason: format!(
                "cannot exceed {}ms ({} seconds). Received: {}ms ({} seconds)",
                MAX_INTERACTION_TIMEOUT_MS,
                MAX_INTERACTION_TIMEOUT_MS / 1000,
                timeout_ms,
                timeout_ms / 1000
            ),
        });
    }

    Ok(Duration::from_millis(timeout_ms))
}

/// Wait for `signal` for at most `limit`, reporting readiness instead of failing
///
/// Returns `true` when the signal completed successfully in time. Expiry and
/// errors from the signal both yield `false`; callers carry on either way.
pub async fn soft_wait<F, E>(limit: Duration, signal: F) -> bool
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(limit, signal).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            debug!("Soft wait ended with error, continuing: {}", e);
            false
        }
        Err(_) => {
            debug!("Soft wait timed out after {}ms, continuing", limit.as_millis());
            false
        }
    }
}

/// Run `operation` to completion within `limit` or fail with [`BrowserError::Timeout`]
///
/// Multi-step operations share the one deadline.
pub async fn within_deadline<T, F>(limit: Duration, what: &str, operation: F) -> BrowserResult<T>
where
    F: Future<Output = BrowserResult<T>>,
{
    tokio::time::timeout(limit, operation).await.map_err(|_| {
        BrowserError::Timeout(format!("{} did not finish within {}ms", what, limit.as_millis()))
    })?
}
