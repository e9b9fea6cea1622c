//! Ready-state polling utility
//!
//! Provides wait_for_ready_state() which polls `document.readyState` with
//! exponential backoff. Navigation returns as soon as the browser commits the
//! new document, so the parse and load milestones have to be observed by
//! polling the page itself.

use std::time::Duration;

use chromiumoxide::Page;

use crate::browser::{BrowserError, BrowserResult};

/// Document milestones reported by `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// DOM parsed (`interactive` or `complete`)
    Parsed,
    /// All subresources loaded (`complete`)
    Loaded,
}

impl ReadyState {
    fn satisfied_by(self, state: &str) -> bool {
        match self {
            ReadyState::Parsed => state == "interactive" || state == "complete",
            ReadyState::Loaded => state == "complete",
        }
    }
}

const READY_STATE_QUERY: &str =
    "location.href === 'about:blank' ? 'blank' : document.readyState";

/// Wait for the page to reach `target` using exponential backoff polling
///
/// `timeout` of `None` polls until the state is reached; callers that treat
/// the wait as best-effort bound it themselves.
///
/// # Polling Strategy
/// - Starts at 100ms intervals
/// - Doubles each retry (exponential backoff)
/// - Caps at 1 second maximum interval
pub async fn wait_for_ready_state(
    page: &Page,
    target: ReadyState,
    timeout: Option<Duration>,
) -> BrowserResult<()> {
    let start = std::time::Instant::now();
    let mut poll_interval = Duration::from_millis(100);
    let max_interval = Duration::from_secs(1);

    loop {
        // Evaluation can fail while the old execution context is torn down
        if let Ok(result) = page.evaluate(READY_STATE_QUERY).await
            && let Ok(state) = result.into_value::<String>()
            && target.satisfied_by(&state)
        {
            return Ok(());
        }

        if let Some(limit) = timeout
            && start.elapsed() >= limit
        {
            return Err(BrowserError::Timeout(format!(
                "document did not reach {:?} state within {}ms",
                target,
                limit.as_millis()
            )));
        }

        tokio::time::sleep(poll_interval).await;

        poll_interval = (poll_interval * 2).min(max_interval);
    }
}
