//! Browser instance manager
//!
//! Owns the one Chrome process the tools share and hands out fresh pages.
//!
//! # Architecture
//!
//! Uses `Mutex<Option<LaunchedBrowser>>`:
//! - Lazy launch on first page request
//! - Health check on every access, relaunch after a crash
//! - Explicit shutdown that closes the process and removes its profile
//!
//! The lock is a `tokio::sync::Mutex` because it is held across `.await`
//! while launching, and it is released before any page work starts.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::BrowserConfig;
use crate::browser::{BrowserError, BrowserResult, ChromiumPage};
use crate::browser_setup::{LaunchedBrowser, launch};
use crate::session::{PageFactory, PageSession};

/// Lazily launched, self-healing browser shared by all tool invocations
///
/// Pages are never shared: every [`PageFactory::open_page`] call creates a
/// new tab owned by the caller.
pub struct BrowserManager {
    browser: Mutex<Option<LaunchedBrowser>>,
    config: BrowserConfig,
    navigation_timeout: Duration,
    profile_dir: PathBuf,
}

impl BrowserManager {
    /// Browser will be lazy-loaded on the first page request.
    pub fn new(config: BrowserConfig, navigation_timeout: Duration) -> Self {
        // Per-process profile so a second server doesn't hit Chrome's profile lock
        let profile_dir =
            std::env::temp_dir().join(format!("kodegen_reddit_{}", std::process::id()));
        Self {
            browser: Mutex::new(None),
            config,
            navigation_timeout,
            profile_dir,
        }
    }

    /// Make sure `slot` holds a browser that answers CDP commands
    ///
    /// A browser failing the `version()` check is torn down and replaced.
    async fn ensure_healthy(&self, slot: &mut Option<LaunchedBrowser>) -> Result<()> {
        if let Some(running) = slot.as_ref() {
            match running.browser.version().await {
                Ok(_) => {
                    debug!("Browser health check passed");
                    return Ok(());
                }
                Err(e) => {
                    warn!("Browser health check failed: {}. Relaunching", e);
                    if let Some(crashed) = slot.take() {
                        retire(crashed).await;
                    }
                }
            }
        }

        info!("Launching browser");
        *slot = Some(launch(&self.config, self.profile_dir.clone()).await?);
        Ok(())
    }

    /// Shutdown the browser if running
    ///
    /// Safe to call multiple times (subsequent calls are no-ops).
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(running) = self.browser.lock().await.take() {
            info!("Shutting down browser");
            retire(running).await;
        }
        Ok(())
    }

    pub async fn is_browser_running(&self) -> bool {
        self.browser.lock().await.is_some()
    }
}

/// Close Chrome, wait for the process to exit, then delete its profile
///
/// Errors are logged only; a crashed process may already be gone.
async fn retire(mut running: LaunchedBrowser) {
    if let Err(e) = running.browser.close().await {
        warn!("Failed to close browser cleanly: {}", e);
    }
    if let Err(e) = running.browser.wait().await {
        warn!("Failed to wait for browser exit: {}", e);
    }
    running.events.abort();

    // Chrome must have released its file handles before this runs
    if let Err(e) = std::fs::remove_dir_all(&running.profile_dir) {
        warn!(
            "Failed to remove browser profile {}: {}",
            running.profile_dir.display(),
            e
        );
    }
}

#[async_trait]
impl PageFactory for BrowserManager {
    async fn open_page(&self) -> BrowserResult<Box<dyn PageSession>> {
        let mut slot = self.browser.lock().await;
        self.ensure_healthy(&mut slot)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let running = slot
            .as_ref()
            .ok_or_else(|| BrowserError::PageCreationFailed("Browser not available".into()))?;

        let page = running
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        // Release lock before the caller starts driving the page
        drop(slot);
        debug!("Opened blank page");

        Ok(Box::new(ChromiumPage::new(page, self.navigation_timeout)))
    }
}
