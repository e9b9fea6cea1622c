//! Locating and launching the Chrome process behind [`crate::BrowserManager`]

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Handler;
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::BrowserConfig;

/// A running Chrome process together with its CDP event pump
///
/// `profile_dir` belongs to this process and is removed by
/// [`crate::BrowserManager::shutdown`] once Chrome has exited.
pub struct LaunchedBrowser {
    pub browser: Browser,
    pub events: JoinHandle<()>,
    pub profile_dir: PathBuf,
}

impl Drop for LaunchedBrowser {
    fn drop(&mut self) {
        self.events.abort();
    }
}

/// Installed Chrome/Chromium locations checked before falling back to a download
fn installed_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = if cfg!(target_os = "windows") {
        vec![
            r"C:\Program Files\Google\Chrome\Application\chrome.exe".into(),
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe".into(),
        ]
    } else if cfg!(target_os = "macos") {
        vec![
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome".into(),
            "/Applications/Chromium.app/Contents/MacOS/Chromium".into(),
        ]
    } else {
        [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
        .iter()
        .map(PathBuf::from)
        .collect()
    };

    if cfg!(target_os = "windows")
        && let Some(local) = dirs::data_local_dir()
    {
        candidates.push(local.join(r"Google\Chrome\Application\chrome.exe"));
    }
    if cfg!(target_os = "macos")
        && let Some(home) = dirs::home_dir()
    {
        candidates.push(home.join("Applications/Google Chrome.app/Contents/MacOS/Google Chrome"));
    }

    candidates
}

/// `CHROMIUM_PATH`, then the first installed candidate, then a managed download
async fn chrome_executable() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("CHROMIUM_PATH").map(PathBuf::from) {
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!("CHROMIUM_PATH does not exist: {}", path.display());
    }

    if let Some(path) = installed_candidates().into_iter().find(|p| p.exists()) {
        info!("Found browser at {}", path.display());
        return Ok(path);
    }

    fetch_chromium().await
}

/// Download Chromium into the user cache, reusing an earlier download
async fn fetch_chromium() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("kodegen_reddit")
        .join("chromium");
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    info!("No local Chrome found, fetching Chromium into {}", cache_dir.display());
    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Failed to build fetcher options")?;
    let revision = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to fetch Chromium")?;

    Ok(revision.executable_path)
}

/// Command-line switches for the scraping browser
fn chrome_flags(config: &BrowserConfig, in_container: bool) -> Vec<&'static str> {
    let mut flags = vec![
        "--no-first-run",
        "--no-default-browser-check",
        "--disable-notifications",
        "--mute-audio",
    ];

    if config.disable_security {
        flags.extend(["--disable-web-security", "--ignore-certificate-errors"]);
    }

    // setuid sandbox is unavailable inside containers
    if in_container || config.disable_security {
        flags.extend(["--no-sandbox", "--disable-setuid-sandbox"]);
    }

    flags
}

fn in_container() -> bool {
    Path::new("/.dockerenv").exists()
        || std::env::var_os("container").is_some()
        || std::env::var_os("KUBERNETES_SERVICE_HOST").is_some()
}

/// chromiumoxide fails to decode some CDP events newer Chrome builds emit
fn is_undecodable_event(message: &str) -> bool {
    message.contains("data did not match any variant of untagged enum Message")
        || message.contains("Failed to deserialize WS response")
}

async fn pump_events(mut handler: Handler) {
    while let Some(event) = handler.next().await {
        if let Err(e) = event {
            let message = e.to_string();
            if is_undecodable_event(&message) {
                trace!("Ignoring undecodable CDP event: {}", message);
            } else {
                error!("Browser handler error: {}", message);
            }
        }
    }
    debug!("Browser event stream ended");
}

/// Launch Chrome with a private profile at `profile_dir`
///
/// The profile directory is removed again if the launch fails.
pub async fn launch(config: &BrowserConfig, profile_dir: PathBuf) -> Result<LaunchedBrowser> {
    let executable = chrome_executable().await?;
    std::fs::create_dir_all(&profile_dir).context("Failed to create browser profile directory")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(config.window.width, config.window.height)
        .user_data_dir(&profile_dir)
        .chrome_executable(executable);

    builder = if config.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    for flag in chrome_flags(config, in_container()) {
        builder = builder.arg(flag);
    }

    let launched = match builder.build() {
        Ok(browser_config) => Browser::launch(browser_config)
            .await
            .context("Failed to launch browser"),
        Err(e) => Err(anyhow::anyhow!("Invalid browser config: {e}")),
    };

    let (browser, handler) = match launched {
        Ok(pair) => pair,
        Err(e) => {
            if let Err(cleanup) = std::fs::remove_dir_all(&profile_dir) {
                warn!("Failed to remove profile {}: {}", profile_dir.display(), cleanup);
            }
            return Err(e);
        }
    };

    info!("Browser launched with profile {}", profile_dir.display());
    Ok(LaunchedBrowser {
        browser,
        events: tokio::spawn(pump_events(handler)),
        profile_dir,
    })
}
