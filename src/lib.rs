//! Reddit navigation and search tools for AI agents
//!
//! Exposes `mcp_reddit_nav` and `mcp_reddit_search` over MCP, driving a
//! headless Chrome through chromiumoxide.

mod browser;
pub mod browser_setup;
mod manager;
pub mod navigation;
pub mod server;
pub mod session;
mod tools;
mod utils;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::utils::constants::{
    CONTENT_PLACEHOLDER, DEFAULT_LOAD_TIMEOUT_MS, DEFAULT_NAVIGATION_TIMEOUT_MS,
    DEFAULT_SETTLE_DELAY_MS, NEXT_PAGE_LABEL, POST_TITLE_SELECTOR, REDDIT_BASE_URL,
    REDDIT_SEARCH_PATH,
};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "KODEGEN_REDDIT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

/// Browser security and launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, etc.)
    /// WARNING: Only enable for trusted content
    #[serde(default = "default_disable_security")]
    pub disable_security: bool,

    /// Window dimensions
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// Where to go and what to look for on the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// CSS selector matching one element per post title
    #[serde(default = "default_post_title_selector")]
    pub post_title_selector: String,

    /// `aria-label` of the control that opens the next result page
    #[serde(default = "default_next_page_label")]
    pub next_page_label: String,

    #[serde(default = "default_content_placeholder")]
    pub content_placeholder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_headless() -> bool {
    true
}

fn default_disable_security() -> bool {
    false // SECURE BY DEFAULT
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_base_url() -> String {
    REDDIT_BASE_URL.to_string()
}

fn default_search_path() -> String {
    REDDIT_SEARCH_PATH.to_string()
}

fn default_post_title_selector() -> String {
    POST_TITLE_SELECTOR.to_string()
}

fn default_next_page_label() -> String {
    NEXT_PAGE_LABEL.to_string()
}

fn default_content_placeholder() -> String {
    CONTENT_PLACEHOLDER.to_string()
}

fn default_navigation_timeout_ms() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_MS
}

fn default_load_timeout_ms() -> u64 {
    DEFAULT_LOAD_TIMEOUT_MS
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_security: default_disable_security(),
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            post_title_selector: default_post_title_selector(),
            next_page_label: default_next_page_label(),
            content_placeholder: default_content_placeholder(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: default_navigation_timeout_ms(),
            load_timeout_ms: default_load_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Validated, ready-to-use view of [`SiteConfig`] and [`TimingConfig`]
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub base_url: Url,
    pub search_endpoint: Url,
    pub post_title_selector: String,
    pub next_page_label: String,
    pub content_placeholder: String,
    pub navigation_timeout: Duration,
    pub load_timeout: Duration,
    pub settle_delay: Duration,
}

impl Config {
    pub fn scrape_settings(&self) -> Result<ScrapeSettings, ConfigError> {
        let site = &self.site;

        let base_url = Url::parse(&site.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: site.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: site.base_url.clone(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        let search_endpoint =
            base_url
                .join(&site.search_path)
                .map_err(|e| ConfigError::InvalidUrl {
                    url: site.search_path.clone(),
                    reason: e.to_string(),
                })?;

        for (field, value) in [
            ("site.post_title_selector", &site.post_title_selector),
            ("site.next_page_label", &site.next_page_label),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidSetting {
                    field,
                    reason: "cannot be empty".to_string(),
                });
            }
        }

        Ok(ScrapeSettings {
            base_url,
            search_endpoint,
            post_title_selector: site.post_title_selector.clone(),
            next_page_label: site.next_page_label.clone(),
            content_placeholder: site.content_placeholder.clone(),
            navigation_timeout: validate_navigation_timeout(
                "timing.navigation_timeout_ms",
                self.timing.navigation_timeout_ms,
            )?,
            load_timeout: validate_interaction_timeout(
                "timing.load_timeout_ms",
                self.timing.load_timeout_ms,
            )?,
            settle_delay: validate_interaction_timeout(
                "timing.settle_delay_ms",
                self.timing.settle_delay_ms,
            )?,
        })
    }
}

/// Load config from a YAML file; a missing file yields defaults
pub fn load_yaml_config_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// Load config from `$KODEGEN_REDDIT_CONFIG`, else config.yaml in package root
pub fn load_yaml_config() -> Result<Config, ConfigError> {
    let config_path = std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.yaml"));

    load_yaml_config_from(&config_path)
}

/// Registry holding every Reddit tool
pub fn build_registry() -> ToolRegistry {
    ToolRegistry::new()
        .register(RedditNavTool::new())
        .register(RedditSearchTool::new())
}

pub use browser::{BrowserError, BrowserResult, ChromiumPage};
pub use manager::BrowserManager;
pub use server::{RedditToolServer, serve_stdio};
pub use session::{ExtractedRecord, PageFactory, PageSession};
pub use tools::{
    RedditNavArgs, RedditNavTool, RedditSearchArgs, RedditSearchTool, RegisteredTool, Tool,
    ToolContext, ToolRegistry, collect_posts, format_posts, search_url,
};
pub use utils::{ConfigError, ToolError, soft_wait};
use utils::{validate_interaction_timeout, validate_navigation_timeout};
