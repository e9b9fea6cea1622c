//! Shared configuration constants for the Reddit tools
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Site root used by `mcp_reddit_nav` and as the base of search URLs
pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// Search endpoint path, joined onto the base URL
pub const REDDIT_SEARCH_PATH: &str = "/search/";

/// CSS marker for post titles in the search listing
pub const POST_TITLE_SELECTOR: &str = "a[data-testid='post-title']";

/// Accessible label of the "next results page" control
pub const NEXT_PAGE_LABEL: &str = "Next";

/// Listing view never exposes post bodies, so every record carries this
pub const CONTENT_PLACEHOLDER: &str = "Content preview not available";

/// Hard cap on reaching the minimally-parsed state after navigation
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Cap on the post-navigation "fully loaded" wait (expiry is not an error)
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 5_000;

/// Pause after clicking "next" so the following page can render
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2_000;

/// Bounds of the `pageCount` search parameter (inclusive)
pub const MIN_PAGE_COUNT: u32 = 1;
pub const MAX_PAGE_COUNT: u32 = 10;
