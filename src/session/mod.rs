//! Page session capability consumed by the tools
//!
//! Tools never touch chromiumoxide directly. They receive pages through
//! [`PageFactory`] and drive them through [`PageSession`], which keeps the
//! navigation and pagination logic independent of how DOM traversal and
//! clicking are performed.

use async_trait::async_trait;
use crate::browser::BrowserResult;

/// One scraped unit from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub title: String,
    pub content: String,
}

impl ExtractedRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A single browser page under automated control
///
/// A session is owned by exactly one tool invocation. `close` consumes the
/// session, so it can be released at most once.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Navigate and return once the new document is parsed (not fully loaded)
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Resolve when the page reports it is fully loaded
    ///
    /// Unbounded; callers cap it with [`crate::utils::soft_wait`].
    async fn wait_for_load(&self) -> BrowserResult<()>;

    /// One record per element matching `selector`, in document order
    async fn extract_records(
        &self,
        selector: &str,
        placeholder: &str,
    ) -> BrowserResult<Vec<ExtractedRecord>>;

    /// Click the element whose accessible label is `label`
    ///
    /// Returns `Ok(false)` when no such element exists.
    async fn activate_labeled(&self, label: &str) -> BrowserResult<bool>;

    /// Release the page
    async fn close(self: Box<Self>) -> BrowserResult<()>;
}

/// Source of fresh pages for tool invocations
#[async_trait]
pub trait PageFactory: Send + Sync {
    async fn open_page(&self) -> BrowserResult<Box<dyn PageSession>>;
}

/// CSS selector matching elements by accessible label
pub fn aria_label_selector(label: &str) -> String {
    let escaped = label.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[aria-label=\"{escaped}\"]")
}
