//! `mcp_reddit_search` - search Reddit and scrape post titles across result pages

use std::fmt::Write as _;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Tool, ToolContext};
use crate::ScrapeSettings;
use crate::navigation::open_and_navigate;
use crate::session::{ExtractedRecord, PageSession};
use crate::utils::ToolError;
use crate::utils::constants::{MAX_PAGE_COUNT, MIN_PAGE_COUNT};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedditSearchArgs {
    /// Search keywords
    pub keywords: String,

    /// Number of result pages to scrape (1-10)
    #[schemars(range(min = 1, max = 10))]
    pub page_count: u32,
}

impl RedditSearchArgs {
    /// Check the constraints serde can't express
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.keywords.trim().is_empty() {
            return Err(ToolError::invalid_arguments("keywords cannot be empty"));
        }

        if !(MIN_PAGE_COUNT..=MAX_PAGE_COUNT).contains(&self.page_count) {
            return Err(ToolError::invalid_arguments(format!(
                "pageCount must be between {} and {}, got {}",
                MIN_PAGE_COUNT, MAX_PAGE_COUNT, self.page_count
            )));
        }

        Ok(())
    }
}

/// Search endpoint with `keywords` as the percent-encoded `q` parameter
pub fn search_url(settings: &ScrapeSettings, keywords: &str) -> String {
    format!(
        "{}?q={}",
        settings.search_endpoint,
        urlencoding::encode(keywords)
    )
}

/// Extract posts from up to `page_count` result pages
///
/// Clicks the "next" control between rounds and stops early when it is
/// missing. A failed extraction or click also ends the loop; whatever was
/// collected before it is returned. Records keep page-then-position order.
pub async fn collect_posts(
    page: &dyn PageSession,
    settings: &ScrapeSettings,
    page_count: u32,
) -> Vec<ExtractedRecord> {
    let mut records = Vec::new();
    let mut current = 1;

    while current <= page_count {
        match page
            .extract_records(&settings.post_title_selector, &settings.content_placeholder)
            .await
        {
            Ok(batch) => {
                debug!("Result page {}: {} posts", current, batch.len());
                records.extend(batch);
            }
            Err(e) => {
                warn!(
                    "Extraction failed on result page {}, keeping {} posts: {}",
                    current,
                    records.len(),
                    e
                );
                break;
            }
        }

        if current < page_count {
            match page.activate_labeled(&settings.next_page_label).await {
                Ok(true) => tokio::time::sleep(settings.settle_delay).await,
                Ok(false) => {
                    debug!("No next page control after page {}, stopping", current);
                    break;
                }
                Err(e) => {
                    warn!("Could not advance past result page {}: {}", current, e);
                    break;
                }
            }
        }

        current += 1;
    }

    records
}

/// Render records as the tool's text response
pub fn format_posts(records: &[ExtractedRecord]) -> String {
    let mut text = format!("Found {} posts", records.len());
    for (i, record) in records.iter().enumerate() {
        let _ = write!(
            text,
            "\n\n{}. Title: {}\nContent: {}",
            i + 1,
            record.title,
            record.content
        );
    }
    text
}

#[derive(Clone, Default)]
pub struct RedditSearchTool;

impl RedditSearchTool {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tool for RedditSearchTool {
    type Args = RedditSearchArgs;

    fn name() -> &'static str {
        "mcp_reddit_search"
    }

    fn description() -> &'static str {
        "Search Reddit for posts matching keywords and return their titles.\n\n\
         Scrapes pageCount result pages (1-10), following the results \"next\" control \
         between pages and stopping early when there are no more pages.\n\n\
         Example: mcp_reddit_search({\"keywords\": \"rust async\", \"pageCount\": 2})"
    }

    async fn execute(&self, args: Self::Args, ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        args.validate()?;

        let settings = ctx.settings();
        let url = search_url(settings, &args.keywords);
        info!(
            "Searching Reddit for '{}' across up to {} pages",
            args.keywords, args.page_count
        );

        let page = open_and_navigate(ctx.pages(), &url, settings.load_timeout).await?;

        let outcome = AssertUnwindSafe(collect_posts(page.as_ref(), settings, args.page_count))
            .catch_unwind()
            .await;

        if let Err(e) = page.close().await {
            warn!("Failed to close search page: {}", e);
        }

        let records = match outcome {
            Ok(records) => records,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        info!("Reddit search for '{}' found {} posts", args.keywords, records.len());
        Ok(vec![Content::text(format_posts(&records))])
    }
}
