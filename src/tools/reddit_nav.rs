//! `mcp_reddit_nav` - open the Reddit home page

use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

use super::{Tool, ToolContext};
use crate::navigation::open_and_navigate;
use crate::utils::ToolError;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RedditNavArgs {
    /// Dummy parameter for no-parameter tools
    pub random_string: String,
}

#[derive(Clone, Default)]
pub struct RedditNavTool;

impl RedditNavTool {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tool for RedditNavTool {
    type Args = RedditNavArgs;

    fn name() -> &'static str {
        "mcp_reddit_nav"
    }

    fn description() -> &'static str {
        "Navigate to Reddit website and perform basic operations"
    }

    fn read_only() -> bool {
        false // Navigation changes browser state
    }

    async fn execute(&self, _args: Self::Args, ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        let settings = ctx.settings();
        let page = open_and_navigate(
            ctx.pages(),
            settings.base_url.as_str(),
            settings.load_timeout,
        )
        .await?;

        if let Err(e) = page.close().await {
            warn!("Failed to close Reddit home page: {}", e);
        }

        info!("Navigated to {}", settings.base_url);
        Ok(vec![Content::text("Successfully navigated to Reddit")])
    }
}
