//! Reddit tool implementations and the plumbing they share

mod reddit_nav;
mod reddit_search;
mod registry;

pub use reddit_nav::{RedditNavArgs, RedditNavTool};
pub use reddit_search::{
    RedditSearchArgs, RedditSearchTool, collect_posts, format_posts, search_url,
};
pub use registry::{RegisteredTool, ToolRegistry};

use std::future::Future;
use std::sync::Arc;

use rmcp::model::Content;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::ScrapeSettings;
use crate::session::PageFactory;
use crate::utils::ToolError;

/// What a handler gets to work with for one invocation
#[derive(Clone)]
pub struct ToolContext {
    pages: Arc<dyn PageFactory>,
    settings: Arc<ScrapeSettings>,
}

impl ToolContext {
    pub fn new(pages: Arc<dyn PageFactory>, settings: Arc<ScrapeSettings>) -> Self {
        Self { pages, settings }
    }

    pub fn pages(&self) -> &dyn PageFactory {
        self.pages.as_ref()
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }
}

/// A callable tool with typed, schema-described arguments
///
/// Arguments are deserialized from the raw call parameters before `execute`
/// runs, so a malformed call never reaches the browser.
pub trait Tool: Send + Sync + 'static {
    type Args: DeserializeOwned + JsonSchema + Send;

    fn name() -> &'static str;

    fn description() -> &'static str;

    fn read_only() -> bool {
        true
    }

    fn destructive() -> bool {
        false
    }

    fn open_world() -> bool {
        true
    }

    fn execute(
        &self,
        args: Self::Args,
        ctx: &ToolContext,
    ) -> impl Future<Output = Result<Vec<Content>, ToolError>> + Send;
}
