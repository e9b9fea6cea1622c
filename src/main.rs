// Reddit tools MCP server
//
// Serves mcp_reddit_nav and mcp_reddit_search over stdio. Logs go to stderr
// because stdout carries the protocol.

use std::sync::Arc;

use anyhow::Result;
use kodegen_tools_reddit::{
    BrowserManager, RedditToolServer, ToolContext, build_registry, load_yaml_config, serve_stdio,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = load_yaml_config()?;
    let settings = config.scrape_settings()?;

    // Browser launch is lazy, so this stays cheap until the first tool call
    let browser_manager = Arc::new(BrowserManager::new(
        config.browser.clone(),
        settings.navigation_timeout,
    ));

    let context = ToolContext::new(browser_manager.clone(), Arc::new(settings));
    let server = RedditToolServer::new(build_registry(), context);

    let served = serve_stdio(server).await;

    browser_manager.shutdown().await?;
    served
}
