//! MCP server exposing the tool registry

use std::sync::Arc;

use anyhow::Result;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tracing::{info, warn};

use crate::tools::{ToolContext, ToolRegistry};

/// Routes MCP `tools/list` and `tools/call` requests to a [`ToolRegistry`]
#[derive(Clone)]
pub struct RedditToolServer {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl RedditToolServer {
    pub fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self {
            registry: Arc::new(registry),
            context,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one tool call
    ///
    /// Bad input (unknown tool, malformed arguments) is a protocol-level
    /// `invalid_params` error. Failures while the tool runs come back as a
    /// tool result flagged `is_error` so the calling agent can read them.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = Value::Object(arguments.unwrap_or_default());

        match self.registry.call(name, &self.context, arguments).await {
            Ok(content) => Ok(CallToolResult::success(content)),
            Err(e) if e.is_caller_error() => {
                info!("Rejected call to {}: {}", name, e);
                Err(McpError::invalid_params(e.to_string(), None))
            }
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}

impl ServerHandler for RedditToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Browser-driven Reddit tools. mcp_reddit_nav opens the home page; \
                 mcp_reddit_search returns post titles from one or more result pages."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.registry.descriptors()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }
}

/// Serve over stdin/stdout until the client disconnects
pub async fn serve_stdio(server: RedditToolServer) -> Result<()> {
    info!(
        "Serving {} tools over stdio",
        server.registry().len()
    );
    let running = server.serve(stdio()).await?;
    let reason = running.waiting().await?;
    info!("MCP session ended: {:?}", reason);
    Ok(())
}
