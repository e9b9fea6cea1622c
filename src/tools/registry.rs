//! Name-indexed table of tools, built once at startup

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{Content, JsonObject, ToolAnnotations};
use serde_json::Value;
use tracing::{info, warn};

use super::{Tool, ToolContext};
use crate::utils::ToolError;

/// Object-safe face of [`Tool`] used for dispatch
#[async_trait]
trait ToolHandler: Send + Sync {
    async fn call(&self, ctx: &ToolContext, arguments: Value) -> Result<Vec<Content>, ToolError>;
}

struct TypedHandler<T>(T);

#[async_trait]
impl<T: Tool> ToolHandler for TypedHandler<T> {
    async fn call(&self, ctx: &ToolContext, arguments: Value) -> Result<Vec<Content>, ToolError> {
        let args: T::Args = serde_json::from_value(arguments)?;
        self.0.execute(args, ctx).await
    }
}

/// Descriptor plus handler for one tool
#[derive(Clone)]
pub struct RegisteredTool {
    pub descriptor: rmcp::model::Tool,
    handler: Arc<dyn ToolHandler>,
}

/// Tools keyed by their dispatch name
///
/// Listing order is registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool; a later registration under the same name replaces the earlier one
    pub fn register<T: Tool>(mut self, tool: T) -> Self {
        let entry = RegisteredTool {
            descriptor: descriptor_for::<T>(),
            handler: Arc::new(TypedHandler(tool)),
        };

        match self.index.get(T::name()) {
            Some(&slot) => {
                warn!("Tool {} registered twice, replacing earlier handler", T::name());
                self.tools[slot] = entry;
            }
            None => {
                self.index.insert(T::name().to_string(), self.tools.len());
                self.tools.push(entry);
            }
        }

        info!("Registered tool {}", T::name());
        self
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&slot| &self.tools[slot])
    }

    pub fn descriptors(&self) -> Vec<rmcp::model::Tool> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the named tool with raw JSON arguments
    pub async fn call(
        &self,
        name: &str,
        ctx: &ToolContext,
        arguments: Value,
    ) -> Result<Vec<Content>, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.handler.call(ctx, arguments).await
    }
}

fn descriptor_for<T: Tool>() -> rmcp::model::Tool {
    let schema = schemars::schema_for!(T::Args);
    let input_schema = match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => map,
        _ => JsonObject::new(),
    };

    let mut descriptor =
        rmcp::model::Tool::new(T::name(), T::description(), Arc::new(input_schema));
    descriptor.annotations = Some(
        ToolAnnotations::new()
            .read_only(T::read_only())
            .destructive(T::destructive())
            .open_world(T::open_world()),
    );
    descriptor
}
