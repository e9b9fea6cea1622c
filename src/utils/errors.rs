use thiserror::Error;

use crate::browser::BrowserError;

/// Errors surfaced by tool handlers to the dispatch layer
#[derive(Error, Debug)]
pub enum ToolError {
    /// Parameters failed validation; raised before any page is opened
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolError {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        ToolError::InvalidArguments(message.into())
    }

    /// Whether the caller supplied bad input, as opposed to an execution failure
    pub fn is_caller_error(&self) -> bool {
        matches!(self, ToolError::InvalidArguments(_) | ToolError::UnknownTool(_))
    }
}

/// Implement From<serde_json::Error> for ToolError
///
/// Arguments are deserialized from raw JSON, so a serde failure is always a
/// malformed-parameter problem.
impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::InvalidArguments(err.to_string())
    }
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}
