pub mod constants;
mod errors;
mod ready_state;
mod timeout;

pub use errors::{ConfigError, ToolError};
pub use ready_state::{ReadyState, wait_for_ready_state};
pub use timeout::{
    soft_wait, validate_interaction_timeout, validate_navigation_timeout, within_deadline,
};
