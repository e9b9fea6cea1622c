//! Driving Chrome pages and the errors that can come out of it

mod page;

pub use page::ChromiumPage;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("DOM query failed: {0}")]
    QueryFailed(String),

    #[error("Click failed: {0}")]
    ClickFailed(String),

    #[error("Failed to close page: {0}")]
    CloseFailed(String),
}

pub type BrowserResult<T> = Result<T, BrowserError>;
