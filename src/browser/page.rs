//! [`PageSession`] implementation over a chromiumoxide page

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use tracing::{debug, info};

use super::{BrowserError, BrowserResult};
use crate::session::{ExtractedRecord, PageSession, aria_label_selector};
use crate::utils::{ReadyState, wait_for_ready_state, within_deadline};

pub struct ChromiumPage {
    page: Page,
    navigation_timeout: Duration,
}

impl ChromiumPage {
    pub fn new(page: Page, navigation_timeout: Duration) -> Self {
        Self {
            page,
            navigation_timeout,
        }
    }

    async fn commit_and_parse(&self, url: &str) -> BrowserResult<()> {
        // Raw Page.navigate returns at commit instead of waiting for the load event
        let response = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| BrowserError::NavigationFailed(format!("{url}: {e}")))?;

        if let Some(error_text) = response.result.error_text.as_deref() {
            return Err(BrowserError::NavigationFailed(format!(
                "{url}: {error_text}"
            )));
        }

        wait_for_ready_state(&self.page, ReadyState::Parsed, None).await
    }
}

#[async_trait]
impl PageSession for ChromiumPage {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        info!("Navigating to {}", url);

        within_deadline(
            self.navigation_timeout,
            &format!("navigation to {url}"),
            self.commit_and_parse(url),
        )
        .await?;

        debug!("Document parsed for {}", url);
        Ok(())
    }

    async fn wait_for_load(&self) -> BrowserResult<()> {
        wait_for_ready_state(&self.page, ReadyState::Loaded, None).await
    }

    async fn extract_records(
        &self,
        selector: &str,
        placeholder: &str,
    ) -> BrowserResult<Vec<ExtractedRecord>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::QueryFailed(format!("'{selector}': {e}")))?;

        let mut records = Vec::with_capacity(elements.len());
        for element in &elements {
            let title = element
                .inner_text()
                .await
                .map_err(|e| BrowserError::QueryFailed(format!("text of '{selector}': {e}")))?
                .unwrap_or_default();
            records.push(ExtractedRecord::new(title.trim(), placeholder));
        }

        Ok(records)
    }

    async fn activate_labeled(&self, label: &str) -> BrowserResult<bool> {
        let selector = aria_label_selector(label);
        let candidates = self
            .page
            .find_elements(selector.as_str())
            .await
            .map_err(|e| BrowserError::QueryFailed(format!("'{selector}': {e}")))?;

        let Some(element) = candidates.into_iter().next() else {
            return Ok(false);
        };

        element
            .scroll_into_view()
            .await
            .map_err(|e| BrowserError::ClickFailed(format!("scroll '{label}' into view: {e}")))?;

        // Clicking at the point directly avoids chromiumoxide's IntersectionObserver wait
        let point = element
            .clickable_point()
            .await
            .map_err(|e| BrowserError::ClickFailed(format!("'{label}' is not clickable: {e}")))?;

        self.page
            .click(point)
            .await
            .map_err(|e| BrowserError::ClickFailed(format!("'{label}': {e}")))?;

        Ok(true)
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::CloseFailed(e.to_string()))
    }
}
