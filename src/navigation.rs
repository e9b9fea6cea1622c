//! Open a page and bring it to a queryable state

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::browser::{BrowserError, BrowserResult};
use crate::session::{PageFactory, PageSession};
use crate::utils::soft_wait;

/// Open a fresh page and navigate it to `url`
///
/// Returns once the document is parsed, after giving the full load event up
/// to `load_timeout` to fire. Missing the load event is expected on pages that
/// keep streaming resources, so it only shows up in the logs. Failures before
/// the document is parsed close the page and propagate; a panic closes it
/// before unwinding further.
pub async fn open_and_navigate(
    pages: &dyn PageFactory,
    url: &str,
    load_timeout: Duration,
) -> BrowserResult<Box<dyn PageSession>> {
    let page = pages.open_page().await?;

    let outcome = AssertUnwindSafe(async {
        page.navigate(url).await?;
        Ok::<_, BrowserError>(soft_wait(load_timeout, page.wait_for_load()).await)
    })
    .catch_unwind()
    .await;

    match outcome {
        Ok(Ok(loaded)) => {
            debug!("Page {} ready (load event observed: {})", url, loaded);
            Ok(page)
        }
        Ok(Err(e)) => {
            release(page).await;
            Err(e)
        }
        Err(panic) => {
            release(page).await;
            std::panic::resume_unwind(panic)
        }
    }
}

async fn release(page: Box<dyn PageSession>) {
    if let Err(e) = page.close().await {
        warn!("Failed to close page after failed navigation: {}", e);
    }
}
