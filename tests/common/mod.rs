//! Scripted page doubles for driving the tools without a browser

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kodegen_tools_reddit::{
    BrowserError, BrowserResult, Config, ExtractedRecord, PageFactory, PageSession, ToolContext,
};

/// What the fake site looks like
#[derive(Clone, Default)]
pub struct Script {
    /// Titles on each result page, in order
    pub pages: Vec<Vec<&'static str>>,
    /// How many times the "next" control can be clicked
    pub next_clicks: usize,
    pub fail_navigation: bool,
    pub panic_navigation: bool,
    /// Extraction round (0-based) that errors
    pub fail_extraction_at: Option<usize>,
    /// Extraction round (0-based) that panics
    pub panic_extraction_at: Option<usize>,
    /// Click attempt (0-based) on the "next" control that errors
    pub fail_click_at: Option<usize>,
    /// Load event never arrives
    pub load_never_fires: bool,
}

impl Script {
    pub fn always_next(pages: usize) -> Self {
        Self {
            pages: (0..pages).map(|_| vec!["post"]).collect(),
            next_clicks: usize::MAX,
            ..Self::default()
        }
    }
}

#[derive(Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub navigations: AtomicUsize,
    pub extractions: AtomicUsize,
    pub clicks: AtomicUsize,
    pub closes: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
}

impl Counters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
    pub fn extractions(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }
    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

pub struct ScriptedPages {
    script: Arc<Script>,
    pub counters: Arc<Counters>,
}

impl ScriptedPages {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            counters: Arc::new(Counters::default()),
        }
    }
}

#[async_trait]
impl PageFactory for ScriptedPages {
    async fn open_page(&self) -> BrowserResult<Box<dyn PageSession>> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedPage {
            script: self.script.clone(),
            counters: self.counters.clone(),
            current: AtomicUsize::new(0),
        }))
    }
}

struct ScriptedPage {
    script: Arc<Script>,
    counters: Arc<Counters>,
    current: AtomicUsize,
}

#[async_trait]
impl PageSession for ScriptedPage {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        self.counters.visited.lock().unwrap().push(url.to_string());
        if self.script.panic_navigation {
            panic!("scripted navigation panic");
        }
        if self.script.fail_navigation {
            return Err(BrowserError::NavigationFailed(format!(
                "{url}: net::ERR_NAME_NOT_RESOLVED"
            )));
        }
        Ok(())
    }

    async fn wait_for_load(&self) -> BrowserResult<()> {
        if self.script.load_never_fires {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn extract_records(
        &self,
        _selector: &str,
        placeholder: &str,
    ) -> BrowserResult<Vec<ExtractedRecord>> {
        let round = self.counters.extractions.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_extraction_at == Some(round) {
            return Err(BrowserError::QueryFailed("execution context destroyed".into()));
        }
        if self.script.panic_extraction_at == Some(round) {
            panic!("scripted extraction panic");
        }

        let page = self.current.load(Ordering::SeqCst);
        Ok(self
            .script
            .pages
            .get(page)
            .map(|titles| {
                titles
                    .iter()
                    .map(|t| ExtractedRecord::new(*t, placeholder))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn activate_labeled(&self, _label: &str) -> BrowserResult<bool> {
        if self.script.fail_click_at == Some(self.counters.clicks()) {
            return Err(BrowserError::ClickFailed("'Next' is not clickable".into()));
        }
        if self.counters.clicks() >= self.script.next_clicks {
            return Ok(false);
        }
        self.counters.clicks.fetch_add(1, Ordering::SeqCst);
        self.current.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Default settings with waits removed
pub fn fast_context(pages: Arc<ScriptedPages>) -> ToolContext {
    let mut settings = Config::default().scrape_settings().unwrap();
    settings.load_timeout = Duration::from_millis(50);
    settings.settle_delay = Duration::ZERO;
    ToolContext::new(pages, Arc::new(settings))
}

/// Default settings, real 5s load cap and 2s settle delay
pub fn default_context(pages: Arc<ScriptedPages>) -> ToolContext {
    let settings = Config::default().scrape_settings().unwrap();
    ToolContext::new(pages, Arc::new(settings))
}
