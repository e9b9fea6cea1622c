mod common;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use common::{Script, ScriptedPages, default_context, fast_context};
use futures::FutureExt;
use kodegen_tools_reddit::{BrowserError, ToolError, build_registry};
use serde_json::json;

const PLACEHOLDER: &str = "Content preview not available";

async fn search(
    pages: &Arc<ScriptedPages>,
    keywords: &str,
    page_count: u32,
) -> Result<String, ToolError> {
    let registry = build_registry();
    let ctx = fast_context(pages.clone());
    let content = registry
        .call(
            "mcp_reddit_search",
            &ctx,
            json!({"keywords": keywords, "pageCount": page_count}),
        )
        .await?;
    assert_eq!(content.len(), 1);
    Ok(content[0].as_text().expect("text block").text.clone())
}

#[tokio::test]
async fn always_next_runs_exactly_page_count_rounds() {
    for page_count in 1..=10u32 {
        let pages = Arc::new(ScriptedPages::new(Script::always_next(10)));
        let text = search(&pages, "rust", page_count).await.unwrap();

        let counters = &pages.counters;
        assert_eq!(counters.extractions(), page_count as usize);
        assert_eq!(counters.clicks(), page_count as usize - 1);
        assert_eq!(counters.navigations(), 1);
        assert_eq!(counters.closes(), 1);
        assert!(text.starts_with(&format!("Found {page_count} posts")));
    }
}

#[tokio::test]
async fn missing_next_stops_after_available_pages() {
    let pages = Arc::new(ScriptedPages::new(Script {
        pages: vec![vec!["a1", "a2"], vec!["b1"], vec!["c1", "c2"], vec!["never"]],
        next_clicks: 2,
        ..Script::default()
    }));

    let text = search(&pages, "rust", 5).await.unwrap();

    assert_eq!(pages.counters.extractions(), 3);
    assert_eq!(pages.counters.clicks(), 2);
    assert_eq!(pages.counters.closes(), 1);
    assert!(text.starts_with("Found 5 posts"));
    let titles: Vec<&str> = text
        .lines()
        .filter_map(|l| l.split_once(". Title: ").map(|(_, t)| t))
        .collect();
    assert_eq!(titles, ["a1", "a2", "b1", "c1", "c2"]);
    assert!(!text.contains("never"));
}

#[tokio::test]
async fn duplicates_across_pages_are_kept() {
    let pages = Arc::new(ScriptedPages::new(Script {
        pages: vec![vec!["same"], vec!["same"]],
        next_clicks: usize::MAX,
        ..Script::default()
    }));

    let text = search(&pages, "rust", 2).await.unwrap();
    assert!(text.starts_with("Found 2 posts"));
    assert!(text.contains("1. Title: same"));
    assert!(text.contains("2. Title: same"));
}

#[tokio::test]
async fn invalid_parameters_never_open_a_page() {
    let registry = build_registry();
    for arguments in [
        json!({"keywords": "cats", "pageCount": 0}),
        json!({"keywords": "cats", "pageCount": 11}),
        json!({"keywords": "cats", "pageCount": 2.5}),
        json!({"keywords": "cats", "pageCount": "2"}),
        json!({"keywords": "", "pageCount": 2}),
        json!({"keywords": "   ", "pageCount": 2}),
        json!({"pageCount": 2}),
    ] {
        let pages = Arc::new(ScriptedPages::new(Script::always_next(3)));
        let ctx = fast_context(pages.clone());

        let err = registry
            .call("mcp_reddit_search", &ctx, arguments.clone())
            .await
            .unwrap_err();

        assert!(
            matches!(err, ToolError::InvalidArguments(_)),
            "{arguments} gave {err:?}"
        );
        assert_eq!(pages.counters.opened(), 0, "{arguments} opened a page");
        assert_eq!(pages.counters.navigations(), 0);
    }
}

#[tokio::test]
async fn extraction_error_keeps_earlier_pages() {
    let pages = Arc::new(ScriptedPages::new(Script {
        fail_extraction_at: Some(1),
        ..Script::always_next(3)
    }));

    let text = search(&pages, "rust", 3).await.unwrap();

    assert_eq!(text, format!("Found 1 posts\n\n1. Title: post\nContent: {PLACEHOLDER}"));
    assert_eq!(pages.counters.extractions(), 2);
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test]
async fn click_error_keeps_collected_posts() {
    let pages = Arc::new(ScriptedPages::new(Script {
        pages: vec![vec!["a1", "a2"], vec!["b1"], vec!["c1"]],
        next_clicks: usize::MAX,
        fail_click_at: Some(1),
        ..Script::default()
    }));

    let text = search(&pages, "rust", 3).await.unwrap();

    assert!(text.starts_with("Found 3 posts"));
    assert!(text.contains("3. Title: b1"));
    assert!(!text.contains("c1"));
    assert_eq!(pages.counters.extractions(), 2);
    assert_eq!(pages.counters.clicks(), 1);
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test]
async fn extraction_panic_still_closes_page_once() {
    let pages = Arc::new(ScriptedPages::new(Script {
        panic_extraction_at: Some(0),
        ..Script::always_next(2)
    }));

    let outcome = AssertUnwindSafe(search(&pages, "rust", 2))
        .catch_unwind()
        .await;

    assert!(outcome.is_err());
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test]
async fn navigation_panic_still_closes_page_once() {
    let pages = Arc::new(ScriptedPages::new(Script {
        panic_navigation: true,
        ..Script::always_next(1)
    }));

    let outcome = AssertUnwindSafe(search(&pages, "rust", 1))
        .catch_unwind()
        .await;

    assert!(outcome.is_err());
    assert_eq!(pages.counters.extractions(), 0);
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test]
async fn navigation_failure_is_hard_and_releases_page() {
    let pages = Arc::new(ScriptedPages::new(Script {
        fail_navigation: true,
        ..Script::always_next(2)
    }));

    let err = search(&pages, "rust", 2).await.unwrap_err();

    assert!(matches!(
        err,
        ToolError::Browser(BrowserError::NavigationFailed(_))
    ));
    assert_eq!(pages.counters.navigations(), 1);
    assert_eq!(pages.counters.extractions(), 0);
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn load_timeout_does_not_fail_the_search() {
    let pages = Arc::new(ScriptedPages::new(Script {
        load_never_fires: true,
        pages: vec![vec!["only"]],
        ..Script::default()
    }));
    let ctx = default_context(pages.clone());
    let start = tokio::time::Instant::now();

    let content = build_registry()
        .call(
            "mcp_reddit_search",
            &ctx,
            json!({"keywords": "rust", "pageCount": 1}),
        )
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_secs(5));
    let text = &content[0].as_text().unwrap().text;
    assert!(text.starts_with("Found 1 posts"));
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn settle_delay_follows_each_click() {
    let pages = Arc::new(ScriptedPages::new(Script::always_next(3)));
    let ctx = default_context(pages.clone());
    let start = tokio::time::Instant::now();

    build_registry()
        .call(
            "mcp_reddit_search",
            &ctx,
            json!({"keywords": "rust", "pageCount": 3}),
        )
        .await
        .unwrap();

    let elapsed = start.elapsed();
    assert_eq!(pages.counters.clicks(), 2);
    assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn cats_two_pages() {
    let pages = Arc::new(ScriptedPages::new(Script {
        pages: vec![vec!["A", "B"], vec!["C"]],
        next_clicks: 1,
        ..Script::default()
    }));

    let text = search(&pages, "cats", 2).await.unwrap();

    assert_eq!(
        text,
        format!(
            "Found 3 posts\n\n\
             1. Title: A\nContent: {PLACEHOLDER}\n\n\
             2. Title: B\nContent: {PLACEHOLDER}\n\n\
             3. Title: C\nContent: {PLACEHOLDER}"
        )
    );
    assert_eq!(
        pages.counters.visited(),
        ["https://www.reddit.com/search/?q=cats"]
    );
    assert_eq!(pages.counters.clicks(), 1);
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test]
async fn dogs_empty_first_page() {
    let pages = Arc::new(ScriptedPages::new(Script {
        pages: vec![vec![]],
        next_clicks: 0,
        ..Script::default()
    }));

    let text = search(&pages, "dogs", 5).await.unwrap();

    assert_eq!(text, "Found 0 posts");
    assert_eq!(pages.counters.navigations(), 1);
    assert_eq!(pages.counters.extractions(), 1);
    assert_eq!(pages.counters.clicks(), 0);
    assert_eq!(pages.counters.closes(), 1);
}

#[tokio::test]
async fn keywords_are_url_encoded() {
    let pages = Arc::new(ScriptedPages::new(Script::always_next(1)));
    search(&pages, "rust & c++", 1).await.unwrap();
    assert_eq!(
        pages.counters.visited(),
        ["https://www.reddit.com/search/?q=rust%20%26%20c%2B%2B"]
    );
}
