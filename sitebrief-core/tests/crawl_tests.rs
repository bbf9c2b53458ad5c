// Tests for crawl functionality

use sitebrief_core::crawl::{
    CrawlOptions, extract_url_path, generate_crawl_json, generate_crawl_report,
};
use sitebrief_scanner::{CrawlOutcome, PageRecord};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/docs/v1/intro"), "/docs/v1/intro");
}

#[test]
fn test_extract_url_path_drops_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/api?key=value#top"), "/api");
}

#[test]
fn test_extract_url_path_invalid_url() {
    assert_eq!(extract_url_path("not a url"), "not a url");
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_crawl_options_defaults() {
    let options = CrawlOptions::new("https://example.com");
    assert_eq!(options.max_pages, 50);
    assert_eq!(options.delay.as_millis(), 500);
    assert_eq!(options.timeout.as_secs(), 10);
    assert!(!options.show_progress_bars);
}

// ============================================================================
// Report Tests
// ============================================================================

fn sample_outcome() -> CrawlOutcome {
    let page = |url: &str, title: &str, text: &str| {
        PageRecord::new(url.to_string(), Some(title.to_string()), text, Vec::new())
    };
    CrawlOutcome {
        pages: vec![
            page("https://example.com/", "Welcome", "hello there"),
            page("https://example.com/docs/intro", "Intro", "one two three"),
            page("https://example.com/docs/setup", "Setup", "four"),
        ],
        visited: vec![
            "https://example.com/".to_string(),
            "https://example.com/docs/intro".to_string(),
            "https://example.com/missing".to_string(),
            "https://example.com/docs/setup".to_string(),
        ],
    }
}

#[test]
fn test_generate_crawl_report_summary() {
    let report = generate_crawl_report(&sample_outcome());

    assert!(report.contains("URLs visited: 4"));
    assert!(report.contains("Pages extracted: 3"));
    assert!(report.contains("Modules: 2"));
    assert!(report.contains("Total words: 6"));
}

#[test]
fn test_generate_crawl_report_groups_by_module() {
    let report = generate_crawl_report(&sample_outcome());

    let home = report.find("## Home").unwrap();
    let docs = report.find("## Docs").unwrap();
    assert!(home < docs);
    assert!(report.contains("  2 pages, 4 words"));
    assert!(report.contains("/docs/setup"));
}

#[test]
fn test_generate_crawl_report_empty() {
    let report = generate_crawl_report(&CrawlOutcome::default());
    assert!(report.contains("Pages extracted: 0"));
    assert!(!report.contains("## "));
}

#[test]
fn test_generate_crawl_json() {
    let json = generate_crawl_json(&sample_outcome()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["visited"].as_array().unwrap().len(), 4);
    assert_eq!(value["modules"][1]["name"], "Docs");
    assert_eq!(value["modules"][1]["pages"][0]["title"], "Intro");
}
