// Tests for module grouping

use sitebrief_core::classify::{HOME_MODULE, group_by_module, module_name_for};
use sitebrief_scanner::PageRecord;

fn page(url: &str) -> PageRecord {
    PageRecord::new(url.to_string(), Some(url.to_string()), "some words", Vec::new())
}

#[test]
fn test_group_by_module_first_seen_order() {
    let pages = vec![
        page("https://example.com/"),
        page("https://example.com/docs/intro"),
        page("https://example.com/blog/hello"),
        page("https://example.com/docs/setup"),
        page("https://example.com/about"),
    ];
    let modules = group_by_module(&pages);

    let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec![HOME_MODULE, "Docs", "Blog", "About"]);

    let docs: Vec<&str> = modules[1].pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        docs,
        vec![
            "https://example.com/docs/intro",
            "https://example.com/docs/setup"
        ]
    );
}

#[test]
fn test_group_by_module_partitions_every_page() {
    let pages = vec![
        page("https://example.com/a/1"),
        page("https://example.com/b/1"),
        page("https://example.com/a/2"),
        page("https://example.com/"),
    ];
    let modules = group_by_module(&pages);
    let total: usize = modules.iter().map(|m| m.pages.len()).sum();
    assert_eq!(total, pages.len());
    assert!(modules.iter().all(|m| !m.pages.is_empty()));
}

#[test]
fn test_group_by_module_is_deterministic() {
    let pages = vec![
        page("https://example.com/zeta"),
        page("https://example.com/alpha"),
        page("https://example.com/mid-section/x"),
    ];
    assert_eq!(group_by_module(&pages), group_by_module(&pages));
}

#[test]
fn test_group_by_module_empty() {
    assert!(group_by_module(&[]).is_empty());
}

#[test]
fn test_separators_merge_into_one_module() {
    let pages = vec![
        page("https://example.com/getting-started/"),
        page("https://example.com/getting_started/next"),
    ];
    let modules = group_by_module(&pages);
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].name, "Getting Started");
}

#[test]
fn test_module_name_for_unparseable_url() {
    assert_eq!(module_name_for("not a url"), HOME_MODULE);
}

#[test]
fn test_module_total_words() {
    let modules = group_by_module(&[page("https://example.com/docs/a"), page("https://example.com/docs/b")]);
    assert_eq!(modules[0].total_words(), 4);
}
