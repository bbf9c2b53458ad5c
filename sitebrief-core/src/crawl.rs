use crate::classify::group_by_module;
use indicatif::{ProgressBar, ProgressStyle};
use sitebrief_scanner::{CrawlEvent, CrawlOutcome, Crawler, ScanError};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug)]
pub struct CrawlOptions {
    pub seed_url: String,
    pub max_pages: usize,
    pub delay: Duration,
    pub timeout: Duration,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_pages: 50,
            delay: sitebrief_scanner::crawler::DEFAULT_DELAY,
            timeout: sitebrief_scanner::crawler::DEFAULT_TIMEOUT,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress as plain messages
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

fn describe_event(event: &CrawlEvent) -> String {
    match event {
        CrawlEvent::Fetching {
            index,
            max_pages,
            url,
        } => format!("[{}/{}] Fetching {}", index, max_pages, extract_url_path(url)),
        CrawlEvent::Extracted {
            url,
            title,
            new_links,
        } => format!(
            "Extracted '{}' from {} ({} new links)",
            title,
            extract_url_path(url),
            new_links
        ),
        CrawlEvent::NoContent { url } => format!("No content region in {}", extract_url_path(url)),
        CrawlEvent::Failed { url, error } => format!("[!]  Failed {}: {}", url, error),
    }
}

/// Execute a crawl with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome, ScanError> {
    let CrawlOptions {
        seed_url,
        max_pages,
        delay,
        timeout,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let event_callback: sitebrief_scanner::ProgressCallback =
        Arc::new(move |event: CrawlEvent| {
            let message = describe_event(&event);
            if let Some(ref pb) = pb_clone {
                match event {
                    CrawlEvent::Failed { .. } => pb.println(&message),
                    _ => pb.set_message(message.clone()),
                }
            }
            if let Some(ref callback) = progress_callback {
                callback(message);
            }
        });

    let crawler = Crawler::new()
        .with_delay(delay)
        .with_timeout(timeout)
        .with_progress_callback(event_callback);

    let outcome = crawler.crawl(&seed_url, max_pages).await;

    if let Some(ref pb) = progress_bar {
        match &outcome {
            Ok(outcome) => pb.finish_with_message(format!(
                "Crawl complete! {} pages extracted from {} URLs visited",
                outcome.pages.len(),
                outcome.visited.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}

/// Generate a crawl report from an outcome, grouped by module
pub fn generate_crawl_report(outcome: &CrawlOutcome) -> String {
    let modules = group_by_module(&outcome.pages);
    let total_words: usize = outcome.pages.iter().map(|p| p.word_count).sum();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  URLs visited: {}\n", outcome.visited.len()));
    report.push_str(&format!("  Pages extracted: {}\n", outcome.pages.len()));
    report.push_str(&format!("  Modules: {}\n", modules.len()));
    report.push_str(&format!("  Total words: {}\n", total_words));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for module in &modules {
        report.push_str(&format!("## {}\n", module.name));
        report.push_str(&format!(
            "  {} pages, {} words\n\n",
            module.pages.len(),
            module.total_words()
        ));

        for page in &module.pages {
            report.push_str(&format!(
                "  {} \x1b[90m{}\x1b[0m\n",
                extract_url_path(&page.url),
                page.title
            ));
        }
        report.push('\n');
    }

    report
}

/// Machine-readable form of the crawl report
pub fn generate_crawl_json(outcome: &CrawlOutcome) -> Result<String, serde_json::Error> {
    let modules = group_by_module(&outcome.pages);
    let json_report = serde_json::json!({
        "visited": outcome.visited,
        "modules": modules,
    });
    serde_json::to_string_pretty(&json_report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_event_fetching() {
        let event = CrawlEvent::Fetching {
            index: 3,
            max_pages: 10,
            url: "https://example.com/docs/intro".to_string(),
        };
        assert_eq!(describe_event(&event), "[3/10] Fetching /docs/intro");
    }

    #[test]
    fn test_describe_event_failed_keeps_full_url() {
        let event = CrawlEvent::Failed {
            url: "https://example.com/gone".to_string(),
            error: "HTTP 404".to_string(),
        };
        assert!(describe_event(&event).contains("https://example.com/gone"));
    }
}
