use crate::canonical::{canonicalize, is_same_site, network_location};
use crate::error::{Result, ScanError};
use crate::extract::parse_page;
use crate::frontier::Frontier;
use crate::result::{CrawlOutcome, PageRecord};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const HTML_MIME_TYPES: [&str; 2] = ["text/html", "application/xhtml+xml"];

/// Whether a `Content-Type` value names an HTML document. Parameters such as
/// `charset` are ignored.
pub fn is_html_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    HTML_MIME_TYPES
        .iter()
        .any(|mime| essence.eq_ignore_ascii_case(mime))
}

/// Per-page progress, for display only.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    /// About to fetch `url`; `index` is 1-based and never exceeds `max_pages`.
    Fetching {
        index: usize,
        max_pages: usize,
        url: String,
    },
    /// A record was extracted and `new_links` URLs were queued.
    Extracted {
        url: String,
        title: String,
        new_links: usize,
    },
    /// The page was fetched but had no content region.
    NoContent { url: String },
    /// The fetch or parse failed; the URL is still counted as visited.
    Failed { url: String, error: String },
}

pub type ProgressCallback = Arc<dyn Fn(CrawlEvent) + Send + Sync>;

/// Breadth-first, single-domain crawler.
///
/// Pages are fetched one at a time. Every dequeued URL counts against
/// `max_pages` whether or not it produced a record, and a fixed delay follows
/// every attempt.
pub struct Crawler {
    timeout: Duration,
    delay: Duration,
    user_agent: String,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            progress_callback: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Politeness delay applied after every fetch attempt.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn build_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?)
    }

    fn report(&self, event: CrawlEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(event);
        }
    }

    pub async fn crawl(&self, seed_url: &str, max_pages: usize) -> Result<CrawlOutcome> {
        if max_pages == 0 {
            return Err(ScanError::InvalidConfig(
                "max_pages must be at least 1".to_string(),
            ));
        }

        let seed = Url::parse(seed_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;
        let seed_location = network_location(&seed)
            .ok_or_else(|| ScanError::InvalidUrl(format!("{}: URL has no host", seed_url)))?;

        let client = self.build_client()?;

        info!("Starting crawl of {} (max {} pages)", seed, max_pages);

        let mut frontier = Frontier::new(canonicalize(seed_url)?);
        let mut pages: Vec<PageRecord> = Vec::new();

        while frontier.visited_count() < max_pages {
            let Some(url) = frontier.next_pending() else {
                break;
            };
            if frontier.is_visited(&url) {
                continue;
            }

            self.report(CrawlEvent::Fetching {
                index: frontier.visited_count() + 1,
                max_pages,
                url: url.clone(),
            });

            let attempt = self.fetch_and_parse(&client, &url).await;
            frontier.mark_visited(&url);

            match attempt {
                Ok((record, links)) => {
                    let mut new_links = 0;
                    for link in links {
                        if is_same_site(&link, &seed_location) && frontier.enqueue(link.to_string())
                        {
                            new_links += 1;
                        }
                    }
                    debug!("Queued {} new links from {}", new_links, url);

                    match record {
                        Some(record) => {
                            self.report(CrawlEvent::Extracted {
                                url: url.clone(),
                                title: record.title.clone(),
                                new_links,
                            });
                            pages.push(record);
                        }
                        None => {
                            debug!("No content region in {}", url);
                            self.report(CrawlEvent::NoContent { url: url.clone() });
                        }
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        warn!("Timed out after {:?} fetching {}", self.timeout, url);
                    } else {
                        warn!("Crawl error for {}: {}", url, e);
                    }
                    self.report(CrawlEvent::Failed {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            "Crawl complete. Visited {} URLs, extracted {} pages",
            frontier.visited_count(),
            pages.len()
        );

        Ok(CrawlOutcome {
            pages,
            visited: frontier.into_visited(),
        })
    }

    async fn fetch_and_parse(
        &self,
        client: &Client,
        url: &str,
    ) -> Result<(Option<PageRecord>, Vec<Url>)> {
        let page_url =
            Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
        let Some(body) = Self::fetch(client, &page_url).await? else {
            return Ok((None, Vec::new()));
        };
        let parsed = parse_page(&page_url, &body)?;
        Ok((parsed.record, parsed.links))
    }

    /// Body of an HTML response. `None` for any other declared content type;
    /// a response without a `Content-Type` header is treated as HTML.
    async fn fetch(client: &Client, url: &Url) -> Result<Option<String>> {
        debug!("Fetching {}", url);

        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus(status.as_u16()));
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !is_html_content_type(content_type) {
                debug!("Skipping {} response from {}", content_type, url);
                return Ok(None);
            }
        }

        Ok(Some(response.text().await?))
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}
