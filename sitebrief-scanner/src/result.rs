use serde::{Deserialize, Serialize};

/// Maximum number of characters kept in `PageRecord::content`.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Title used when a page has no `<title>` element.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1, 2 or 3
    pub level: u8,
    pub text: String,
}

/// One successfully fetched and extracted page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    /// Extracted text, truncated to `MAX_CONTENT_CHARS`.
    pub content: String,
    pub headings: Vec<Heading>,
    /// Word count of the full text, before truncation.
    pub word_count: usize,
}

impl PageRecord {
    pub fn new(url: String, title: Option<String>, text: &str, headings: Vec<Heading>) -> Self {
        Self {
            url,
            title: title.unwrap_or_else(|| UNTITLED.to_string()),
            content: text.chars().take(MAX_CONTENT_CHARS).collect(),
            headings,
            word_count: text.split_whitespace().count(),
        }
    }
}

/// Everything a finished crawl produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// Extracted pages in the order they were fetched.
    pub pages: Vec<PageRecord>,
    /// Canonical URLs that were fetched or fetch-attempted, in visit order.
    pub visited: Vec<String>,
}

impl CrawlOutcome {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_title() {
        let page = PageRecord::new("https://example.com/".into(), None, "a b c", Vec::new());
        assert_eq!(page.title, UNTITLED);
        assert_eq!(page.word_count, 3);
    }

    #[test]
    fn test_word_count_uses_untruncated_text() {
        let text = "word ".repeat(2000);
        let page = PageRecord::new("https://example.com/".into(), Some("T".into()), &text, Vec::new());

        assert_eq!(page.content.chars().count(), MAX_CONTENT_CHARS);
        assert_eq!(page.word_count, 2000);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "é".repeat(MAX_CONTENT_CHARS + 10);
        let page = PageRecord::new("https://example.com/".into(), None, &text, Vec::new());
        assert_eq!(page.content.chars().count(), MAX_CONTENT_CHARS);
    }
}
