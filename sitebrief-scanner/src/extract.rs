//! Readable-content extraction from fetched HTML.
//!
//! Non-content elements (`script`, `style`, `nav`, `footer`, `header`) are
//! ignored everywhere: their text is not extracted, headings inside them are
//! not collected and links inside them are not followed. The content region is
//! the first `<main>`, else the first `<article>`, else `<body>`.

use crate::canonical::resolve_link;
use crate::error::{Result, ScanError};
use crate::result::{Heading, PageRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

const EXCLUDED_ELEMENTS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

const REGION_SELECTORS: [&str; 3] = ["main", "article", "body"];

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"));

/// What one HTML document yields for the crawl.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// `None` when the document has no content region.
    pub record: Option<PageRecord>,
    /// Canonical http(s) links in document order, without duplicates.
    pub links: Vec<Url>,
}

pub fn parse_page(page_url: &Url, html: &str) -> Result<ParsedPage> {
    let document = Html::parse_document(html);

    let record = match content_region(&document)? {
        Some(region) => {
            let title = page_title(&document)?;
            let text = region_text(region);
            let headings = region_headings(region)?;
            Some(PageRecord::new(page_url.to_string(), title, &text, headings))
        }
        None => None,
    };

    let links = extract_links(&document, page_url)?;

    Ok(ParsedPage { record, links })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("selector '{}': {}", css, e)))
}

fn is_excluded(element: ElementRef<'_>) -> bool {
    EXCLUDED_ELEMENTS.contains(&element.value().name())
}

fn inside_excluded(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_excluded)
}

fn content_region(document: &Html) -> Result<Option<ElementRef<'_>>> {
    for css in REGION_SELECTORS {
        let sel = selector(css)?;
        if let Some(region) = document
            .select(&sel)
            .find(|el| !is_excluded(*el) && !inside_excluded(*el))
        {
            return Ok(Some(region));
        }
    }
    Ok(None)
}

fn page_title(document: &Html) -> Result<Option<String>> {
    let sel = selector("title")?;
    Ok(document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string()))
}

/// Text nodes under `element`, skipping excluded subtrees.
fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_excluded(child_element) {
                collect_text(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push(&**text);
        }
    }
}

/// Stripped, non-empty text nodes joined by newlines, blank runs collapsed.
fn region_text(region: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    collect_text(region, &mut pieces);

    let joined = pieces
        .iter()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_LINES.replace_all(&joined, "\n\n").into_owned()
}

fn region_headings(region: ElementRef<'_>) -> Result<Vec<Heading>> {
    let sel = selector("h1, h2, h3")?;
    let mut headings = Vec::new();

    for heading in region.select(&sel) {
        if inside_excluded(heading) {
            continue;
        }
        let level = match heading.value().name() {
            "h1" => 1,
            "h2" => 2,
            _ => 3,
        };
        let mut pieces = Vec::new();
        collect_text(heading, &mut pieces);
        headings.push(Heading {
            level,
            text: pieces.concat().trim().to_string(),
        });
    }

    Ok(headings)
}

fn extract_links(document: &Html, page_url: &Url) -> Result<Vec<Url>> {
    let sel = selector("a[href]")?;
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&sel) {
        if inside_excluded(anchor) {
            continue;
        }
        if let Some(href) = anchor.value().attr("href")
            && let Some(link) = resolve_link(page_url, href)
            && seen.insert(link.to_string())
        {
            links.push(link);
        }
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ParsedPage {
        let url = Url::parse("https://example.com/docs/intro").unwrap();
        parse_page(&url, html).unwrap()
    }

    #[test]
    fn test_prefers_main_over_body() {
        let page = parse(
            r#"<html><head><title> Intro </title></head><body>
                <p>outside</p>
                <main><h1>Welcome</h1><p>inside main</p></main>
            </body></html>"#,
        );
        let record = page.record.unwrap();
        assert_eq!(record.title, "Intro");
        assert_eq!(record.content, "Welcome\ninside main");
        assert_eq!(record.word_count, 3);
    }

    #[test]
    fn test_falls_back_to_article_then_body() {
        let page = parse("<html><body><p>lead</p><article><p>story</p></article></body></html>");
        assert_eq!(page.record.unwrap().content, "story");

        let page = parse("<html><body><p>just body</p></body></html>");
        assert_eq!(page.record.unwrap().content, "just body");
    }

    #[test]
    fn test_strips_non_content_elements() {
        let page = parse(
            r#"<html><body>
                <header>Site header</header>
                <nav>Menu</nav>
                <p>Body text</p>
                <script>var x = 1;</script>
                <style>p { color: red; }</style>
                <footer>Copyright</footer>
            </body></html>"#,
        );
        assert_eq!(page.record.unwrap().content, "Body text");
    }

    #[test]
    fn test_main_inside_header_is_ignored() {
        let page = parse(
            "<html><body><header><main>hidden</main></header><article>shown</article></body></html>",
        );
        assert_eq!(page.record.unwrap().content, "shown");
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let page = parse("<html><body><p>text</p></body></html>");
        assert_eq!(page.record.unwrap().title, "Untitled");
    }

    #[test]
    fn test_headings_in_document_order_within_region() {
        let page = parse(
            r#"<html><body>
                <h1>Outside</h1>
                <main>
                    <h2>Second <em>level</em></h2>
                    <h1>First</h1>
                    <h4>Too deep</h4>
                    <h3>Third</h3>
                </main>
            </body></html>"#,
        );
        let headings = page.record.unwrap().headings;
        assert_eq!(
            headings,
            vec![
                Heading {
                    level: 2,
                    text: "Second level".into(),
                },
                Heading {
                    level: 1,
                    text: "First".into(),
                },
                Heading {
                    level: 3,
                    text: "Third".into(),
                },
            ]
        );
    }

    #[test]
    fn test_frameset_document_has_no_region() {
        let page = parse(
            r#"<html><head><title>Frames</title></head>
               <frameset cols="50%,50%"><frame src="a.html"><frame src="b.html"></frameset>
               </html>"#,
        );
        assert!(page.record.is_none());
    }

    #[test]
    fn test_links_are_resolved_and_deduplicated() {
        let page = parse(
            r#"<html><body>
                <a href="setup">Setup</a>
                <a href="/docs/setup?x=1#top">Setup again</a>
                <a href="https://other.com/page">Other</a>
                <a href="mailto:me@example.com">Mail</a>
                <nav><a href="/hidden">Nav link</a></nav>
            </body></html>"#,
        );
        let links: Vec<String> = page.links.iter().map(|u| u.to_string()).collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/docs/setup".to_string(),
                "https://other.com/page".to_string(),
            ]
        );
    }

    #[test]
    fn test_content_is_truncated() {
        let body = format!("<html><body><p>{}</p></body></html>", "abcde ".repeat(2000));
        let record = parse(&body).record.unwrap();
        assert_eq!(record.content.chars().count(), 5000);
        assert_eq!(record.word_count, 2000);
    }
}
