// Grouping of crawled pages into modules by first path segment

use serde::{Deserialize, Serialize};
use sitebrief_scanner::PageRecord;
use std::collections::HashMap;
use url::Url;

/// Module name for pages at the site root.
pub const HOME_MODULE: &str = "Home";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// Pages in crawl order.
    pub pages: Vec<PageRecord>,
}

impl Module {
    pub fn total_words(&self) -> usize {
        self.pages.iter().map(|p| p.word_count).sum()
    }
}

/// Upper-case a letter that follows a non-letter, lower-case every other letter.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// Module name for a page URL.
///
/// `/docs/intro` is "Docs", `/getting-started/` is "Getting Started" and `/`
/// is "Home". A URL that fails to parse is treated as a root page.
pub fn module_name_for(url: &str) -> String {
    let first_segment = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path()
            .split('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string)
    });

    match first_segment {
        Some(segment) => title_case(&segment.replace(['-', '_'], " ")),
        None => HOME_MODULE.to_string(),
    }
}

/// Partition pages into modules.
///
/// Modules appear in the order their first page appears, and each module keeps
/// its pages in input order.
pub fn group_by_module(pages: &[PageRecord]) -> Vec<Module> {
    let mut modules: Vec<Module> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for page in pages {
        let name = module_name_for(&page.url);
        match index.get(&name) {
            Some(&i) => modules[i].pages.push(page.clone()),
            None => {
                index.insert(name.clone(), modules.len());
                modules.push(Module {
                    name,
                    pages: vec![page.clone()],
                });
            }
        }
    }

    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("getting started"), "Getting Started");
        assert_eq!(title_case("API reference"), "Api Reference");
        assert_eq!(title_case("api v2"), "Api V2");
        assert_eq!(title_case("3d models"), "3D Models");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_module_name_for_root_variants() {
        assert_eq!(module_name_for("https://example.com/"), HOME_MODULE);
        assert_eq!(module_name_for("https://example.com"), HOME_MODULE);
        assert_eq!(module_name_for("https://example.com//"), HOME_MODULE);
    }

    #[test]
    fn test_module_name_uses_first_segment() {
        assert_eq!(module_name_for("https://example.com/docs/intro"), "Docs");
        assert_eq!(
            module_name_for("https://example.com/getting-started/"),
            "Getting Started"
        );
        assert_eq!(module_name_for("https://example.com/api_ref/v1"), "Api Ref");
        assert_eq!(module_name_for("https://example.com//blog/post"), "Blog");
    }
}
