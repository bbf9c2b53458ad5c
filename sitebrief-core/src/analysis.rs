//! Per-module analysis: a summary, project ideas and key concepts.
//!
//! With an API key the module digest is sent to a chat-completion endpoint and
//! the reply is parsed as JSON. Without a key, or when anything about the
//! remote call fails, a word-frequency heuristic produces the same shape.

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sitebrief_scanner::PageRecord;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Pages included in the prompt digest.
pub const PROMPT_PAGE_LIMIT: usize = 10;

/// Characters of each page's content included in the prompt digest.
pub const PROMPT_PREVIEW_CHARS: usize = 500;

const TOP_TERM_LIMIT: usize = 10;
const KEY_CONCEPT_LIMIT: usize = 5;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{4,}\b").expect("word pattern is valid"));

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("code fence pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    #[serde(alias = "buildableProjects")]
    pub buildable_projects: Vec<String>,
    #[serde(alias = "keyConcepts")]
    pub key_concepts: Vec<String>,
}

/// Where an analysis came from. Reports look the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisSource {
    Remote,
    Heuristic,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct Analyzer {
    config: AnalyzerConfig,
    client: Client,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn uses_remote(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Analyze a module. Never fails.
    pub async fn analyze(&self, module_name: &str, pages: &[PageRecord]) -> Analysis {
        self.analyze_with_source(module_name, pages).await.0
    }

    pub async fn analyze_with_source(
        &self,
        module_name: &str,
        pages: &[PageRecord],
    ) -> (Analysis, AnalysisSource) {
        if !self.uses_remote() {
            return (
                heuristic_analysis(module_name, pages),
                AnalysisSource::Heuristic,
            );
        }

        match self.analyze_remote(module_name, pages).await {
            Ok(analysis) => (analysis, AnalysisSource::Remote),
            Err(e) => {
                warn!("Analysis of module {} fell back to heuristic: {}", module_name, e);
                (
                    heuristic_analysis(module_name, pages),
                    AnalysisSource::Heuristic,
                )
            }
        }
    }

    /// One request to the summarization endpoint, no retries.
    pub async fn analyze_remote(
        &self,
        module_name: &str,
        pages: &[PageRecord],
    ) -> Result<Analysis, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AnalysisError::NoCredential)?;

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(module_name, pages),
            }],
        };

        debug!("Requesting analysis of module {} from {}", module_name, self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .timeout(self.config.timeout())
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status.as_u16()));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        let text = reply
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| AnalysisError::MalformedResponse("no text block".to_string()))?;

        parse_reply(&text)
    }
}

/// Prompt text for a module: a bounded digest plus the JSON instructions.
pub fn build_prompt(module_name: &str, pages: &[PageRecord]) -> String {
    let mut digest = format!("Module: {}\n\n", module_name);
    for (i, page) in pages.iter().take(PROMPT_PAGE_LIMIT).enumerate() {
        let preview: String = page.content.chars().take(PROMPT_PREVIEW_CHARS).collect();
        digest.push_str(&format!("Page {}: {}\n", i + 1, page.title));
        digest.push_str(&format!("URL: {}\n", page.url));
        digest.push_str(&format!("Content preview: {}...\n\n", preview));
    }

    format!(
        "Analyze this website module and provide:\n\n\
         1. A concise summary (2-3 paragraphs) of what this module covers\n\
         2. 3-5 specific things that could be built or projects that could be created based on this content\n\
         3. Key technologies or concepts mentioned\n\n\
         Module content:\n{}\n\n\
         Format your response as JSON with keys: summary, buildable_projects (array), key_concepts (array)",
        digest
    )
}

/// The JSON inside a fenced code block, or the whole reply.
fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => text.trim(),
    }
}

/// Parse a model reply into an `Analysis`, accepting a fenced JSON block.
pub fn parse_reply(text: &str) -> Result<Analysis, AnalysisError> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}

/// Lowercase words of four or more letters, ranked by frequency.
///
/// Equal counts keep the order in which the words first appeared.
pub fn top_terms(text: &str, limit: usize) -> Vec<(String, usize)> {
    let lowered = text.to_lowercase();
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for word in WORD.find_iter(&lowered).map(|m| m.as_str()) {
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word, counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

/// Local analysis from page counts and word frequencies.
pub fn heuristic_analysis(module_name: &str, pages: &[PageRecord]) -> Analysis {
    let total_words: usize = pages.iter().map(|p| p.word_count).sum();
    let all_text = pages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let terms = top_terms(&all_text, TOP_TERM_LIMIT);
    let key_concepts: Vec<String> = terms
        .iter()
        .take(KEY_CONCEPT_LIMIT)
        .map(|(word, _)| word.clone())
        .collect();

    let summary = format!(
        "This module '{}' contains {} pages with approximately {} words. \
         The content covers topics related to {}.",
        module_name,
        pages.len(),
        total_words,
        key_concepts.join(", ")
    );

    let first_project = match pages.first() {
        Some(page) => format!("Project based on {}", page.title),
        None => "Documentation website".to_string(),
    };

    Analysis {
        summary,
        buildable_projects: vec![
            first_project,
            format!("Tutorial application for {}", module_name),
            "Reference implementation".to_string(),
        ],
        key_concepts,
    }
}
