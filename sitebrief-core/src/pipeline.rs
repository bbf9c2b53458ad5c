//! Crawl, group, analyze and write one report per module.

use crate::analysis::{AnalysisSource, Analyzer};
use crate::classify::group_by_module;
use crate::config::AnalyzerConfig;
use crate::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
use crate::error::PipelineError;
use crate::report::{ModuleReport, ReportFormat, write_module_report};
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_OUTPUT_DIR: &str = "./reports";

#[derive(Debug)]
pub struct PipelineOptions {
    pub crawl: CrawlOptions,
    pub analyzer: AnalyzerConfig,
    pub output_dir: PathBuf,
    pub format: ReportFormat,
}

impl PipelineOptions {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            crawl: CrawlOptions::new(seed_url),
            analyzer: AnalyzerConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: ReportFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReport {
    pub module_name: String,
    pub page_count: usize,
    pub source: AnalysisSource,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The crawl finished without extracting a single page. No files written.
    EmptyCrawl { visited: usize },
    Completed { modules: Vec<GeneratedReport> },
}

pub async fn run_pipeline(
    options: PipelineOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<PipelineOutcome, PipelineError> {
    let PipelineOptions {
        crawl,
        analyzer,
        output_dir,
        format,
    } = options;

    let source_url = crawl.seed_url.clone();
    let outcome = execute_crawl(crawl, progress_callback.clone()).await?;

    if outcome.is_empty() {
        info!("Crawl of {} extracted no pages", source_url);
        return Ok(PipelineOutcome::EmptyCrawl {
            visited: outcome.visited.len(),
        });
    }

    let modules = group_by_module(&outcome.pages);
    info!("Found {} modules in {} pages", modules.len(), outcome.pages.len());

    let analyzer = Analyzer::new(analyzer);
    let mut generated = Vec::with_capacity(modules.len());

    for module in &modules {
        if let Some(ref callback) = progress_callback {
            callback(format!(
                "Analyzing module {} ({} pages)",
                module.name,
                module.pages.len()
            ));
        }

        let (analysis, source) = analyzer
            .analyze_with_source(&module.name, &module.pages)
            .await;

        let report = ModuleReport {
            module_name: &module.name,
            source_url: &source_url,
            generated_at: Utc::now(),
            analysis: &analysis,
            pages: &module.pages,
        };
        let path = write_module_report(&report, format, &output_dir)?;
        info!("Wrote report for {} to {}", module.name, path.display());

        generated.push(GeneratedReport {
            module_name: module.name.clone(),
            page_count: module.pages.len(),
            source,
            path,
        });
    }

    Ok(PipelineOutcome::Completed { modules: generated })
}
