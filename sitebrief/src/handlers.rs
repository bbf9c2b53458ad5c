use clap::ArgMatches;
use colored::Colorize;
use sitebrief_core::analysis::AnalysisSource;
use sitebrief_core::config::AnalyzerConfig;
use sitebrief_core::crawl::{
    CrawlOptions, execute_crawl, generate_crawl_json, generate_crawl_report,
};
use sitebrief_core::pipeline::{PipelineOptions, PipelineOutcome, run_pipeline};
use sitebrief_core::report::ReportFormat;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use url::Url;

pub const EXIT_OK: i32 = 0;
pub const EXIT_EMPTY_CRAWL: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse a seed URL, adding https:// when no scheme is given
pub fn parse_seed_url(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("A seed URL is required".to_string());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| format!("Invalid URL '{}': {}", input, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("Unsupported URL scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err(format!("URL '{}' has no host", input));
    }

    Ok(url.to_string())
}

/// Crawl settings shared by the `crawl` and `report` subcommands
pub fn build_crawl_options(sub_matches: &ArgMatches) -> Result<CrawlOptions, String> {
    let raw_url = sub_matches
        .get_one::<String>("url")
        .ok_or_else(|| "Missing --url".to_string())?;
    let max_pages = *sub_matches.get_one::<usize>("max-pages").unwrap_or(&50);
    if max_pages == 0 {
        return Err("--max-pages must be at least 1".to_string());
    }
    let delay_ms = *sub_matches.get_one::<u64>("delay-ms").unwrap_or(&500);
    let timeout = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);

    let mut options = CrawlOptions::new(parse_seed_url(raw_url)?);
    options.max_pages = max_pages;
    options.delay = Duration::from_millis(delay_ms);
    options.timeout = Duration::from_secs(timeout);
    options.show_progress_bars = !sub_matches.get_flag("quiet");
    Ok(options)
}

pub fn build_pipeline_options(sub_matches: &ArgMatches) -> Result<PipelineOptions, String> {
    let crawl = build_crawl_options(sub_matches)?;

    let mut analyzer = match sub_matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            AnalyzerConfig::from_file(expanded).map_err(|e| e.to_string())?
        }
        None => AnalyzerConfig::default(),
    };
    if let Some(key) = sub_matches.get_one::<String>("api-key") {
        analyzer = analyzer.with_api_key(Some(key.clone()));
    }

    let output = sub_matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("./reports");
    let output_dir = PathBuf::from(shellexpand::tilde(output).into_owned());

    let format_name = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| format!("Unknown report format '{}'", format_name))?;

    Ok(PipelineOptions {
        crawl,
        analyzer,
        output_dir,
        format,
    })
}

fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub async fn handle_crawl(sub_matches: &ArgMatches) -> i32 {
    let options = match build_crawl_options(sub_matches) {
        Ok(options) => options,
        Err(e) => {
            print_error(&e);
            return EXIT_ERROR;
        }
    };
    let as_json = sub_matches
        .get_one::<String>("format")
        .is_some_and(|f| f == "json");
    let quiet = sub_matches.get_flag("quiet");

    if !quiet {
        println!("\n{} Crawling {}", "→".blue(), options.seed_url.bright_white());
        println!("Max pages: {}", options.max_pages);
        println!("Delay: {} ms\n", options.delay.as_millis());
    }

    let outcome = match execute_crawl(options, None).await {
        Ok(outcome) => outcome,
        Err(e) => {
            print_error(&format!("Crawl failed: {}", e));
            return EXIT_ERROR;
        }
    };

    if outcome.is_empty() {
        print_error(&format!(
            "No pages could be extracted ({} URLs visited)",
            outcome.visited.len()
        ));
        return EXIT_EMPTY_CRAWL;
    }

    if as_json {
        match generate_crawl_json(&outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                print_error(&format!("Failed to serialize crawl: {}", e));
                return EXIT_ERROR;
            }
        }
    } else {
        if !quiet {
            println!("\n{} Crawl complete!\n", "✓".green().bold());
        }
        print!("{}", generate_crawl_report(&outcome));
    }

    EXIT_OK
}

pub async fn handle_report(sub_matches: &ArgMatches) -> i32 {
    let options = match build_pipeline_options(sub_matches) {
        Ok(options) => options,
        Err(e) => {
            print_error(&e);
            return EXIT_ERROR;
        }
    };
    let quiet = sub_matches.get_flag("quiet");

    if !quiet {
        let mode = if options.analyzer.api_key.is_some() {
            "remote (heuristic fallback)"
        } else {
            "heuristic (no API key)"
        };
        println!(
            "\n{} Briefing {}",
            "→".blue(),
            options.crawl.seed_url.bright_white()
        );
        println!("Max pages: {}", options.crawl.max_pages);
        println!("Analysis: {}", mode);
        println!("Output: {}\n", options.output_dir.display());
    }

    let outcome = match run_pipeline(options, None).await {
        Ok(outcome) => outcome,
        Err(e) => {
            print_error(&format!("Report failed: {}", e));
            return EXIT_ERROR;
        }
    };

    match outcome {
        PipelineOutcome::EmptyCrawl { visited } => {
            print_error(&format!(
                "No pages could be extracted ({} URLs visited); no reports written",
                visited
            ));
            EXIT_EMPTY_CRAWL
        }
        PipelineOutcome::Completed { modules } => {
            println!(
                "\n{} Generated {} module reports\n",
                "✓".green().bold(),
                modules.len()
            );
            for module in &modules {
                let source = match module.source {
                    AnalysisSource::Remote => "remote".cyan(),
                    AnalysisSource::Heuristic => "heuristic".yellow(),
                };
                println!(
                    "  {} {} ({} pages, {}) {}",
                    "✓".green(),
                    module.module_name.bright_white().bold(),
                    module.page_count,
                    source,
                    module.path.display().to_string().dimmed()
                );
            }
            println!();
            EXIT_OK
        }
    }
}
