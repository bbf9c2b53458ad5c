pub mod analysis;
pub mod classify;
pub mod config;
pub mod crawl;
pub mod error;
pub mod pipeline;
pub mod report;

use colored::Colorize;

pub use analysis::{Analysis, AnalysisSource, Analyzer};
pub use classify::{Module, group_by_module, module_name_for};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, ConfigError, PipelineError, ReportError};
pub use pipeline::{GeneratedReport, PipelineOptions, PipelineOutcome, run_pipeline};
pub use report::ReportFormat;

pub fn print_banner() {
    let banner = r#"
     _ _       _          _       __
 ___(_) |_ ___| |__  _ __(_) ___ / _|
/ __| | __/ _ \ '_ \| '__| |/ _ \ |_
\__ \ | ||  __/ |_) | |  | |  __/  _|
|___/_|\__\___|_.__/|_|  |_|\___|_|
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "crawl a site, brief every module".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
