// Per-module report documents

use crate::analysis::Analysis;
use crate::error::ReportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitebrief_scanner::PageRecord;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const TITLE_COLUMN_CHARS: usize = 50;
const NO_PROJECTS: &str = "No specific projects identified.";
const NO_CONCEPTS: &str = "No key concepts identified.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Html,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "html" => Some(ReportFormat::Html),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Everything one module report shows.
#[derive(Debug, Clone)]
pub struct ModuleReport<'a> {
    pub module_name: &'a str,
    pub source_url: &'a str,
    pub generated_at: DateTime<Utc>,
    pub analysis: &'a Analysis,
    pub pages: &'a [PageRecord],
}

#[derive(Debug, Serialize)]
struct PageRow<'a> {
    title: &'a str,
    url: &'a str,
    word_count: usize,
}

impl ModuleReport<'_> {
    fn generated_on(&self) -> String {
        self.generated_at.format("%B %d, %Y").to_string()
    }
}

/// `<module name lowercased, spaces as underscores>_analysis.<ext>`
pub fn report_filename(module_name: &str, format: ReportFormat) -> String {
    format!(
        "{}_analysis.{}",
        module_name.to_lowercase().replace(' ', "_"),
        format.extension()
    )
}

fn short_title(title: &str) -> String {
    title.chars().take(TITLE_COLUMN_CHARS).collect()
}

pub fn render_report(report: &ModuleReport<'_>, format: ReportFormat) -> Result<String, ReportError> {
    Ok(match format {
        ReportFormat::Text => generate_text_report(report),
        ReportFormat::Markdown => generate_markdown_report(report),
        ReportFormat::Html => generate_html_report(report),
        ReportFormat::Json => generate_json_report(report)?,
    })
}

pub fn generate_text_report(report: &ModuleReport<'_>) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("  Module: {}\n", report.module_name));
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str("Analysis Report\n");
    out.push_str(&format!("Generated:    {}\n", report.generated_on()));
    out.push_str(&format!("Source:       {}\n\n", report.source_url));

    out.push_str("SUMMARY\n\n");
    out.push_str(&wrap_text(&report.analysis.summary, 80, "  "));
    out.push('\n');

    out.push_str("THINGS YOU CAN BUILD\n\n");
    if report.analysis.buildable_projects.is_empty() {
        out.push_str(&format!("  {}\n", NO_PROJECTS));
    } else {
        for (idx, project) in report.analysis.buildable_projects.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", idx + 1, project));
        }
    }
    out.push('\n');

    out.push_str("KEY CONCEPTS\n\n");
    if report.analysis.key_concepts.is_empty() {
        out.push_str(&format!("  {}\n", NO_CONCEPTS));
    } else {
        out.push_str(&wrap_text(&report.analysis.key_concepts.join(", "), 80, "  "));
    }
    out.push('\n');

    out.push_str(RULE);
    out.push('\n');
    out.push_str("PAGES IN THIS MODULE\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!("{:<4} {:<52} {}\n", "#", "Page Title", "URL"));
    for (idx, page) in report.pages.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<52} {}\n",
            idx + 1,
            short_title(&page.title),
            page.url
        ));
    }

    out
}

fn escape_markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn generate_markdown_report(report: &ModuleReport<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Module: {}\n\n", report.module_name));
    out.push_str("## Analysis Report\n\n");
    out.push_str(&format!("Generated: {}  \n", report.generated_on()));
    out.push_str(&format!("Source: {}\n\n", report.source_url));

    out.push_str("## Summary\n\n");
    out.push_str(&report.analysis.summary);
    out.push_str("\n\n");

    out.push_str("## Things You Can Build\n\n");
    if report.analysis.buildable_projects.is_empty() {
        out.push_str(NO_PROJECTS);
        out.push('\n');
    } else {
        for (idx, project) in report.analysis.buildable_projects.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", idx + 1, project));
        }
    }
    out.push('\n');

    out.push_str("## Key Concepts\n\n");
    if report.analysis.key_concepts.is_empty() {
        out.push_str(NO_CONCEPTS);
    } else {
        out.push_str(&report.analysis.key_concepts.join(", "));
    }
    out.push_str("\n\n");

    out.push_str("## Pages in This Module\n\n");
    out.push_str("| # | Page Title | URL |\n");
    out.push_str("|---|------------|-----|\n");
    for (idx, page) in report.pages.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            idx + 1,
            escape_markdown_cell(&short_title(&page.title)),
            escape_markdown_cell(&page.url)
        ));
    }

    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn generate_html_report(report: &ModuleReport<'_>) -> String {
    let name = escape_html(report.module_name);
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>Module: {}</title>\n", name));
    out.push_str(
        "<style>\n\
         body { font-family: Helvetica, Arial, sans-serif; max-width: 50em; margin: 2em auto; }\n\
         h1 { color: #1e40af; text-align: center; }\n\
         h2 { color: #dc2626; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th { background: grey; color: whitesmoke; text-align: left; }\n\
         td { background: beige; }\n\
         th, td { border: 1px solid black; padding: 4px; }\n\
         </style>\n",
    );
    out.push_str("</head>\n<body>\n");

    out.push_str(&format!("<h1>Module: {}</h1>\n", name));
    out.push_str("<h3>Analysis Report</h3>\n");
    out.push_str(&format!("<p>Generated: {}</p>\n", report.generated_on()));
    out.push_str(&format!("<p>Source: {}</p>\n", escape_html(report.source_url)));

    out.push_str("<h2>Summary</h2>\n");
    out.push_str(&format!("<p>{}</p>\n", escape_html(&report.analysis.summary)));

    out.push_str("<h2>Things You Can Build</h2>\n");
    if report.analysis.buildable_projects.is_empty() {
        out.push_str(&format!("<p>{}</p>\n", NO_PROJECTS));
    } else {
        out.push_str("<ol>\n");
        for project in &report.analysis.buildable_projects {
            out.push_str(&format!("<li>{}</li>\n", escape_html(project)));
        }
        out.push_str("</ol>\n");
    }

    out.push_str("<h2>Key Concepts</h2>\n");
    if report.analysis.key_concepts.is_empty() {
        out.push_str(&format!("<p>{}</p>\n", NO_CONCEPTS));
    } else {
        out.push_str(&format!(
            "<p>{}</p>\n",
            escape_html(&report.analysis.key_concepts.join(", "))
        ));
    }

    out.push_str("<h2>Pages in This Module</h2>\n");
    if !report.pages.is_empty() {
        out.push_str("<table>\n<tr><th>#</th><th>Page Title</th><th>URL</th></tr>\n");
        for (idx, page) in report.pages.iter().enumerate() {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                idx + 1,
                escape_html(&short_title(&page.title)),
                escape_html(&page.url)
            ));
        }
        out.push_str("</table>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

pub fn generate_json_report(report: &ModuleReport<'_>) -> Result<String, serde_json::Error> {
    let pages: Vec<PageRow<'_>> = report
        .pages
        .iter()
        .map(|p| PageRow {
            title: &p.title,
            url: &p.url,
            word_count: p.word_count,
        })
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitebrief",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": report.generated_at.to_rfc3339(),
                "source": report.source_url,
            },
            "module": report.module_name,
            "summary": report.analysis.summary,
            "buildable_projects": report.analysis.buildable_projects,
            "key_concepts": report.analysis.key_concepts,
            "pages": pages,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Render `report` into `output_dir` and return the written path.
pub fn write_module_report(
    report: &ModuleReport<'_>,
    format: ReportFormat,
    output_dir: &Path,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_filename(report.module_name, format));
    let content = render_report(report, format)?;
    save_report(&content, &path)?;
    Ok(path)
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > width - indent.len() && !current_line.is_empty() {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
