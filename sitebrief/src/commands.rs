use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitebrief")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitebrief")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Show debug logging")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about("Crawl a site and list its pages grouped by module")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl (https:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(-m --"max-pages" <NUM>)
                        .required(false)
                        .help("Maximum number of pages to visit")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Politeness delay after every fetch, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("report")
                .about("Crawl a site, analyze each module and write one report per module")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl (https:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(-m --"max-pages" <NUM>)
                        .required(false)
                        .help("Maximum number of pages to visit")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                )
                .arg(
                    arg!(--"api-key" <KEY>)
                        .required(false)
                        .help("API key for the summarization endpoint (heuristic analysis without one)"),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("JSON file with analyzer settings")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory to write reports into")
                        .default_value("./reports"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, markdown, html, json")
                        .value_parser(["text", "markdown", "md", "html", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Politeness delay after every fetch, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                ),
        )
}
