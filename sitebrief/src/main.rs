use sitebrief::command_argument_builder;
use sitebrief::handlers::{EXIT_OK, handle_crawl, handle_report, init_tracing};
use sitebrief_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    init_tracing(chosen_command.get_flag("verbose"));

    let code = match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command).await,
        Some(("report", primary_command)) => handle_report(primary_command).await,
        // No subcommand provided, just show the banner
        None => EXIT_OK,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    std::process::exit(code);
}
