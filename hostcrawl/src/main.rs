use colored::Colorize;
use hostcrawl::commands::command_argument_builder;
use hostcrawl::handlers::{handle_crawl, init_tracing};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(chosen_command.get_count("verbose"));

    let outcome = match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗ Crawl failed:".red().bold(), e);
        std::process::exit(1);
    }
}
