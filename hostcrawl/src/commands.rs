use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, arg, command};
use hostcrawl_scanner::gate::AdmissionGate;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("hostcrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("hostcrawl")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress the progress spinner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl every page reachable from a seed URL on the same host and save \
                each one to disk.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to start crawling from")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"max-depth" <DEPTH>)
                        .required(false)
                        .help("How many links away from the seed to follow")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(-c --"concurrency" <N>)
                        .required(false)
                        .help("Maximum number of requests in flight at once")
                        .value_parser(
                            RangedU64ValueParser::<usize>::new()
                                .range(1..=AdmissionGate::MAX_CAPACITY as u64),
                        )
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory to write pages into, under a folder named after the host")
                        .default_value("crawl_output"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("30"),
                )
                .arg(
                    arg!(--"hold-permit")
                        .required(false)
                        .help(
                            "Keep a concurrency slot until the page has been saved and its \
                        links queued, not just until the body is downloaded",
                        ),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
}
