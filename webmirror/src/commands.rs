use crate::CLAP_STYLING;
use clap::{ArgAction, arg, value_parser};
use std::path::PathBuf;

use crate::handlers::validate_seed_url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("webmirror")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("webmirror")
        .about("Mirror every page below a seed URL into a local directory tree")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("The seed URL. Only pages on its host, at or below its path, are mirrored")
                .value_parser(validate_seed_url),
        )
        .arg(
            arg!(-d --"dir" <PATH>)
                .required(false)
                .help("Directory where pages will be saved (default: ./data)")
                .value_parser(value_parser!(String)),
        )
        .arg(
            arg!(-c --"max-concurrency" <NUM>)
                .required(false)
                .help("Limit how many pages load or download at once (default: unbounded)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds (default: none)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(-q --"quiet" "Suppress banner, progress and report output").required(false))
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .required(false)
                .action(ArgAction::Count),
        )
}
