use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("quorra")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("quorra")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"verbose" "Log debug output from the crawler and probes")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the quorra database on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the quorra database")
                        .default_value("~/.config/quorra/"),
                )
                .arg(
                    arg!(-f --"force")
                        .help(
                            "Forces the overwriting of any existing database at the specified \
                        location.",
                        )
                        .required(false),
                ),
        )
        .subcommand(
            command!("scan")
                .about(
                    "Crawl a site from a seed URL, then probe every discovered URL for reflected \
                XSS, SQL injection and local file inclusion.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl (https:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(-l --"links" <LINKS>)
                        .required(false)
                        .help("Maximum number of URLs to crawl")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                )
                .arg(
                    arg!(-c --"concurrency" <CONCURRENCY>)
                        .required(false)
                        .help("Maximum number of URLs probed at once")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("20"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"db" <PATH>)
                        .required(false)
                        .help("Path to the scan database")
                        .default_value("~/.config/quorra/quorra.db"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv")
                        .value_parser(["text", "json", "csv"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"no-store")
                        .required(false)
                        .help("Do not record this scan in the database")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("scans")
                .about("Browse recorded scans")
                .subcommand_required(true)
                .arg(
                    arg!(--"db" <PATH>)
                        .required(false)
                        .help("Path to the scan database")
                        .default_value("~/.config/quorra/quorra.db")
                        .global(true),
                )
                .subcommand(command!("list").about("List all recorded scans, newest first"))
                .subcommand(
                    command!("show").about("Show a scan and its findings").arg(
                        arg!(<ID>)
                            .required(true)
                            .help("The scan id")
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    command!("remove")
                        .about("Removes a scan and its findings")
                        .arg(
                            arg!(<ID>)
                                .required(true)
                                .help("The scan id")
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            command!("export")
                .about("Export the findings of a recorded scan")
                .arg(
                    arg!(<ID>)
                        .required(true)
                        .help("The scan id")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Export format: csv, json, text")
                        .value_parser(["csv", "json", "text"])
                        .default_value("csv"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Output file (default: scan_results_<ID>.<ext>)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"db" <PATH>)
                        .required(false)
                        .help("Path to the scan database")
                        .default_value("~/.config/quorra/quorra.db"),
                ),
        )
}
