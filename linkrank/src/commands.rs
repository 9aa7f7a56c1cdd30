use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkrank")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkrank")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(
            arg!(-v --"verbose" "Log crawl progress to stderr (RUST_LOG overrides)")
                .required(false),
        )
        .subcommand_required(false)
        .subcommand(
            command!("graph")
                .about(
                    "Crawl outward from a seed page and rank every discovered page by \
                link structure.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL (http:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(--"max-hops" <HOPS>)
                        .required(false)
                        .help("Breadth-first hops to follow from the seed (1-3)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(--"max-pages" <PAGES>)
                        .required(false)
                        .help("Upper bound on discovered pages (10-2000)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("300"),
                )
                .arg(
                    arg!(--"same-domain")
                        .required(false)
                        .help("Only follow links on the seed's host")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"drop-failed")
                        .required(false)
                        .help("Leave out pages that could not be fetched")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-c --"concurrency" <NUM>)
                        .required(false)
                        .help("Maximum simultaneous requests (default: 20)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"config" <PATH>)
                        .required(false)
                        .help("JSON file with crawl and ranking settings")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
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
                        .help("Report format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"top" <N>)
                        .required(false)
                        .help("Only list the N highest-ranked pages in text/markdown reports")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            command!("config").about("Print the default crawl settings as JSON"),
        )
}
