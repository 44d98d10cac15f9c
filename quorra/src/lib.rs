pub mod commands;
pub mod handlers;

pub use handlers::{
    database_path_in, expand_path, export_scan, initialize_database, open_database,
    open_or_create_database, render_scan_list, scan_options_from_args, summarize_findings,
};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
