use colored::Colorize;
use quorra::commands::command_argument_builder;
use quorra::handlers::{
    handle_export, handle_init, handle_scan, handle_scans_list, handle_scans_remove,
    handle_scans_show, init_logging,
};
use quorra_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_logging(chosen_command.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        // No subcommand provided, just show the banner
        None => return,
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("scan", primary_command)) => handle_scan(primary_command).await,
        Some(("scans", primary_command)) => match primary_command.subcommand() {
            Some(("list", secondary_command)) => handle_scans_list(secondary_command),
            Some(("show", secondary_command)) => handle_scans_show(secondary_command),
            Some(("remove", secondary_command)) => handle_scans_remove(secondary_command),
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("export", primary_command)) => handle_export(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
