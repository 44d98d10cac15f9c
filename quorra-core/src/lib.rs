use colored::Colorize;

pub mod data;
pub mod report;
pub mod scan;

pub use scan::{
    RecordedScan, ScanOptions, describe_event, execute_scan, normalize_target, run_recorded_scan,
};

const BANNER: &str = r#"
   ____
  / __ \__  ______  ______________ _
 / / / / / / / __ \/ ___/ ___/ __ `/
/ /_/ / /_/ / /_/ / /  / /  / /_/ /
\___\_\__,_/\____/_/  /_/   \__,_/
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}",
        "crawling web vulnerability scanner".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!(
        "  {}\n",
        "Only scan targets you are authorized to test.".yellow()
    );
}
