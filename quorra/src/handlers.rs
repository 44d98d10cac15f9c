use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use quorra_core::data::{Database, ScanRecord, ScanStatus};
use quorra_core::report::{
    DEFAULT_DISPLAY_OFFSET_SECS, ReportData, ReportFormat, default_file_name, display_offset,
    format_timestamp, gather_report_data, generate_report, generate_text_report, save_report,
};
use quorra_core::scan::{ScanOptions, execute_scan, run_recorded_scan};
use quorra_scanner::Finding;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;

pub const DATABASE_FILE_NAME: &str = "quorra.db";

/// Install the global fmt subscriber. Debug output only with `--verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn required<'a, T>(args: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id)
        .ok_or_else(|| anyhow!("missing required argument '{}'", id))
}

/// Expand `~` in a user supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn database_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(DATABASE_FILE_NAME)
}

/// Open an existing database, failing with a hint when `init` has not run.
pub fn open_database(db_path: &Path) -> Result<Database> {
    if !Database::exists(db_path) {
        bail!(
            "No database found at {}. Run `quorra init` first.",
            db_path.display()
        );
    }
    Database::new(db_path).with_context(|| format!("Failed to open {}", db_path.display()))
}

/// Open the database, creating it and its directory on first use.
pub fn open_or_create_database(db_path: &Path) -> Result<Database> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Database::new(db_path).with_context(|| format!("Failed to open {}", db_path.display()))
}

/// Create the config directory and a fresh database inside it. An existing
/// database is replaced only when `overwrite` is set.
pub fn initialize_database(config_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let db_path = database_path_in(config_dir);
    if overwrite && Database::exists(&db_path) {
        Database::drop(&db_path)
            .with_context(|| format!("Failed to remove {}", db_path.display()))?;
    }

    Database::new(&db_path)
        .with_context(|| format!("Failed to create database at {}", db_path.display()))?;
    Ok(db_path)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    print_divider();
    println!("{}", "  QUORRA INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let config_dir = expand_path(required::<String>(args, "PATH")?);
    let force = args.get_flag("force");
    let db_path = database_path_in(&config_dir);

    println!(
        "{} Target: {}",
        "→".blue(),
        config_dir.display().to_string().bright_white()
    );
    println!();

    let mut overwrite = force;
    if Database::exists(&db_path) && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("Database already exists at:");
        println!(
            "  {} {}",
            "•".yellow(),
            db_path.display().to_string().bright_white()
        );
        println!();
        println!(
            "{}",
            "Overwriting it deletes every recorded scan.".yellow()
        );

        let response = print_prompt("Do you want to continue? [y/N]:")?;
        println!();

        if response != "y" && response != "yes" {
            println!("{} Keeping existing database", "→".blue());
            return Ok(());
        }
        overwrite = true;
    }

    if overwrite && Database::exists(&db_path) {
        println!("{} Deleting existing database", "→".yellow().bold());
    }

    let db_path = initialize_database(&config_dir, overwrite)?;

    println!();
    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Config directory: {}",
        "✓".green().bold(),
        config_dir.display().to_string().bright_white()
    );
    println!(
        "{} Database: {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );
    println!();
    Ok(())
}

pub fn scan_options_from_args(args: &ArgMatches) -> Result<ScanOptions> {
    let mut options = ScanOptions::new(required::<String>(args, "url")?.as_str());
    options.link_limit = *required::<usize>(args, "links")?;
    options.max_concurrency = *required::<usize>(args, "concurrency")?;
    options.timeout_secs = *required::<u64>(args, "timeout")?;
    options.show_progress_bars = !args.get_flag("quiet");
    Ok(options)
}

fn report_format(args: &ArgMatches) -> Result<ReportFormat> {
    let name = required::<String>(args, "format")?;
    ReportFormat::from_str(name).ok_or_else(|| anyhow!("Unknown report format '{}'", name))
}

/// Print the report, or write it to `output` when one is given.
fn emit_report(content: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            save_report(content, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Report saved to: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

pub async fn handle_scan(args: &ArgMatches) -> Result<()> {
    let options = scan_options_from_args(args)?;
    let format = report_format(args)?;
    let output = args.get_one::<PathBuf>("output");
    let offset = display_offset(DEFAULT_DISPLAY_OFFSET_SECS);

    println!(
        "\n{} Scanning {} (up to {} links, {} at a time)\n",
        "→".blue(),
        options.target.bright_white(),
        options.link_limit,
        options.max_concurrency
    );

    let data = if args.get_flag("no-store") {
        let report = execute_scan(options, None).await.map_err(|e| anyhow!(e))?;
        ReportData::from_scan_report(&report, chrono::Utc::now().timestamp())
    } else {
        let db_path = expand_path(required::<String>(args, "db")?);
        let mut db = open_or_create_database(&db_path)?;
        let recorded = run_recorded_scan(&mut db, options, None)
            .await
            .map_err(|e| anyhow!(e))?;

        println!(
            "{} Scan {} recorded in {}",
            "✓".green().bold(),
            recorded.scan_id.to_string().cyan(),
            db_path.display()
        );
        gather_report_data(&db, recorded.scan_id)?
            .ok_or_else(|| anyhow!("Scan {} vanished from the database", recorded.scan_id))?
    };
    println!(
        "{} {}\n",
        "✓".green().bold(),
        summarize_findings(&data.vulnerabilities)
    );

    let content = generate_report(&data, format, offset).map_err(|e| anyhow!(e))?;
    emit_report(&content, output)
}

fn status_colored(status: ScanStatus, width: usize) -> colored::ColoredString {
    let label = format!("{:<width$}", status.label(), width = width);
    match status {
        ScanStatus::Scanning => label.yellow(),
        ScanStatus::Completed => label.green(),
        ScanStatus::Failed => label.red(),
    }
}

/// Table of recorded scans for `scans list`.
pub fn render_scan_list(scans: &[ScanRecord]) -> String {
    if scans.is_empty() {
        return "No scans recorded yet.\n".to_string();
    }

    let offset = display_offset(DEFAULT_DISPLAY_OFFSET_SECS);
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<40} {:<20} {:<12} {}\n",
        "ID", "TARGET", "DATE", "STATUS", "VULNS"
    ));
    out.push_str(&format!("{}\n", "─".repeat(88)));

    for scan in scans {
        out.push_str(&format!(
            "{:<6} {:<40} {:<20} {} {}\n",
            scan.id,
            truncate(&scan.target_url, 40),
            format_timestamp(scan.scan_date, offset),
            status_colored(scan.status, 12),
            scan.vulnerability_count
        ));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn parse_scan_id(args: &ArgMatches) -> Result<i64> {
    required::<i64>(args, "ID").copied()
}

pub fn handle_scans_list(args: &ArgMatches) -> Result<()> {
    let db = open_database(&expand_path(required::<String>(args, "db")?))?;
    let scans = db.list_scans()?;
    print!("{}", render_scan_list(&scans));
    Ok(())
}

pub fn handle_scans_show(args: &ArgMatches) -> Result<()> {
    let db = open_database(&expand_path(required::<String>(args, "db")?))?;
    let scan_id = parse_scan_id(args)?;

    let data = gather_report_data(&db, scan_id)?
        .ok_or_else(|| anyhow!("No scan with id {}", scan_id))?;
    print!(
        "{}",
        generate_text_report(&data, display_offset(DEFAULT_DISPLAY_OFFSET_SECS))
    );
    Ok(())
}

pub fn handle_scans_remove(args: &ArgMatches) -> Result<()> {
    let db = open_database(&expand_path(required::<String>(args, "db")?))?;
    let scan_id = parse_scan_id(args)?;

    if !db.delete_scan(scan_id)? {
        bail!("No scan with id {}", scan_id);
    }
    println!("{} Removed scan {}", "✓".green().bold(), scan_id);
    Ok(())
}

/// Export a stored scan. Returns the path written.
pub fn export_scan(
    db: &Database,
    scan_id: i64,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let data = gather_report_data(db, scan_id)?
        .ok_or_else(|| anyhow!("No scan with id {}", scan_id))?;

    let content = generate_report(
        &data,
        format,
        display_offset(DEFAULT_DISPLAY_OFFSET_SECS),
    )
    .map_err(|e| anyhow!(e))?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_file_name(scan_id, format)));
    save_report(&content, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

pub fn handle_export(args: &ArgMatches) -> Result<()> {
    let db = open_database(&expand_path(required::<String>(args, "db")?))?;
    let scan_id = parse_scan_id(args)?;
    let format = report_format(args)?;
    let output = args.get_one::<PathBuf>("output").map(PathBuf::as_path);

    let path = export_scan(&db, scan_id, format, output)?;
    println!(
        "{} Exported scan {} to: {}",
        "✓".green().bold(),
        scan_id,
        path.display().to_string().bright_white()
    );
    Ok(())
}

/// Findings summary line used after a scan.
pub fn summarize_findings(findings: &[Finding]) -> String {
    match findings.len() {
        0 => "No vulnerabilities found".to_string(),
        1 => "1 vulnerability found".to_string(),
        n => format!("{} vulnerabilities found", n),
    }
}
