use quorra::commands::command_argument_builder;
use quorra::handlers::*;
use quorra_core::data::Database;
use quorra_core::report::ReportFormat;
use quorra_scanner::{Finding, VulnType};
use tempfile::TempDir;

fn seeded_db(temp_dir: &TempDir) -> (Database, i64) {
    let mut db = Database::new(&temp_dir.path().join("quorra.db")).unwrap();
    let scan_id = db.create_scan("http://example.test").unwrap();
    db.insert_findings(
        scan_id,
        &[Finding::new(
            "http://example.test/item?id=1'",
            VulnType::SqlInjection,
            "'",
        )],
    )
    .unwrap();
    db.complete_scan(scan_id, 3).unwrap();
    (db, scan_id)
}

#[test]
fn test_scan_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["quorra", "scan", "-u", "example.test"])
        .unwrap();
    let (name, scan_args) = matches.subcommand().unwrap();
    assert_eq!(name, "scan");

    let options = scan_options_from_args(scan_args).unwrap();
    assert_eq!(options.target, "example.test");
    assert_eq!(options.link_limit, 50);
    assert_eq!(options.max_concurrency, 20);
    assert_eq!(options.timeout_secs, 10);
    assert!(options.show_progress_bars);
}

#[test]
fn test_scan_arguments() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "quorra",
            "scan",
            "-u",
            "http://example.test",
            "-l",
            "5",
            "-c",
            "2",
            "--timeout",
            "3",
            "--no-store",
            "-q",
        ])
        .unwrap();
    let (_, scan_args) = matches.subcommand().unwrap();

    let options = scan_options_from_args(scan_args).unwrap();
    assert_eq!(options.link_limit, 5);
    assert_eq!(options.max_concurrency, 2);
    assert_eq!(options.timeout_secs, 3);
    assert!(!options.show_progress_bars);
    assert!(scan_args.get_flag("no-store"));
}

#[test]
fn test_scan_requires_url() {
    let result = command_argument_builder().try_get_matches_from(["quorra", "scan"]);
    assert!(result.is_err());
}

#[test]
fn test_scan_rejects_unknown_format() {
    let result = command_argument_builder().try_get_matches_from([
        "quorra",
        "scan",
        "-u",
        "example.test",
        "-f",
        "pdf",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_scans_subcommands_parse_ids() {
    let matches = command_argument_builder()
        .try_get_matches_from(["quorra", "scans", "show", "42", "--db", "/tmp/q.db"])
        .unwrap();
    let (_, scans_args) = matches.subcommand().unwrap();
    let (name, show_args) = scans_args.subcommand().unwrap();

    assert_eq!(name, "show");
    assert_eq!(*show_args.get_one::<i64>("ID").unwrap(), 42);
    assert_eq!(show_args.get_one::<String>("db").unwrap(), "/tmp/q.db");

    let result =
        command_argument_builder().try_get_matches_from(["quorra", "scans", "remove", "abc"]);
    assert!(result.is_err());
}

#[test]
fn test_export_defaults_to_csv() {
    let matches = command_argument_builder()
        .try_get_matches_from(["quorra", "export", "7"])
        .unwrap();
    let (_, export_args) = matches.subcommand().unwrap();

    assert_eq!(export_args.get_one::<String>("format").unwrap(), "csv");
    assert!(export_args.get_one::<std::path::PathBuf>("output").is_none());
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/.config/quorra");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with(".config/quorra"));
}

#[test]
fn test_initialize_database() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("nested").join("quorra");

    let db_path = initialize_database(&config_dir, false).unwrap();
    assert_eq!(db_path, database_path_in(&config_dir));
    assert!(Database::exists(&db_path));
}

#[test]
fn test_initialize_database_overwrite_clears_scans() {
    let temp_dir = TempDir::new().unwrap();
    let (db, _) = seeded_db(&temp_dir);
    drop(db);

    let db_path = initialize_database(temp_dir.path(), true).unwrap();
    let db = Database::new(&db_path).unwrap();
    assert!(db.list_scans().unwrap().is_empty());
}

#[test]
fn test_initialize_database_keeps_scans_without_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let (db, _) = seeded_db(&temp_dir);
    drop(db);

    let db_path = initialize_database(temp_dir.path(), false).unwrap();
    let db = Database::new(&db_path).unwrap();
    assert_eq!(db.list_scans().unwrap().len(), 1);
}

#[test]
fn test_open_database_missing() {
    let temp_dir = TempDir::new().unwrap();
    let result = open_database(&temp_dir.path().join("missing.db"));

    let err = result.err().unwrap().to_string();
    assert!(err.contains("quorra init"));
}

#[test]
fn test_open_or_create_database_creates_parent() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("a").join("b").join("quorra.db");

    open_or_create_database(&db_path).unwrap();
    assert!(db_path.exists());
}

#[test]
fn test_export_scan_csv() {
    let temp_dir = TempDir::new().unwrap();
    let (db, scan_id) = seeded_db(&temp_dir);
    let output = temp_dir.path().join("out.csv");

    let path = export_scan(&db, scan_id, ReportFormat::Csv, Some(output.as_path())).unwrap();
    assert_eq!(path, output);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Vulnerability Type,Vulnerable URL,Payload\r\n"));
    assert!(content.contains("SQL Injection,http://example.test/item?id=1','"));
}

#[test]
fn test_export_scan_json() {
    let temp_dir = TempDir::new().unwrap();
    let (db, scan_id) = seeded_db(&temp_dir);
    let output = temp_dir.path().join("out.json");

    export_scan(&db, scan_id, ReportFormat::Json, Some(output.as_path())).unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"sql_injection\": 1"));
}

#[test]
fn test_export_missing_scan() {
    let temp_dir = TempDir::new().unwrap();
    let (db, _) = seeded_db(&temp_dir);

    let result = export_scan(&db, 999, ReportFormat::Csv, Some(temp_dir.path().join("x.csv").as_path()));
    assert!(result.is_err());
    assert!(!temp_dir.path().join("x.csv").exists());
}

#[test]
fn test_render_scan_list() {
    let temp_dir = TempDir::new().unwrap();
    let (db, scan_id) = seeded_db(&temp_dir);

    let listing = render_scan_list(&db.list_scans().unwrap());
    assert!(listing.contains("TARGET"));
    assert!(listing.contains("http://example.test"));
    assert!(listing.contains("Completed"));
    assert!(listing.contains(&scan_id.to_string()));
}

#[test]
fn test_render_scan_list_empty() {
    assert_eq!(render_scan_list(&[]), "No scans recorded yet.\n");
}

#[test]
fn test_summarize_findings() {
    let finding = Finding::new("http://example.test/?a='", VulnType::SqlInjection, "'");

    assert_eq!(summarize_findings(&[]), "No vulnerabilities found");
    assert_eq!(summarize_findings(&[finding.clone()]), "1 vulnerability found");
    assert_eq!(
        summarize_findings(&[finding.clone(), finding]),
        "2 vulnerabilities found"
    );
}
