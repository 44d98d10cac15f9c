// Tests for scan record storage

use quorra_core::data::{Database, ScanStatus};
use quorra_scanner::{Finding, VulnType};
use tempfile::TempDir;

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, db)
}

fn sample_findings() -> Vec<Finding> {
    vec![
        Finding::new(
            "http://example.test/search?q=<script>alert('xss')</script>",
            VulnType::ReflectedXss,
            "<script>alert('xss')</script>",
        ),
        Finding::new(
            "http://example.test/item?id=1'",
            VulnType::SqlInjection,
            "'",
        ),
    ]
}

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_database_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_database_exists() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    assert!(!Database::exists(&db_path));

    let _db = Database::new(&db_path).unwrap();
    assert!(Database::exists(&db_path));
}

#[test]
fn test_database_drop() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path).unwrap();
    drop(db);
    assert!(Database::exists(&db_path));

    Database::drop(&db_path).unwrap();
    assert!(!Database::exists(&db_path));
}

#[test]
fn test_reopen_keeps_records() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let scan_id = {
        let db = Database::new(&db_path).unwrap();
        db.create_scan("http://example.test").unwrap()
    };

    let db = Database::new(&db_path).unwrap();
    let scan = db.get_scan(scan_id).unwrap().unwrap();
    assert_eq!(scan.target_url, "http://example.test");
}

// ============================================================================
// Scan Lifecycle Tests
// ============================================================================

#[test]
fn test_create_scan_starts_scanning() {
    let (_temp_dir, db) = create_test_db();

    let scan_id = db.create_scan("http://example.test").unwrap();
    let scan = db.get_scan(scan_id).unwrap().unwrap();

    assert_eq!(scan.status, ScanStatus::Scanning);
    assert_eq!(scan.end_time, None);
    assert_eq!(scan.pages_crawled, None);
    assert_eq!(scan.vulnerability_count, 0);
    assert!(scan.scan_date > 0);
}

#[test]
fn test_create_multiple_scans() {
    let (_temp_dir, db) = create_test_db();

    let first = db.create_scan("http://one.test").unwrap();
    let second = db.create_scan("http://two.test").unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_complete_scan() {
    let (_temp_dir, db) = create_test_db();

    let scan_id = db.create_scan("http://example.test").unwrap();
    db.complete_scan(scan_id, 12).unwrap();

    let scan = db.get_scan(scan_id).unwrap().unwrap();
    assert_eq!(scan.status, ScanStatus::Completed);
    assert_eq!(scan.pages_crawled, Some(12));
    assert!(scan.end_time.unwrap() >= scan.scan_date);
}

#[test]
fn test_fail_scan() {
    let (_temp_dir, db) = create_test_db();

    let scan_id = db.create_scan("http://example.test").unwrap();
    db.fail_scan(scan_id).unwrap();

    let scan = db.get_scan(scan_id).unwrap().unwrap();
    assert_eq!(scan.status, ScanStatus::Failed);
    assert!(scan.end_time.is_some());
    assert_eq!(scan.pages_crawled, None);
}

#[test]
fn test_get_missing_scan() {
    let (_temp_dir, db) = create_test_db();
    assert!(db.get_scan(42).unwrap().is_none());
}

#[test]
fn test_list_scans_newest_first() {
    let (_temp_dir, db) = create_test_db();

    let first = db.create_scan("http://one.test").unwrap();
    let second = db.create_scan("http://two.test").unwrap();

    let scans = db.list_scans().unwrap();
    assert_eq!(scans.len(), 2);
    assert_eq!(scans[0].id, second);
    assert_eq!(scans[1].id, first);
}

#[test]
fn test_list_scans_empty() {
    let (_temp_dir, db) = create_test_db();
    assert!(db.list_scans().unwrap().is_empty());
}

// ============================================================================
// Vulnerability Tests
// ============================================================================

#[test]
fn test_insert_and_get_vulnerabilities() {
    let (_temp_dir, mut db) = create_test_db();

    let scan_id = db.create_scan("http://example.test").unwrap();
    let inserted = db.insert_findings(scan_id, &sample_findings()).unwrap();
    assert_eq!(inserted, 2);

    let vulns = db.get_vulnerabilities(scan_id).unwrap();
    assert_eq!(vulns.len(), 2);
    assert_eq!(vulns[0].scan_id, scan_id);
    assert_eq!(vulns[0].finding.vuln_type, VulnType::ReflectedXss);
    assert_eq!(vulns[0].finding.payload, "<script>alert('xss')</script>");
    assert_eq!(vulns[1].finding.vuln_type, VulnType::SqlInjection);
    assert_eq!(vulns[1].finding.url, "http://example.test/item?id=1'");
}

#[test]
fn test_insert_no_findings() {
    let (_temp_dir, mut db) = create_test_db();

    let scan_id = db.create_scan("http://example.test").unwrap();
    assert_eq!(db.insert_findings(scan_id, &[]).unwrap(), 0);
    assert!(db.get_vulnerabilities(scan_id).unwrap().is_empty());
}

#[test]
fn test_insert_findings_for_missing_scan_rolls_back() {
    let (_temp_dir, mut db) = create_test_db();

    let result = db.insert_findings(99, &sample_findings());
    assert!(result.is_err());
    assert!(db.get_vulnerabilities(99).unwrap().is_empty());
}

#[test]
fn test_vulnerability_count_on_scan() {
    let (_temp_dir, mut db) = create_test_db();

    let scan_id = db.create_scan("http://example.test").unwrap();
    db.insert_findings(scan_id, &sample_findings()).unwrap();

    let scan = db.get_scan(scan_id).unwrap().unwrap();
    assert_eq!(scan.vulnerability_count, 2);
}

#[test]
fn test_vulnerabilities_scoped_to_scan() {
    let (_temp_dir, mut db) = create_test_db();

    let first = db.create_scan("http://one.test").unwrap();
    let second = db.create_scan("http://two.test").unwrap();
    db.insert_findings(first, &sample_findings()).unwrap();

    assert_eq!(db.get_vulnerabilities(first).unwrap().len(), 2);
    assert!(db.get_vulnerabilities(second).unwrap().is_empty());
}

// ============================================================================
// Deletion Tests
// ============================================================================

#[test]
fn test_delete_scan_cascades() {
    let (_temp_dir, mut db) = create_test_db();

    let scan_id = db.create_scan("http://example.test").unwrap();
    db.insert_findings(scan_id, &sample_findings()).unwrap();

    assert!(db.delete_scan(scan_id).unwrap());
    assert!(db.get_scan(scan_id).unwrap().is_none());
    assert!(db.get_vulnerabilities(scan_id).unwrap().is_empty());
}

#[test]
fn test_delete_missing_scan() {
    let (_temp_dir, db) = create_test_db();
    assert!(!db.delete_scan(7).unwrap());
}
