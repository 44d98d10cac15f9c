use quorra_scanner::{Finding, VulnType};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub struct Database {
    conn: Connection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Scanning,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Scanning => "scanning",
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scanning" => Some(ScanStatus::Scanning),
            "completed" => Some(ScanStatus::Completed),
            "failed" => Some(ScanStatus::Failed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanStatus::Scanning => "Scanning...",
            ScanStatus::Completed => "Completed",
            ScanStatus::Failed => "Failed",
        }
    }
}

impl ToSql for ScanStatus {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for ScanStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        ScanStatus::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown scan status '{}'", text).into()))
    }
}

/// One row of `scans`, with the number of vulnerabilities recorded for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: i64,
    pub target_url: String,
    pub scan_date: i64,
    pub end_time: Option<i64>,
    pub status: ScanStatus,
    pub pages_crawled: Option<i64>,
    pub vulnerability_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    pub id: i64,
    pub scan_id: i64,
    #[serde(flatten)]
    pub finding: Finding,
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

fn vuln_type_column(row: &Row<'_>, idx: usize) -> Result<VulnType> {
    let label: String = row.get(idx)?;
    VulnType::from_label(&label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown vulnerability type '{}'", label).into(),
        )
    })
}

const SCAN_COLUMNS: &str = "s.id, s.target_url, s.scan_date, s.end_time, s.status, s.pages_crawled,
     (SELECT COUNT(*) FROM vulnerabilities v WHERE v.scan_id = s.id)";

fn scan_from_row(row: &Row<'_>) -> Result<ScanRecord> {
    Ok(ScanRecord {
        id: row.get(0)?,
        target_url: row.get(1)?,
        scan_date: row.get(2)?,
        end_time: row.get(3)?,
        status: row.get(4)?,
        pages_crawled: row.get(5)?,
        vulnerability_count: row.get(6)?,
    })
}

impl Database {
    pub fn drop(path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
CREATE TABLE IF NOT EXISTS scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    target_url TEXT NOT NULL,
    scan_date INTEGER NOT NULL,
    end_time INTEGER,
    status TEXT NOT NULL DEFAULT 'scanning' CHECK(status IN ('scanning', 'completed', 'failed')),
    pages_crawled INTEGER
);

CREATE INDEX IF NOT EXISTS idx_scans_date ON scans(scan_date);

CREATE TABLE IF NOT EXISTS vulnerabilities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scan_id INTEGER NOT NULL,
    url TEXT NOT NULL,
    vuln_type TEXT NOT NULL CHECK(vuln_type IN (
        'Reflected XSS',
        'SQL Injection',
        'Local File Inclusion'
    )),
    payload TEXT NOT NULL,

    FOREIGN KEY(scan_id) REFERENCES scans(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_vulnerabilities_scan ON vulnerabilities(scan_id);
CREATE INDEX IF NOT EXISTS idx_vulnerabilities_type ON vulnerabilities(vuln_type);
            ",
        )?;
        Ok(())
    }

    // Scan lifecycle
    pub fn create_scan(&self, target_url: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO scans (target_url, scan_date, status) VALUES (?1, ?2, ?3)",
            params![target_url, current_timestamp(), ScanStatus::Scanning],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn complete_scan(&self, scan_id: i64, pages_crawled: usize) -> Result<()> {
        self.conn.execute(
            "UPDATE scans SET status = ?1, end_time = ?2, pages_crawled = ?3 WHERE id = ?4",
            params![
                ScanStatus::Completed,
                current_timestamp(),
                pages_crawled as i64,
                scan_id
            ],
        )?;
        Ok(())
    }

    pub fn fail_scan(&self, scan_id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE scans SET status = ?1, end_time = ?2 WHERE id = ?3",
            params![ScanStatus::Failed, current_timestamp(), scan_id],
        )?;
        Ok(())
    }

    pub fn delete_scan(&self, scan_id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM scans WHERE id = ?1", params![scan_id])?;
        Ok(deleted > 0)
    }

    // Findings
    pub fn insert_findings(&mut self, scan_id: i64, findings: &[Finding]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO vulnerabilities (scan_id, url, vuln_type, payload) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for finding in findings {
                stmt.execute(params![
                    scan_id,
                    &finding.url,
                    finding.vuln_type.as_str(),
                    &finding.payload
                ])?;
            }
        }
        tx.commit()?;

        Ok(findings.len())
    }

    // Query methods
    pub fn get_scan(&self, scan_id: i64) -> Result<Option<ScanRecord>> {
        let sql = format!("SELECT {} FROM scans s WHERE s.id = ?1", SCAN_COLUMNS);
        self.conn
            .query_row(&sql, params![scan_id], scan_from_row)
            .optional()
    }

    /// Newest first.
    pub fn list_scans(&self) -> Result<Vec<ScanRecord>> {
        let sql = format!(
            "SELECT {} FROM scans s ORDER BY s.scan_date DESC, s.id DESC",
            SCAN_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let scans = stmt
            .query_map([], scan_from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(scans)
    }

    pub fn get_vulnerabilities(&self, scan_id: i64) -> Result<Vec<VulnerabilityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scan_id, url, vuln_type, payload FROM vulnerabilities
             WHERE scan_id = ?1 ORDER BY id",
        )?;

        let vulnerabilities = stmt
            .query_map(params![scan_id], |row| {
                Ok(VulnerabilityRecord {
                    id: row.get(0)?,
                    scan_id: row.get(1)?,
                    finding: Finding {
                        url: row.get(2)?,
                        vuln_type: vuln_type_column(row, 3)?,
                        payload: row.get(4)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(vulnerabilities)
    }
}
