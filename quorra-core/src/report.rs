// Report generation for stored and in-memory scans

use crate::data::{Database, ScanRecord, ScanStatus};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use quorra_scanner::{Finding, ScanReport, VulnType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Timestamps are shown in India Standard Time (UTC+05:30) unless the caller
/// asks for another offset.
pub const DEFAULT_DISPLAY_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

const VULN_TYPES: [VulnType; 3] = [
    VulnType::ReflectedXss,
    VulnType::SqlInjection,
    VulnType::LocalFileInclusion,
];

pub const CSV_HEADER: [&str; 3] = ["Vulnerability Type", "Vulnerable URL", "Payload"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<i64>,
    pub target_url: String,
    pub scan_date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_crawled: Option<i64>,
    pub vulnerabilities: Vec<Finding>,
}

impl ReportData {
    pub fn from_record(scan: ScanRecord, vulnerabilities: Vec<Finding>) -> Self {
        Self {
            scan_id: Some(scan.id),
            target_url: scan.target_url,
            scan_date: scan.scan_date,
            end_time: scan.end_time,
            status: scan.status,
            pages_crawled: scan.pages_crawled,
            vulnerabilities,
        }
    }

    /// Report for a scan that was never stored.
    pub fn from_scan_report(report: &ScanReport, scan_date: i64) -> Self {
        Self {
            scan_id: None,
            target_url: report.seed.clone(),
            scan_date,
            end_time: None,
            status: ScanStatus::Completed,
            pages_crawled: Some(report.urls.len() as i64),
            vulnerabilities: report.findings.clone(),
        }
    }

    pub fn count_by_type(&self, vuln_type: VulnType) -> usize {
        self.vulnerabilities
            .iter()
            .filter(|f| f.vuln_type == vuln_type)
            .count()
    }
}

/// `None` when no scan has that id.
pub fn gather_report_data(db: &Database, scan_id: i64) -> rusqlite::Result<Option<ReportData>> {
    let Some(scan) = db.get_scan(scan_id)? else {
        return Ok(None);
    };

    let vulnerabilities = db
        .get_vulnerabilities(scan_id)?
        .into_iter()
        .map(|record| record.finding)
        .collect();

    Ok(Some(ReportData::from_record(scan, vulnerabilities)))
}

pub fn generate_report(
    data: &ReportData,
    format: ReportFormat,
    offset: FixedOffset,
) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data, offset)),
        ReportFormat::Json => generate_json_report(data)
            .map_err(|e| format!("Failed to serialize report: {}", e)),
        ReportFormat::Csv => Ok(generate_csv_report(&data.vulnerabilities)),
    }
}

pub fn generate_csv_report(vulnerabilities: &[Finding]) -> String {
    let mut csv = String::new();
    push_csv_row(&mut csv, &CSV_HEADER);

    for finding in vulnerabilities {
        push_csv_row(
            &mut csv,
            &[finding.vuln_type.as_str(), &finding.url, &finding.payload],
        );
    }

    csv
}

fn push_csv_row(csv: &mut String, fields: &[&str]) {
    let row: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f)).collect();
    csv.push_str(&row.join(","));
    csv.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Quorra",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": Utc::now().to_rfc3339(),
                "disclaimer": "For authorized security testing only"
            },
            "scan": {
                "id": data.scan_id,
                "target_url": data.target_url,
                "status": data.status.as_str(),
                "scan_date": format_iso8601_timestamp(data.scan_date),
                "end_time": data.end_time.map(format_iso8601_timestamp),
                "pages_crawled": data.pages_crawled
            },
            "summary": {
                "total": data.vulnerabilities.len(),
                "reflected_xss": data.count_by_type(VulnType::ReflectedXss),
                "sql_injection": data.count_by_type(VulnType::SqlInjection),
                "local_file_inclusion": data.count_by_type(VulnType::LocalFileInclusion)
            },
            "vulnerabilities": data.vulnerabilities.iter().map(|f| {
                serde_json::json!({
                    "vuln_type": f.vuln_type.as_str(),
                    "url": f.url,
                    "payload": f.payload
                })
            }).collect::<Vec<_>>()
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_text_report(data: &ReportData, offset: FixedOffset) -> String {
    let rule = "━".repeat(80);
    let mut report = String::new();

    report.push_str(&format!("{}\n", rule));
    report.push_str("                        QUORRA VULNERABILITY SCAN REPORT\n");
    report.push_str(&format!("{}\n\n", rule));

    if let Some(scan_id) = data.scan_id {
        report.push_str(&format!("Scan ID:      {}\n", scan_id));
    }
    report.push_str(&format!("Target:       {}\n", data.target_url));
    report.push_str(&format!("Status:       {}\n", data.status.label()));
    report.push_str(&format!(
        "Scan Date:    {}\n",
        format_timestamp(data.scan_date, offset)
    ));
    if let Some(end_time) = data.end_time {
        report.push_str(&format!(
            "Duration:     {} seconds\n",
            end_time - data.scan_date
        ));
    }
    if let Some(pages) = data.pages_crawled {
        report.push_str(&format!("Pages Found:  {}\n", pages));
    }
    report.push('\n');

    report.push_str(&format!("{}\n", rule));
    report.push_str("SUMMARY\n");
    report.push_str(&format!("{}\n\n", rule));

    if data.vulnerabilities.is_empty() {
        report.push_str("No vulnerabilities found.\n\n");
    } else {
        report.push_str(&format!(
            "Total Vulnerabilities: {}\n\n",
            data.vulnerabilities.len()
        ));
        for vuln_type in VULN_TYPES {
            let count = data.count_by_type(vuln_type);
            if count > 0 {
                report.push_str(&format!("  {:<22} {}\n", vuln_type.as_str(), count));
            }
        }
        report.push('\n');

        report.push_str(&format!("{}\n", rule));
        report.push_str("DETAILED FINDINGS\n");
        report.push_str(&format!("{}\n\n", rule));

        let mut idx = 0;
        for vuln_type in VULN_TYPES {
            let findings: Vec<&Finding> = data
                .vulnerabilities
                .iter()
                .filter(|f| f.vuln_type == vuln_type)
                .collect();
            if findings.is_empty() {
                continue;
            }

            report.push_str(&format!(
                "{} ({})\n\n",
                vuln_type.as_str().to_uppercase(),
                findings.len()
            ));
            for finding in findings {
                idx += 1;
                report.push_str(&format!("[{}] {}\n", idx, finding.vuln_type));
                report.push_str(&format!("URL:          {}\n", finding.url));
                report.push_str(&format!("Payload:      {}\n", finding.payload));
                report.push_str(&format!("{}\n\n", "─".repeat(80)));
            }
        }
    }

    report.push_str("Generated by Quorra - a crawling web vulnerability scanner\n");
    report.push_str("For authorized security testing only.\n");

    report
}

/// Default export file name, e.g. `scan_results_7.csv`.
pub fn default_file_name(scan_id: i64, format: ReportFormat) -> String {
    format!("scan_results_{}.{}", scan_id, format.extension())
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn display_offset(offset_secs: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix())
}

/// `2024-05-01 03:15 PM` in the given offset.
pub fn format_timestamp(timestamp: i64, offset: FixedOffset) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%d %I:%M %p").to_string())
        .unwrap_or_default()
}

fn format_iso8601_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
