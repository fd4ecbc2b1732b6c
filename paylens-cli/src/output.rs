use anyhow::{Context, Result};
use paylens_core::Transaction;
use serde::Serialize;
use std::path::Path;

/// JSON envelope produced by a scan: record count, the records, and the
/// raw OCR text when requested.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub count: usize,
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

/// Pretty-print the report to stdout, or write it to `out`. serde_json
/// leaves emoji and other non-ASCII text unescaped.
pub fn emit_report(report: &ScanReport, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    match out {
        Some(p) => {
            std::fs::write(p, json).with_context(|| format!("write {}", p.display()))?;
            println!("Saved transaction data to {}", p.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
