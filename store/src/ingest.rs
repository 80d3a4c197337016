//! Best-effort SQL script ingestion.
//!
//! Converted inventory workbooks arrive as one multi-statement SQL
//! script. Workbooks routinely omit optional sheets, so their INSERT
//! statements fail; ingestion runs every statement independently and
//! records each failure in an [`IngestReport`] instead of aborting or
//! suppressing it. Only failures touching the primary VM table make
//! the report count as failed. This tolerance is confined to
//! ingestion; queries never paper over errors.

use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::schema;

/// Statements are split on these leading keywords, matched lazily up
/// to the terminating semicolon.
const STATEMENT_PATTERN: &str = r"(?s)(CREATE|INSERT|UPDATE|DROP|WITH|ATTACH|DETACH).*?;";

/// Captures the table a statement's leading clause targets.
const TARGET_PATTERN: &str =
    r#"(?i)^(?:CREATE\s+TABLE(?:\s+IF\s+NOT\s+EXISTS)?|INSERT\s+INTO|UPDATE|DROP\s+TABLE(?:\s+IF\s+EXISTS)?)\s+"?([A-Za-z_][A-Za-z0-9_]*)"#;

/// One failed statement.
#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    /// First 80 characters of the statement, for the report.
    pub statement: String,
    pub error: String,
    /// True when the statement only touches optional source tables.
    pub optional: bool,
}

/// Outcome of running a script: how many statements ran and which
/// failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub executed: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    /// Failed iff a statement touching the primary VM table failed.
    /// Optional-table failures leave the report successful.
    pub fn is_success(&self) -> bool {
        self.failures.iter().all(|failure| failure.optional)
    }
}

fn statement_head(statement: &str) -> String {
    let trimmed = statement.trim();
    let head: String = trimmed.chars().take(80).collect();
    if head.len() < trimmed.len() {
        format!("{head}...")
    } else {
        head
    }
}

/// True when the statement's target table is the primary VM table.
/// Mentions elsewhere in the statement (string values, other table
/// names containing `vinfo`) do not count.
fn touches_required_table(pattern: &Regex, statement: &str) -> bool {
    pattern
        .captures(statement)
        .and_then(|caps| caps.get(1))
        .is_some_and(|table| table.as_str().eq_ignore_ascii_case(schema::VINFO))
}

/// Splits a script into statements the same way the workbook converter
/// emits them. Text outside recognized statements is ignored.
pub fn split_statements(script: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(STATEMENT_PATTERN)?;
    Ok(pattern
        .find_iter(script)
        .map(|found| found.as_str().trim().to_string())
        .collect())
}

/// Runs every statement of the script, collecting failures per
/// statement.
pub fn run_script(conn: &Connection, script: &str) -> Result<IngestReport> {
    let mut report = IngestReport::default();
    let target_pattern = Regex::new(TARGET_PATTERN)?;

    for statement in split_statements(script)? {
        match conn.execute_batch(&statement) {
            Ok(()) => report.executed += 1,
            Err(err) => {
                let optional = !touches_required_table(&target_pattern, &statement);
                warn!(
                    statement = %statement_head(&statement),
                    error = %err,
                    optional,
                    "ingest statement failed"
                );
                report.failures.push(IngestFailure {
                    statement: statement_head(&statement),
                    error: err.to_string(),
                    optional,
                });
            }
        }
    }

    debug!(
        executed = report.executed,
        failures = report.failures.len(),
        "ingest script finished"
    );
    Ok(report)
}
