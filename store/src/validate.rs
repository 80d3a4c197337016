//! Schema validation battery.
//!
//! Runs a fixed list of checks against a store and folds the findings
//! into a [`ValidationResult`]. Errors mean downstream queries cannot
//! produce meaningful results (no VM rows, or no row carrying a VM
//! identifier or name);
//! warnings mean a satellite table is absent or empty and the related
//! parts of the inventory will come back degraded or empty. A missing
//! table and an empty table raise the same warning: both mean no data.

use rusqlite::Connection;
use tracing::debug;
use vm_inventory_core::{ValidationIssue, ValidationResult, codes};

use crate::error::Result;
use crate::introspect::Catalog;
use crate::schema;

const VM_ID_COLUMN: &str = "VM ID";
const VM_NAME_COLUMN: &str = "VM";

/// One satellite-table emptiness check: (table, warning code, message).
const EMPTY_CHECKS: &[(&str, &str, &str)] = &[
    (schema::VHOST, codes::EMPTY_HOSTS, "no host records"),
    (
        schema::VDATASTORE,
        codes::EMPTY_DATASTORES,
        "no datastore records",
    ),
    (
        schema::VNETWORK,
        codes::EMPTY_NETWORKS,
        "no network records",
    ),
    (schema::VCPU, codes::EMPTY_CPU, "no CPU detail records"),
    (
        schema::VMEMORY,
        codes::EMPTY_MEMORY,
        "no memory detail records",
    ),
    (schema::VDISK, codes::EMPTY_DISKS, "no disk records"),
    (schema::VNETWORK, codes::EMPTY_NICS, "no NIC records"),
];

fn row_count(conn: &Connection, table: &str) -> Result<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

fn column_populated(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM \"{table}\" WHERE TRIM(COALESCE(\"{column}\", '')) <> ''"
        ),
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Runs every check and returns the combined result. Never fails on
/// empty or missing data; only on storage-level errors.
pub fn validate(conn: &Connection, catalog: &Catalog) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    if !catalog.has_table(schema::VINFO) {
        result
            .errors
            .push(ValidationIssue::new(codes::NO_VMS, "no VM table"));
    } else if row_count(conn, schema::VINFO)? == 0 {
        // The column checks are meaningless against zero rows.
        result
            .errors
            .push(ValidationIssue::new(codes::NO_VMS, "no VM records"));
    } else {
        let id_populated = catalog.has_column(schema::VINFO, VM_ID_COLUMN)
            && column_populated(conn, schema::VINFO, VM_ID_COLUMN)?;
        if !id_populated {
            result.errors.push(ValidationIssue::new(
                codes::MISSING_VM_ID,
                "no VM row carries a VM identifier",
            ));
        }
        let name_populated = catalog.has_column(schema::VINFO, VM_NAME_COLUMN)
            && column_populated(conn, schema::VINFO, VM_NAME_COLUMN)?;
        if !name_populated {
            result.errors.push(ValidationIssue::new(
                codes::MISSING_VM_NAME,
                "no VM row carries a VM name",
            ));
        }
    }

    for &(table, code, message) in EMPTY_CHECKS {
        let empty = !catalog.has_table(table) || row_count(conn, table)? == 0;
        if empty {
            result.warnings.push(ValidationIssue::new(code, message));
        }
    }

    debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "schema validation finished"
    );
    Ok(result)
}
