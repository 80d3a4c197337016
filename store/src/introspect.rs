//! Catalog introspection.
//!
//! Reads which tables and columns actually exist after ingestion, so the
//! query planner can pick between rich and degraded query variants. A
//! store with zero tables yields an empty catalog, never an error. The
//! catalog is only consulted for variant selection — business logic never
//! branches on it directly.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::Connection;

use crate::error::Result;
use crate::schema;

/// Snapshot of the store's tables and their columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tables: BTreeMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Reads the catalog from the connection.
    pub fn read(conn: &Connection) -> Result<Self> {
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;

        let mut tables = BTreeMap::new();
        for name in names {
            let mut column_stmt =
                conn.prepare(&format!("PRAGMA table_info(\"{}\")", name.replace('"', "\"\"")))?;
            let columns: BTreeSet<String> = column_stmt
                .query_map([], |row| row.get::<_, String>(1))?
                .collect::<rusqlite::Result<_>>()?;
            tables.insert(name, columns);
        }

        Ok(Self { tables })
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    /// Column names of a table, empty for an unknown table.
    pub fn columns(&self, table: &str) -> impl Iterator<Item = &str> {
        self.tables
            .get(table)
            .into_iter()
            .flat_map(|columns| columns.iter().map(String::as_str))
    }

    /// The `Network #N` columns present on the VM table, in ascending
    /// numeric order. Used to build the legacy flat network-name list.
    pub fn vinfo_network_columns(&self) -> Vec<String> {
        let mut numbered: Vec<(u32, String)> = self
            .columns(schema::VINFO)
            .filter_map(|column| {
                let suffix = column.strip_prefix("Network #")?;
                let n: u32 = suffix.parse().ok()?;
                Some((n, column.to_string()))
            })
            .collect();
        numbered.sort_by_key(|(n, _)| *n);
        numbered.into_iter().map(|(_, column)| column).collect()
    }
}
