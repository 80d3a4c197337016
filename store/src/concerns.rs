//! Concern persistence.
//!
//! Concerns are produced by an external assessment pass and written
//! back into the store so classification queries can join on them. The
//! writer is the only mutation the store accepts after ingestion.

use rusqlite::Connection;
use tracing::debug;
use vm_inventory_core::Concern;

use crate::error::{Result, StoreError};
use crate::schema;

/// A batch of (VM id, concern) pairs to persist in one transaction.
///
/// # Examples
///
/// ```no_run
/// use vm_inventory_core::Concern;
/// use vm_inventory_store::ConcernBatch;
///
/// let batch = ConcernBatch::new()
///     .append("vm-1", Concern {
///         id: "cpu.count".into(),
///         label: "Too many CPUs".into(),
///         category: Concern::WARNING.into(),
///         assessment: "Reduce vCPU count before migration".into(),
///     });
/// assert_eq!(batch.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcernBatch {
    rows: Vec<(String, Concern)>,
}

impl ConcernBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(mut self, vm_id: impl Into<String>, concern: Concern) -> Self {
        self.rows.push((vm_id.into(), concern));
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Writes the batch inside a single transaction with bound parameters.
/// The concerns table is created on first use. An empty batch is
/// rejected rather than silently committing nothing.
pub fn write(conn: &mut Connection, batch: &ConcernBatch) -> Result<usize> {
    if batch.is_empty() {
        return Err(StoreError::EmptyConcernBatch);
    }

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         \"VM_ID\" TEXT, \"Concern_ID\" TEXT, \"Label\" TEXT, \
         \"Category\" TEXT, \"Assessment\" TEXT);",
        schema::CONCERNS
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} (\"VM_ID\", \"Concern_ID\", \"Label\", \"Category\", \"Assessment\") \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            schema::CONCERNS
        ))?;
        for (vm_id, concern) in &batch.rows {
            stmt.execute((
                vm_id,
                &concern.id,
                &concern.label,
                &concern.category,
                &concern.assessment,
            ))?;
        }
    }

    tx.commit()?;
    debug!(rows = batch.len(), "wrote concern batch");
    Ok(batch.len())
}
