//! SQLite-backed storage and querying for spreadsheet-ingested
//! virtualization inventories.
//!
//! An inventory workbook is converted into a multi-statement SQL script
//! and ingested into a SQLite database whose tables mirror the workbook
//! sheets (`vinfo`, `vcpu`, `vdisk`, ...). This crate then answers
//! questions about that snapshot:
//!
//! - [`InventoryStore`] is the query facade: entity listings with
//!   filters and pagination, counts, migratability aggregates, and the
//!   cluster-grouped [`Inventory`](vm_inventory_core::Inventory)
//!   snapshot.
//! - [`Catalog`] introspects which tables and columns the ingested
//!   workbook actually produced; query planners in [`query`] pick rich
//!   or degraded plan variants from it, so partial workbooks degrade
//!   gracefully instead of failing.
//! - [`validate`](InventoryStore::validate) reports blocking errors and
//!   degradation warnings before anyone trusts the data.
//! - [`ConcernBatch`] writes externally computed migration concerns
//!   back into the store for the classification queries to join on.
//!
//! Queries are built as [`SelectPlan`] values with bound parameters and
//! decoded by explicit per-column rules in [`decode`]; nothing is
//! interpolated into SQL text and nothing is scanned reflectively.

pub mod concerns;
pub mod decode;
mod error;
pub mod ingest;
pub mod introspect;
pub mod plan;
pub mod query;
pub mod schema;
pub mod service;
pub mod validate;

pub use concerns::ConcernBatch;
pub use error::{Result, StoreError};
pub use ingest::{IngestFailure, IngestReport};
pub use introspect::Catalog;
pub use plan::{FilterColumns, Predicate, SelectPlan, SqlValue};
pub use query::Entity;
pub use service::InventoryStore;
