//! Core types and migratability classification for virtualization
//! inventory data.
//!
//! This crate defines the domain model shared by the storage backend and
//! the CLI:
//!
//! - [`Vm`], [`Host`], [`Datastore`], [`Network`], [`OsSummary`] — typed
//!   inventory records with nested disk/NIC/concern collections.
//! - [`Filters`] / [`QueryOptions`] — AND-combined optional predicates
//!   and stable pagination.
//! - [`MigratabilityClass`] and the aggregate types
//!   ([`MigratabilityCounts`], [`ResourceBreakdowns`], [`TotalResources`],
//!   [`MigrationIssue`]) — concern-driven migration-readiness
//!   classification.
//! - [`ValidationResult`] — the verdict of the store's schema validation
//!   battery.
//! - [`Inventory`] / [`InventoryBuilder`] — cluster-grouped snapshots.
//!
//! # Example
//!
//! ```
//! use vm_inventory_core::{Concern, Filters, MigratabilityClass, Vm};
//!
//! let vm = Vm {
//!     id: "vm-001".into(),
//!     cluster: "Prod".into(),
//!     concerns: vec![Concern {
//!         id: "cbt-disabled".into(),
//!         label: "Changed Block Tracking is disabled".into(),
//!         category: "Warning".into(),
//!         assessment: "CBT should be enabled for efficient migration.".into(),
//!     }],
//!     ..Vm::default()
//! };
//!
//! assert_eq!(
//!     MigratabilityClass::from_concerns(&vm.concerns),
//!     MigratabilityClass::MigratableWithWarnings,
//! );
//! let filters = Filters::default().with_cluster("Prod");
//! assert!(!filters.is_empty());
//! ```

mod filter;
mod inventory;
mod migratability;
mod types;
mod validation;

pub use filter::{Filters, QueryOptions};
pub use inventory::{ClusterInventory, Infra, Inventory, InventoryBuilder};
pub use migratability::{
    MigratabilityClass, MigratabilityCounts, MigrationIssue, ResourceBreakdown,
    ResourceBreakdowns, TotalResources, VmResources,
};
pub use types::{Concern, Datastore, Disk, Host, NOT_AVAILABLE, Network, Nic, OsSummary, Vm};
pub use validation::{InvalidSchema, ValidationIssue, ValidationResult, codes};
