//! The inventory query service.
//!
//! [`InventoryStore`] wraps a SQLite connection holding an ingested
//! inventory workbook and exposes the read operations: entity listings
//! with filters and pagination, counts, migratability aggregates, and
//! the full cluster-grouped inventory snapshot. The schema catalog is
//! re-read per operation, so queries adapt to whatever tables the
//! ingested workbook actually produced.
//!
//! All reads are pure against the stored snapshot. The only mutations
//! are schema creation, script ingestion, and concern writes.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, Row, params_from_iter};
use tracing::debug;
use vm_inventory_core::{
    Datastore, Filters, Host, Inventory, InventoryBuilder, MigratabilityClass,
    MigratabilityCounts, MigrationIssue, Network, OsSummary, QueryOptions, ResourceBreakdowns,
    TotalResources, ValidationResult, Vm, VmResources,
};

use crate::concerns::{self, ConcernBatch};
use crate::decode;
use crate::error::{Result, StoreError};
use crate::ingest::{self, IngestReport};
use crate::introspect::Catalog;
use crate::plan::SelectPlan;
use crate::query::{self, Entity};
use crate::schema;
use crate::validate;

/// A SQLite-backed inventory store.
///
/// # Examples
///
/// ```no_run
/// use vm_inventory_core::{Filters, QueryOptions};
/// use vm_inventory_store::InventoryStore;
///
/// # fn main() -> vm_inventory_store::Result<()> {
/// let store = InventoryStore::open("inventory.db")?;
/// let filters = Filters::default().with_cluster("Production");
/// for vm in store.vms(&filters, QueryOptions::page(50, 0))? {
///     println!("{} ({})", vm.name, vm.power_state);
/// }
/// # Ok(())
/// # }
/// ```
pub struct InventoryStore {
    conn: Connection,
}

impl InventoryStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Opens a transient in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Creates every source table. Idempotent.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(&schema::create_all_sql())?;
        debug!("created source schema");
        Ok(())
    }

    /// Reads the current catalog of tables and columns.
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::read(&self.conn)
    }

    /// Runs the validation battery against the current contents.
    pub fn validate(&self) -> Result<ValidationResult> {
        let catalog = self.catalog()?;
        validate::validate(&self.conn, &catalog)
    }

    /// Applies a multi-statement ingestion script best-effort.
    pub fn ingest_script(&self, script: &str) -> Result<IngestReport> {
        ingest::run_script(&self.conn, script)
    }

    /// Persists a batch of assessment concerns.
    pub fn write_concerns(&mut self, batch: &ConcernBatch) -> Result<usize> {
        concerns::write(&mut self.conn, batch)
    }

    fn rows<T>(
        &self,
        entity: Entity,
        plan: &SelectPlan,
        decode: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let sql = plan.to_sql();
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(StoreError::query(entity.name()))?;
        let rows = stmt
            .query_map(params_from_iter(plan.params()), |row| decode(row))
            .map_err(StoreError::query(entity.name()))?;
        rows.collect::<rusqlite::Result<Vec<T>>>()
            .map_err(|err| match err {
                rusqlite::Error::FromSqlConversionFailure(index, _, source) => {
                    StoreError::Decode {
                        entity: entity.name(),
                        message: format!("column {index}: {source}"),
                    }
                }
                other => StoreError::query(entity.name())(other),
            })
    }

    fn scalar<T: rusqlite::types::FromSql>(&self, entity: Entity, plan: &SelectPlan) -> Result<T> {
        self.conn
            .query_row(&plan.to_sql(), params_from_iter(plan.params()), |row| {
                row.get(0)
            })
            .map_err(StoreError::query(entity.name()))
    }

    /// Lists VMs matching the filters, one row per VM with nested
    /// collections, ordered by VM id.
    pub fn vms(&self, filters: &Filters, options: QueryOptions) -> Result<Vec<Vm>> {
        let catalog = self.catalog()?;
        let plan = query::vm_plan(&catalog, filters, options);
        self.rows(Entity::Vm, &plan, decode::vm_from_row)
    }

    /// Counts VMs matching the filters.
    pub fn vm_count(&self, filters: &Filters) -> Result<i64> {
        self.scalar(Entity::Vm, &query::vm_count_plan(filters))
    }

    /// Lists hosts (cluster-filtered only), ordered by host id.
    pub fn hosts(&self, filters: &Filters, options: QueryOptions) -> Result<Vec<Host>> {
        let plan = query::host_plan(filters, options);
        self.rows(Entity::Host, &plan, decode::host_from_row)
    }

    /// Lists datastores, ordered by cluster and name.
    pub fn datastores(&self, filters: &Filters, options: QueryOptions) -> Result<Vec<Datastore>> {
        let catalog = self.catalog()?;
        let plan = query::datastore_plan(&catalog, filters, options);
        self.rows(Entity::Datastore, &plan, decode::datastore_from_row)
    }

    /// Lists networks grouped per cluster/switch/network.
    pub fn networks(&self, filters: &Filters, options: QueryOptions) -> Result<Vec<Network>> {
        let catalog = self.catalog()?;
        let plan = query::network_plan(&catalog, filters, options);
        self.rows(Entity::Network, &plan, decode::network_from_row)
    }

    /// The guest-OS distribution for VMs matching the filters.
    pub fn os_summary(&self, filters: &Filters) -> Result<Vec<OsSummary>> {
        let plan = query::os_plan(filters);
        self.rows(Entity::OsSummary, &plan, decode::os_from_row)
    }

    /// The distinct non-empty cluster names, sorted.
    pub fn clusters(&self) -> Result<Vec<String>> {
        let plan = query::clusters_plan();
        self.rows(Entity::Vm, &plan, |row| row.get(0))
    }

    /// Resolves the vCenter identity recorded in the VM table.
    pub fn vcenter_id(&self) -> Result<String> {
        let catalog = self.catalog()?;
        if !catalog.has_table(schema::VINFO) {
            return Err(StoreError::MissingVCenterId);
        }
        let ids: Vec<String> = self.rows(Entity::VCenter, &query::vcenter_plan(), |row| row.get(0))?;
        ids.into_iter().next().ok_or(StoreError::MissingVCenterId)
    }

    /// VM counts per power-state value.
    pub fn power_state_counts(&self, filters: &Filters) -> Result<BTreeMap<String, i64>> {
        let plan = query::power_state_plan(filters);
        let pairs: Vec<(String, i64)> = self.rows(Entity::Vm, &plan, |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;
        Ok(pairs.into_iter().collect())
    }

    fn classifications(&self, filters: &Filters) -> Result<Vec<MigratabilityClass>> {
        let catalog = self.catalog()?;
        let plan = query::classification_plan(&catalog, filters);
        self.rows(Entity::Vm, &plan, |row| {
            let has_warning: bool = row.get(1)?;
            let has_critical: bool = row.get(2)?;
            Ok(MigratabilityClass::from_flags(has_warning, has_critical))
        })
    }

    /// All four migratability tallies in one pass.
    pub fn migratability_counts(&self, filters: &Filters) -> Result<MigratabilityCounts> {
        let classes = self.classifications(filters)?;
        Ok(MigratabilityCounts::from_classes(classes))
    }

    /// VMs with no blocking concern (clean and with-warnings alike).
    pub fn migratable_vm_count(&self, filters: &Filters) -> Result<u64> {
        Ok(self.migratability_counts(filters)?.migratable)
    }

    /// VMs migratable but carrying at least one warning.
    pub fn migratable_with_warnings_vm_count(&self, filters: &Filters) -> Result<u64> {
        Ok(self
            .migratability_counts(filters)?
            .migratable_with_warnings)
    }

    /// VMs with at least one blocking concern.
    pub fn not_migratable_vm_count(&self, filters: &Filters) -> Result<u64> {
        Ok(self.migratability_counts(filters)?.not_migratable)
    }

    /// Migration issues grouped by label and category, counting the
    /// distinct VMs exhibiting each. `category` narrows to one
    /// category; without a concerns table this is empty, not an error.
    pub fn migration_issues(
        &self,
        filters: &Filters,
        category: Option<&str>,
    ) -> Result<Vec<MigrationIssue>> {
        let catalog = self.catalog()?;
        let Some(plan) = query::migration_issues_plan(&catalog, filters, category) else {
            return Ok(Vec::new());
        };
        self.rows(Entity::Vm, &plan, |row| {
            Ok(MigrationIssue {
                label: row.get(0)?,
                category: row.get(1)?,
                count: row.get(2)?,
            })
        })
    }

    fn resource_samples(
        &self,
        filters: &Filters,
    ) -> Result<Vec<(VmResources, MigratabilityClass)>> {
        let catalog = self.catalog()?;
        let plan = query::resource_plan(&catalog, filters);
        self.rows(Entity::Vm, &plan, |row| {
            let resources = VmResources {
                cpu_cores: row.get(0)?,
                ram_gb: row.get(1)?,
                disk_count: row.get(2)?,
                disk_gb: row.get(3)?,
                nic_count: row.get(4)?,
            };
            let has_warning: bool = row.get(5)?;
            let has_critical: bool = row.get(6)?;
            Ok((
                resources,
                MigratabilityClass::from_flags(has_warning, has_critical),
            ))
        })
    }

    /// Per-resource totals split by migratability class.
    pub fn resource_breakdowns(&self, filters: &Filters) -> Result<ResourceBreakdowns> {
        let samples = self.resource_samples(filters)?;
        Ok(ResourceBreakdowns::from_samples(samples))
    }

    /// Plain per-resource totals over the matching VMs.
    pub fn total_resources(&self, filters: &Filters) -> Result<TotalResources> {
        let samples = self.resource_samples(filters)?;
        Ok(TotalResources::from_samples(
            samples.into_iter().map(|(resources, _)| resources),
        ))
    }

    /// The full cluster-grouped inventory snapshot: every entity,
    /// unfiltered and unpaginated, grouped by cluster name, plus the
    /// OS distribution. Rows without a cluster are excluded.
    pub fn inventory(&self) -> Result<Inventory> {
        let everything = Filters::default();
        let all = QueryOptions::default();
        let vcenter_id = self.vcenter_id()?;

        let inventory = InventoryBuilder::new(vcenter_id)
            .push_hosts(self.hosts(&everything, all)?)
            .push_datastores(self.datastores(&everything, all)?)
            .push_networks(self.networks(&everything, all)?)
            .push_vms(self.vms(&everything, all)?)
            .os_summary(self.os_summary(&everything)?)
            .build();
        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcenter_id_requires_a_vm_table() {
        let store = InventoryStore::open_in_memory().unwrap();
        assert!(matches!(
            store.vcenter_id(),
            Err(StoreError::MissingVCenterId)
        ));
    }

    #[test]
    fn fresh_schema_answers_every_read_with_empty_results() {
        let store = InventoryStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        let filters = Filters::default();
        let options = QueryOptions::default();

        assert!(store.vms(&filters, options).unwrap().is_empty());
        assert_eq!(store.vm_count(&filters).unwrap(), 0);
        assert!(store.hosts(&filters, options).unwrap().is_empty());
        assert!(store.datastores(&filters, options).unwrap().is_empty());
        assert!(store.networks(&filters, options).unwrap().is_empty());
        assert!(store.os_summary(&filters).unwrap().is_empty());
        assert!(store.clusters().unwrap().is_empty());
        assert!(store.power_state_counts(&filters).unwrap().is_empty());
        assert!(store.migration_issues(&filters, None).unwrap().is_empty());
        assert_eq!(store.migratable_vm_count(&filters).unwrap(), 0);
    }

    #[test]
    fn migration_issues_without_concerns_table_is_empty() {
        let store = InventoryStore::open_in_memory().unwrap();
        store
            .ingest_script("CREATE TABLE vinfo (\"VM ID\" TEXT, \"VM\" TEXT);")
            .unwrap();
        assert!(
            store
                .migration_issues(&Filters::default(), None)
                .unwrap()
                .is_empty()
        );
    }
}
