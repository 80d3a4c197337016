//! Cluster-grouped inventory snapshot.
//!
//! [`Inventory`] is the full typed snapshot returned by the query
//! service: per-cluster infrastructure and VMs plus vCenter-level data.
//! Grouping is done by an explicit [`InventoryBuilder`] fold — rows with
//! an empty or whitespace-only cluster name are excluded from
//! cluster-scoped data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Datastore, Host, Network, OsSummary, Vm};

/// The complete inventory grouped by cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Unique identifier of the vCenter the export came from.
    pub vcenter_id: String,
    /// Cluster name → per-cluster data, in stable name order.
    pub clusters: BTreeMap<String, ClusterInventory>,
    /// vCenter-level OS distribution summary.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub os_summary: Vec<OsSummary>,
}

/// Per-cluster inventory: infrastructure plus virtual machines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterInventory {
    pub infra: Infra,
    pub vms: Vec<Vm>,
}

/// Infrastructure records of a single cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Infra {
    pub hosts: Vec<Host>,
    pub datastores: Vec<Datastore>,
    pub networks: Vec<Network>,
    pub total_hosts: usize,
}

/// Accumulates entity rows into a cluster-keyed [`Inventory`].
///
/// Each `push_*` method consumes and returns the builder so grouping
/// reads as a fold over the row streams; entries for a cluster are
/// created on first sight and rows keep their query order within the
/// cluster.
///
/// # Examples
///
/// ```
/// use vm_inventory_core::{Host, InventoryBuilder};
///
/// let host = Host { cluster: "Prod".into(), ..Host::default() };
/// let inventory = InventoryBuilder::new("vcenter-1")
///     .push_hosts(vec![host])
///     .build();
/// assert_eq!(inventory.clusters["Prod"].infra.total_hosts, 1);
/// ```
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    vcenter_id: String,
    clusters: BTreeMap<String, ClusterInventory>,
    os_summary: Vec<OsSummary>,
}

impl InventoryBuilder {
    pub fn new(vcenter_id: impl Into<String>) -> Self {
        Self {
            vcenter_id: vcenter_id.into(),
            ..Self::default()
        }
    }

    pub fn push_hosts(self, hosts: impl IntoIterator<Item = Host>) -> Self {
        hosts.into_iter().fold(self, |mut acc, host| {
            if let Some(entry) = acc.entry_for(&host.cluster) {
                entry.infra.hosts.push(host);
                entry.infra.total_hosts += 1;
            }
            acc
        })
    }

    pub fn push_datastores(self, datastores: impl IntoIterator<Item = Datastore>) -> Self {
        datastores.into_iter().fold(self, |mut acc, ds| {
            if let Some(entry) = acc.entry_for(&ds.cluster) {
                entry.infra.datastores.push(ds);
            }
            acc
        })
    }

    pub fn push_networks(self, networks: impl IntoIterator<Item = Network>) -> Self {
        networks.into_iter().fold(self, |mut acc, network| {
            if let Some(entry) = acc.entry_for(&network.cluster) {
                entry.infra.networks.push(network);
            }
            acc
        })
    }

    pub fn push_vms(self, vms: impl IntoIterator<Item = Vm>) -> Self {
        vms.into_iter().fold(self, |mut acc, vm| {
            if let Some(entry) = acc.entry_for(&vm.cluster) {
                entry.vms.push(vm);
            }
            acc
        })
    }

    pub fn os_summary(mut self, summary: Vec<OsSummary>) -> Self {
        self.os_summary = summary;
        self
    }

    pub fn build(self) -> Inventory {
        Inventory {
            vcenter_id: self.vcenter_id,
            clusters: self.clusters,
            os_summary: self.os_summary,
        }
    }

    /// Returns the cluster entry for a row, or `None` when the row has
    /// no usable cluster name.
    fn entry_for(&mut self, cluster: &str) -> Option<&mut ClusterInventory> {
        let name = cluster.trim();
        if name.is_empty() {
            return None;
        }
        Some(self.clusters.entry(name.to_string()).or_default())
    }
}
