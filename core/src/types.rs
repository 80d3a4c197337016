//! Inventory record types.
//!
//! This module defines the typed results produced by the query service:
//! virtual machines with their nested disk/NIC/concern collections,
//! per-cluster infrastructure records (hosts, datastores, networks), and
//! the OS distribution summary. The types are designed for serialization
//! with [`serde`] and map one-to-one onto query projections — a VM is
//! always a single row with its collections materialized as nested lists.

use serde::{Deserialize, Serialize};

/// Sentinel used where a string field could not be resolved from the
/// source data (e.g. datastore host ids when the hosts table is absent).
pub const NOT_AVAILABLE: &str = "N/A";

/// A virtual machine with placement, hardware, storage, and network
/// profiles plus any migration concerns attached by an external validator.
///
/// Every VM carries its disks, NICs, and concerns as nested collections;
/// a VM with no rows in a satellite table gets an empty collection, never
/// a missing one. `cluster` is authoritative for grouping — VMs with an
/// empty cluster are excluded from cluster-scoped aggregates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vm {
    pub id: String,
    pub name: String,
    pub folder: String,
    pub host: String,
    pub uuid: String,
    pub firmware: String,
    pub power_state: String,
    pub connection_state: String,
    pub fault_tolerance_enabled: bool,
    pub cpu_count: i32,
    pub memory_mb: i32,
    pub guest_name: String,
    pub guest_name_from_tools: String,
    pub host_name: String,
    pub ip_address: String,
    pub storage_used_mib: i32,
    pub is_template: bool,
    pub change_tracking_enabled: bool,
    pub disk_enable_uuid: bool,
    pub datacenter: String,
    pub cluster: String,
    pub hw_version: String,
    pub total_disk_capacity_mib: i32,
    pub provisioned_mib: i32,
    pub resource_pool: String,
    pub cpu_hot_add_enabled: bool,
    pub cpu_hot_remove_enabled: bool,
    pub cpu_sockets: i32,
    pub cores_per_socket: i32,
    pub memory_hot_add_enabled: bool,
    pub ballooned_memory_mb: i32,
    pub disks: Vec<Disk>,
    pub nics: Vec<Nic>,
    /// Legacy flat network-name list from the source's `Network #N` columns.
    pub networks: Vec<String>,
    pub concerns: Vec<Concern>,
}

/// A virtual disk attached to a VM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub key: String,
    pub unit_number: String,
    pub file: String,
    pub capacity_mib: i64,
    pub shared: bool,
    pub rdm: bool,
    pub bus: String,
    pub mode: String,
    pub serial: String,
    pub thin: String,
    pub controller: String,
    pub label: String,
    pub scsi_unit: String,
}

/// A virtual network interface attached to a VM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nic {
    pub network: String,
    pub mac: String,
    pub label: String,
    pub adapter: String,
    pub dvswitch: String,
    pub connected: bool,
    pub starts_connected: bool,
    pub nic_type: String,
    pub ipv4_address: String,
    pub ipv6_address: String,
}

/// An externally computed finding about a VM's migration readiness.
///
/// The category is free text; the literals `"Warning"` and `"Critical"`
/// are matched case-sensitively for migratability classification
/// (see [`crate::MigratabilityClass`]). Anything else — typically
/// `"Information"` — never affects classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concern {
    pub id: String,
    pub label: String,
    pub category: String,
    pub assessment: String,
}

impl Concern {
    /// Category literal blocking migration.
    pub const CRITICAL: &'static str = "Critical";
    /// Category literal allowing migration with warnings.
    pub const WARNING: &'static str = "Warning";
}

/// An ESXi host within a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(skip_serializing)]
    pub cluster: String,
    pub cpu_cores: i32,
    pub cpu_sockets: i32,
    pub id: String,
    pub memory_mb: i32,
    pub model: String,
    pub vendor: String,
}

/// A datastore with capacity figures and the hosts it is mounted on.
///
/// `host_id` is a comma-joined, de-duplicated host-id list when the hosts
/// table is available and [`NOT_AVAILABLE`] otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datastore {
    #[serde(skip_serializing)]
    pub cluster: String,
    pub disk_id: String,
    pub free_capacity_gb: f64,
    pub hardware_accelerated_move: bool,
    pub host_id: String,
    pub model: String,
    pub protocol_type: String,
    pub total_capacity_gb: f64,
    #[serde(rename = "type")]
    pub ds_type: String,
    pub vendor: String,
}

/// A network attached to VMs in a cluster.
///
/// `vlan_id` is resolved from the port-mapping table when present and
/// empty otherwise. `vms_count` is the number of VM NICs on this network
/// within the cluster/switch group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(skip_serializing)]
    pub cluster: String,
    pub dvswitch: String,
    pub name: String,
    #[serde(rename = "type")]
    pub net_type: String,
    pub vlan_id: String,
    pub vms_count: i32,
}

/// One entry of the guest-OS distribution summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsSummary {
    pub name: String,
    pub count: i64,
}
