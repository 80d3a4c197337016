//! Table names and DDL for the ingested inventory schema.
//!
//! The ingestion collaborator produces tables named after the source
//! spreadsheet sheets (lower-cased), with column names retaining the
//! original headers — quoted identifiers with spaces such as `"VM ID"`
//! or `"Capacity MiB"`. Every ingested column is TEXT; numeric
//! projections CAST at query time. `create_all_sql` emits
//! `CREATE TABLE IF NOT EXISTS` for the full set so a store can be
//! prepared before any data arrives.

/// Primary VM table. The only table whose absence or emptiness blocks
/// downstream use.
pub const VINFO: &str = "vinfo";
/// Per-VM CPU attributes, keyed by `"VM ID"`.
pub const VCPU: &str = "vcpu";
/// Per-VM memory attributes, keyed by `"VM ID"`.
pub const VMEMORY: &str = "vmemory";
/// Per-VM virtual disks, keyed by `"VM ID"`.
pub const VDISK: &str = "vdisk";
/// Per-VM network interfaces, keyed by `"VM ID"`.
pub const VNETWORK: &str = "vnetwork";
/// ESXi hosts.
pub const VHOST: &str = "vhost";
/// Datastores.
pub const VDATASTORE: &str = "vdatastore";
/// Clusters.
pub const VCLUSTER: &str = "vcluster";
/// Distributed switches.
pub const DVSWITCH: &str = "dvswitch";
/// Distributed port groups (network → VLAN mapping).
pub const DVPORT: &str = "dvport";
/// Host bus adapters.
pub const VHBA: &str = "vhba";
/// Guest partitions.
pub const VPARTITION: &str = "vpartition";
/// Per-VM migration concerns written by the concern store writer.
pub const CONCERNS: &str = "concerns";

/// Generates DDL for every inventory table.
pub fn create_all_sql() -> String {
    format!(
        r##"
CREATE TABLE IF NOT EXISTS {VINFO} (
    "VM ID" TEXT,
    "VM" TEXT,
    "Folder ID" TEXT,
    "Host" TEXT,
    "SMBIOS UUID" TEXT,
    "Firmware" TEXT,
    "Powerstate" TEXT,
    "Connection state" TEXT,
    "FT State" TEXT,
    "CPUs" TEXT,
    "Memory" TEXT,
    "OS according to the configuration file" TEXT,
    "OS according to the VMware Tools" TEXT,
    "DNS Name" TEXT,
    "Primary IP Address" TEXT,
    "In Use MiB" TEXT,
    "Template" TEXT,
    "CBT" TEXT,
    "EnableUUID" TEXT,
    "Datacenter" TEXT,
    "Cluster" TEXT,
    "HW version" TEXT,
    "Total disk capacity MiB" TEXT,
    "Provisioned MiB" TEXT,
    "Resource pool" TEXT,
    "VI SDK UUID" TEXT,
    "Network #1" TEXT,
    "Network #2" TEXT,
    "Network #3" TEXT,
    "Network #4" TEXT
);

CREATE TABLE IF NOT EXISTS {VCPU} (
    "VM ID" TEXT,
    "Sockets" TEXT,
    "Cores p/s" TEXT,
    "Hot Add" TEXT,
    "Hot Remove" TEXT
);

CREATE TABLE IF NOT EXISTS {VMEMORY} (
    "VM ID" TEXT,
    "Hot Add" TEXT,
    "Ballooned" TEXT
);

CREATE TABLE IF NOT EXISTS {VDISK} (
    "VM ID" TEXT,
    "Disk Key" TEXT,
    "Unit #" TEXT,
    "Path" TEXT,
    "Capacity MiB" TEXT,
    "Sharing mode" TEXT,
    "Raw" TEXT,
    "Shared Bus" TEXT,
    "Disk Mode" TEXT,
    "Disk UUID" TEXT,
    "Thin" TEXT,
    "Controller" TEXT,
    "Label" TEXT,
    "SCSI Unit #" TEXT
);

CREATE TABLE IF NOT EXISTS {VNETWORK} (
    "VM ID" TEXT,
    "Cluster" TEXT,
    "Network" TEXT,
    "Mac Address" TEXT,
    "NIC label" TEXT,
    "Adapter" TEXT,
    "Switch" TEXT,
    "Connected" TEXT,
    "Starts Connected" TEXT,
    "Type" TEXT,
    "IPv4 Address" TEXT,
    "IPv6 Address" TEXT
);

CREATE TABLE IF NOT EXISTS {VHOST} (
    "Cluster" TEXT,
    "# Cores" TEXT,
    "# CPU" TEXT,
    "Object ID" TEXT,
    "# Memory" TEXT,
    "Model" TEXT,
    "Vendor" TEXT,
    "Host" TEXT
);

CREATE TABLE IF NOT EXISTS {VDATASTORE} (
    "Cluster name" TEXT,
    "Name" TEXT,
    "Free MiB" TEXT,
    "Capacity MiB" TEXT,
    "MHA" TEXT,
    "Type" TEXT,
    "Hosts" TEXT
);

CREATE TABLE IF NOT EXISTS {VCLUSTER} (
    "Name" TEXT,
    "Datacenter" TEXT,
    "# Hosts" TEXT
);

CREATE TABLE IF NOT EXISTS {DVSWITCH} (
    "Switch" TEXT,
    "Datacenter" TEXT,
    "Name" TEXT
);

CREATE TABLE IF NOT EXISTS {DVPORT} (
    "Port" TEXT,
    "Switch" TEXT,
    "VLAN" TEXT
);

CREATE TABLE IF NOT EXISTS {VHBA} (
    "Host" TEXT,
    "Cluster" TEXT,
    "Device" TEXT,
    "Type" TEXT,
    "Model" TEXT
);

CREATE TABLE IF NOT EXISTS {VPARTITION} (
    "VM ID" TEXT,
    "Disk" TEXT,
    "Capacity MiB" TEXT,
    "Free MiB" TEXT
);

CREATE TABLE IF NOT EXISTS {CONCERNS} (
    "VM_ID" TEXT,
    "Concern_ID" TEXT,
    "Label" TEXT,
    "Category" TEXT,
    "Assessment" TEXT
);
"##
    )
}
