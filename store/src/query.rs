//! Schema-adaptive query planners, one per entity.
//!
//! Each planner is a static construction function from (entity,
//! catalog presence flags) to a [`SelectPlan`]. Variant selection is
//! decided here and nowhere else:
//!
//! | entity    | presence flag      | rich variant            | degraded variant      |
//! |-----------|--------------------|-------------------------|-----------------------|
//! | datastore | `vhost` table      | host-id list aggregated | host id `'N/A'`       |
//! | network   | `dvport` table     | VLAN id left-joined     | VLAN id `''`          |
//! | vm        | satellite tables   | joins / list subqueries | NULL / `'[]'` columns |
//! | vm        | `Network #N` cols  | `json_array(..)` list   | empty list            |
//! | vm        | `concerns` table   | concern list subquery   | empty list            |
//!
//! VM queries keep the one-VM-one-row contract: disks, NICs, and
//! concerns are aggregated into JSON list columns by correlated
//! subqueries, never exploded into multiple rows. Every plan orders by
//! a stable key so pagination is reproducible.

use vm_inventory_core::{Filters, NOT_AVAILABLE, QueryOptions};

use crate::introspect::Catalog;
use crate::plan::{FilterColumns, Predicate, SelectPlan};
use crate::schema;

/// The [`NOT_AVAILABLE`] sentinel as a SQL string literal, projected by
/// degraded variants and unresolvable fields.
fn na_literal() -> String {
    format!("'{NOT_AVAILABLE}'")
}

/// The entity a plan (and any error raised by it) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Vm,
    Host,
    Datastore,
    Network,
    OsSummary,
    VCenter,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vm => "vm",
            Self::Host => "host",
            Self::Datastore => "datastore",
            Self::Network => "network",
            Self::OsSummary => "os summary",
            Self::VCenter => "vcenter",
        }
    }
}

fn vm_filter_columns() -> FilterColumns<'static> {
    FilterColumns {
        cluster: "i.\"Cluster\"",
        os: Some("i.\"OS according to the configuration file\""),
        power_state: Some("i.\"Powerstate\""),
    }
}

fn cluster_only(column: &str) -> FilterColumns<'_> {
    FilterColumns {
        cluster: column,
        os: None,
        power_state: None,
    }
}

fn disks_subquery(catalog: &Catalog) -> String {
    if !catalog.has_table(schema::VDISK) {
        return "'[]' AS disks".to_string();
    }
    concat!(
        "(SELECT COALESCE(json_group_array(json_object(",
        "'key', d.\"Disk Key\", ",
        "'unit_number', d.\"Unit #\", ",
        "'file', d.\"Path\", ",
        "'capacity_mib', CAST(d.\"Capacity MiB\" AS INTEGER), ",
        "'shared', d.\"Sharing mode\", ",
        "'rdm', d.\"Raw\", ",
        "'bus', d.\"Shared Bus\", ",
        "'mode', d.\"Disk Mode\", ",
        "'serial', d.\"Disk UUID\", ",
        "'thin', d.\"Thin\", ",
        "'controller', d.\"Controller\", ",
        "'label', d.\"Label\", ",
        "'scsi_unit', d.\"SCSI Unit #\"",
        ") ORDER BY d.\"Disk Key\"), '[]') ",
        "FROM vdisk d WHERE d.\"VM ID\" = i.\"VM ID\") AS disks",
    )
    .to_string()
}

fn nics_subquery(catalog: &Catalog) -> String {
    if !catalog.has_table(schema::VNETWORK) {
        return "'[]' AS nics".to_string();
    }
    concat!(
        "(SELECT COALESCE(json_group_array(json_object(",
        "'network', n.\"Network\", ",
        "'mac', n.\"Mac Address\", ",
        "'label', n.\"NIC label\", ",
        "'adapter', n.\"Adapter\", ",
        "'dvswitch', n.\"Switch\", ",
        "'connected', n.\"Connected\", ",
        "'starts_connected', n.\"Starts Connected\", ",
        "'nic_type', n.\"Type\", ",
        "'ipv4_address', n.\"IPv4 Address\", ",
        "'ipv6_address', n.\"IPv6 Address\"",
        ") ORDER BY n.\"Mac Address\"), '[]') ",
        "FROM vnetwork n WHERE n.\"VM ID\" = i.\"VM ID\") AS nics",
    )
    .to_string()
}

fn concerns_subquery(catalog: &Catalog) -> String {
    if !catalog.has_table(schema::CONCERNS) {
        return "'[]' AS concerns".to_string();
    }
    concat!(
        "(SELECT COALESCE(json_group_array(json_object(",
        "'id', k.\"Concern_ID\", ",
        "'label', k.\"Label\", ",
        "'category', k.\"Category\", ",
        "'assessment', k.\"Assessment\"",
        ") ORDER BY k.\"Concern_ID\"), '[]') ",
        "FROM concerns k WHERE k.\"VM_ID\" = i.\"VM ID\") AS concerns",
    )
    .to_string()
}

fn networks_column(catalog: &Catalog) -> String {
    let columns = catalog.vinfo_network_columns();
    if columns.is_empty() {
        return "json_array() AS networks".to_string();
    }
    let quoted: Vec<String> = columns
        .iter()
        .map(|column| format!("i.\"{column}\""))
        .collect();
    format!("json_array({}) AS networks", quoted.join(", "))
}

/// Plan for the full VM listing: one row per VM with nested disk, NIC,
/// network-name, and concern collections.
pub fn vm_plan(catalog: &Catalog, filters: &Filters, options: QueryOptions) -> SelectPlan {
    let has_cpu = catalog.has_table(schema::VCPU);
    let has_memory = catalog.has_table(schema::VMEMORY);

    let mut plan = SelectPlan::from_table("vinfo i").columns([
        "i.\"VM ID\"",
        "i.\"VM\"",
        "i.\"Folder ID\"",
        "i.\"Host\"",
        "i.\"SMBIOS UUID\"",
        "i.\"Firmware\"",
        "i.\"Powerstate\"",
        "i.\"Connection state\"",
        "i.\"FT State\"",
        "COALESCE(CAST(i.\"CPUs\" AS INTEGER), 0)",
        "COALESCE(CAST(i.\"Memory\" AS INTEGER), 0)",
        "i.\"OS according to the configuration file\"",
        "i.\"OS according to the VMware Tools\"",
        "i.\"DNS Name\"",
        "i.\"Primary IP Address\"",
        "COALESCE(CAST(i.\"In Use MiB\" AS INTEGER), 0)",
        "i.\"Template\"",
        "i.\"CBT\"",
        "i.\"EnableUUID\"",
        "i.\"Datacenter\"",
        "i.\"Cluster\"",
        "i.\"HW version\"",
        "COALESCE(CAST(i.\"Total disk capacity MiB\" AS INTEGER), 0)",
        "COALESCE(CAST(i.\"Provisioned MiB\" AS INTEGER), 0)",
        "i.\"Resource pool\"",
    ]);

    if has_cpu {
        plan = plan.columns([
            "c.\"Hot Add\"",
            "c.\"Hot Remove\"",
            "COALESCE(CAST(c.\"Sockets\" AS INTEGER), 0)",
            "COALESCE(CAST(c.\"Cores p/s\" AS INTEGER), 0)",
        ]);
    } else {
        plan = plan.columns(["NULL", "NULL", "0", "0"]);
    }

    if has_memory {
        plan = plan.columns(["m.\"Hot Add\"", "COALESCE(CAST(m.\"Ballooned\" AS INTEGER), 0)"]);
    } else {
        plan = plan.columns(["NULL", "0"]);
    }

    plan = plan
        .column(disks_subquery(catalog))
        .column(nics_subquery(catalog))
        .column(networks_column(catalog))
        .column(concerns_subquery(catalog));

    if has_cpu {
        plan = plan.join("LEFT JOIN vcpu c ON c.\"VM ID\" = i.\"VM ID\"");
    }
    if has_memory {
        plan = plan.join("LEFT JOIN vmemory m ON m.\"VM ID\" = i.\"VM ID\"");
    }

    plan.filters(filters, vm_filter_columns())
        .order_by("i.\"VM ID\"")
        .paginate(options)
}

/// Plan counting VMs matching the filter set.
pub fn vm_count_plan(filters: &Filters) -> SelectPlan {
    SelectPlan::from_table("vinfo i")
        .column("COUNT(*)")
        .filters(filters, vm_filter_columns())
}

/// Plan producing one classification row per matching VM:
/// (vm id, has Warning concern, has Critical concern).
pub fn classification_plan(catalog: &Catalog, filters: &Filters) -> SelectPlan {
    let (warning, critical) = severity_flag_columns(catalog);
    SelectPlan::from_table("vinfo i")
        .column("i.\"VM ID\"")
        .column(warning)
        .column(critical)
        .filters(filters, vm_filter_columns())
        .order_by("i.\"VM ID\"")
}

/// Plan producing one resource row per matching VM:
/// (cpu cores, ram GB, disk count, disk GB, NIC count, severity flags).
pub fn resource_plan(catalog: &Catalog, filters: &Filters) -> SelectPlan {
    let disk_count = if catalog.has_table(schema::VDISK) {
        "(SELECT COUNT(*) FROM vdisk d WHERE d.\"VM ID\" = i.\"VM ID\")"
    } else {
        "0"
    };
    let disk_gb = if catalog.has_table(schema::VDISK) {
        "(SELECT COALESCE(SUM(CAST(d.\"Capacity MiB\" AS INTEGER)), 0) / 1024 \
         FROM vdisk d WHERE d.\"VM ID\" = i.\"VM ID\")"
    } else {
        "0"
    };
    let nic_count = if catalog.has_table(schema::VNETWORK) {
        "(SELECT COUNT(*) FROM vnetwork n WHERE n.\"VM ID\" = i.\"VM ID\")"
    } else {
        "0"
    };
    let (warning, critical) = severity_flag_columns(catalog);

    SelectPlan::from_table("vinfo i")
        .column("COALESCE(CAST(i.\"CPUs\" AS INTEGER), 0)")
        .column("COALESCE(CAST(i.\"Memory\" AS INTEGER), 0) / 1024")
        .column(disk_count)
        .column(disk_gb)
        .column(nic_count)
        .column(warning)
        .column(critical)
        .filters(filters, vm_filter_columns())
        .order_by("i.\"VM ID\"")
}

fn severity_flag_columns(catalog: &Catalog) -> (&'static str, &'static str) {
    if catalog.has_table(schema::CONCERNS) {
        (
            "EXISTS (SELECT 1 FROM concerns k WHERE k.\"VM_ID\" = i.\"VM ID\" \
             AND k.\"Category\" = 'Warning')",
            "EXISTS (SELECT 1 FROM concerns k WHERE k.\"VM_ID\" = i.\"VM ID\" \
             AND k.\"Category\" = 'Critical')",
        )
    } else {
        ("0", "0")
    }
}

/// Plan for the host listing. Rows without a cluster are excluded.
pub fn host_plan(filters: &Filters, options: QueryOptions) -> SelectPlan {
    SelectPlan::from_table("vhost h")
        .columns([
            "h.\"Cluster\"",
            "COALESCE(CAST(h.\"# Cores\" AS INTEGER), 0)",
            "COALESCE(CAST(h.\"# CPU\" AS INTEGER), 0)",
            "h.\"Object ID\"",
            "COALESCE(CAST(h.\"# Memory\" AS INTEGER), 0)",
        ])
        .column(format!("COALESCE(h.\"Model\", {})", na_literal()))
        .column(format!("COALESCE(h.\"Vendor\", {})", na_literal()))
        .predicate(Predicate::fixed("h.\"Cluster\" IS NOT NULL"))
        .filters(filters, cluster_only("h.\"Cluster\""))
        .order_by("h.\"Object ID\"")
        .paginate(options)
}

/// Plan for the datastore listing. The rich variant resolves the
/// de-duplicated host-id list by matching each host's address against
/// the datastore's comma-separated host list; the degraded variant
/// (no hosts table) emits `'N/A'`.
pub fn datastore_plan(catalog: &Catalog, filters: &Filters, options: QueryOptions) -> SelectPlan {
    let plan = SelectPlan::from_table("vdatastore e")
        .column("e.\"Cluster name\"")
        .column("e.\"Name\"")
        .column("COALESCE(CAST(e.\"Free MiB\" AS REAL), 0) / 1024.0")
        .column("e.\"MHA\"");

    let plan = if catalog.has_table(schema::VHOST) {
        plan.column(format!(
            "COALESCE(group_concat(DISTINCT h.\"Object ID\"), {})",
            na_literal()
        ))
        .join(
            "LEFT JOIN vhost h ON h.\"Host\" IS NOT NULL AND h.\"Host\" <> '' \
             AND instr(',' || replace(COALESCE(e.\"Hosts\", ''), ' ', '') || ',', \
             ',' || replace(h.\"Host\", ' ', '') || ',') > 0",
        )
    } else {
        plan.column(na_literal())
    };

    let plan = plan
        .column(na_literal())
        .column(na_literal())
        .column("COALESCE(CAST(e.\"Capacity MiB\" AS REAL), 0) / 1024.0")
        .column(format!("COALESCE(e.\"Type\", {})", na_literal()))
        .column(na_literal())
        .predicate(Predicate::fixed("e.\"Cluster name\" IS NOT NULL"))
        .filters(filters, cluster_only("e.\"Cluster name\""));

    let plan = if catalog.has_table(schema::VHOST) {
        plan.group_by("e.\"Cluster name\"")
            .group_by("e.\"Name\"")
            .group_by("e.\"Free MiB\"")
            .group_by("e.\"MHA\"")
            .group_by("e.\"Capacity MiB\"")
            .group_by("e.\"Type\"")
    } else {
        plan
    };

    plan.order_by("e.\"Cluster name\"")
        .order_by("e.\"Name\"")
        .paginate(options)
}

/// Plan for the network listing: one row per cluster/switch/network
/// group with the NIC count as `vms_count`. The rich variant resolves
/// the VLAN id from the port-mapping table; the degraded variant
/// emits an empty VLAN id.
pub fn network_plan(catalog: &Catalog, filters: &Filters, options: QueryOptions) -> SelectPlan {
    let has_dvport = catalog.has_table(schema::DVPORT);

    let plan = SelectPlan::from_table("vnetwork n")
        .column("n.\"Cluster\"")
        .column("COALESCE(n.\"Switch\", '')")
        .column("n.\"Network\"")
        .column("'distributed'")
        .column(if has_dvport {
            "COALESCE(p.\"VLAN\", '')"
        } else {
            "''"
        })
        .column("COUNT(*)");

    let plan = if has_dvport {
        plan.join("LEFT JOIN dvport p ON n.\"Network\" = p.\"Port\"")
    } else {
        plan
    };

    let plan = plan
        .predicate(Predicate::fixed("n.\"Cluster\" IS NOT NULL"))
        .filters(filters, cluster_only("n.\"Cluster\""))
        .group_by("n.\"Cluster\"")
        .group_by("n.\"Switch\"")
        .group_by("n.\"Network\"");

    let plan = if has_dvport {
        plan.group_by("p.\"VLAN\"")
    } else {
        plan
    };

    plan.order_by("n.\"Cluster\"")
        .order_by("n.\"Network\"")
        .order_by("COALESCE(n.\"Switch\", '')")
        .paginate(options)
}

/// Plan for the guest-OS distribution summary.
pub fn os_plan(filters: &Filters) -> SelectPlan {
    SelectPlan::from_table("vinfo i")
        .column("i.\"OS according to the VMware Tools\"")
        .column("COUNT(*)")
        .predicate(Predicate::fixed(
            "i.\"OS according to the VMware Tools\" IS NOT NULL",
        ))
        .filters(
            filters,
            FilterColumns {
                cluster: "i.\"Cluster\"",
                os: Some("i.\"OS according to the VMware Tools\""),
                power_state: Some("i.\"Powerstate\""),
            },
        )
        .group_by("i.\"OS according to the VMware Tools\"")
        .order_by("i.\"OS according to the VMware Tools\"")
}

/// Plan resolving the vCenter identity from the VM table.
pub fn vcenter_plan() -> SelectPlan {
    SelectPlan::from_table("vinfo i")
        .column("i.\"VI SDK UUID\"")
        .predicate(Predicate::fixed(
            "i.\"VI SDK UUID\" IS NOT NULL AND TRIM(i.\"VI SDK UUID\") <> ''",
        ))
        .order_by("i.\"VM ID\"")
        .paginate(QueryOptions::page(1, 0))
}

/// Plan listing the distinct non-empty cluster names.
pub fn clusters_plan() -> SelectPlan {
    SelectPlan::from_table("vinfo i")
        .column("DISTINCT i.\"Cluster\"")
        .predicate(Predicate::fixed(
            "i.\"Cluster\" IS NOT NULL AND TRIM(i.\"Cluster\") <> ''",
        ))
        .order_by("i.\"Cluster\"")
}

/// Plan counting VMs per distinct power-state value. NULL and empty
/// states fold into a single `''` group.
pub fn power_state_plan(filters: &Filters) -> SelectPlan {
    SelectPlan::from_table("vinfo i")
        .column("COALESCE(i.\"Powerstate\", '')")
        .column("COUNT(*)")
        .filters(filters, vm_filter_columns())
        .group_by("COALESCE(i.\"Powerstate\", '')")
        .order_by("COALESCE(i.\"Powerstate\", '')")
}

/// Plan aggregating concerns into migration issues: one row per
/// {label, category} with the count of distinct VMs exhibiting it.
/// Returns `None` when the concerns table is absent.
pub fn migration_issues_plan(
    catalog: &Catalog,
    filters: &Filters,
    category: Option<&str>,
) -> Option<SelectPlan> {
    if !catalog.has_table(schema::CONCERNS) {
        return None;
    }

    let mut plan = SelectPlan::from_table("concerns k")
        .column("k.\"Label\"")
        .column("k.\"Category\"")
        .column("COUNT(DISTINCT k.\"VM_ID\")")
        .join("JOIN vinfo i ON i.\"VM ID\" = k.\"VM_ID\"")
        .filters(filters, vm_filter_columns());

    if let Some(category) = category {
        plan = plan.predicate(Predicate::equals("k.\"Category\"", category));
    }

    Some(
        plan.group_by("k.\"Label\"")
            .group_by("k.\"Category\"")
            .order_by("k.\"Label\"")
            .order_by("k.\"Category\""),
    )
}
