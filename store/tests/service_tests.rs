//! End-to-end tests over an in-memory store populated from an
//! ingestion script.

use vm_inventory_core::{Filters, QueryOptions};
use vm_inventory_store::InventoryStore;

const SCENARIO: &str = include_str!("fixtures/scenario.sql");

fn populated_store() -> InventoryStore {
    let store = InventoryStore::open_in_memory().unwrap();
    store.create_schema().unwrap();
    let report = store.ingest_script(SCENARIO).unwrap();
    assert!(report.failures.is_empty(), "fixture ingest failed: {:?}", report.failures);
    store
}

fn production() -> Filters {
    Filters::default().with_cluster("Production")
}

#[test]
fn vm_listing_decodes_nested_collections() {
    let store = populated_store();
    let vms = store.vms(&Filters::default(), QueryOptions::default()).unwrap();
    assert_eq!(vms.len(), 5);

    let web = &vms[0];
    assert_eq!(web.id, "vm-1");
    assert_eq!(web.name, "web-01");
    assert_eq!(web.cluster, "Production");
    assert_eq!(web.cpu_count, 4);
    assert_eq!(web.memory_mb, 8192);
    assert_eq!(web.cpu_sockets, 2);
    assert_eq!(web.cores_per_socket, 2);
    assert!(web.cpu_hot_add_enabled);
    assert!(web.memory_hot_add_enabled);
    assert!(!web.is_template);
    assert!(web.change_tracking_enabled);
    assert!(!web.fault_tolerance_enabled);

    assert_eq!(web.disks.len(), 2);
    assert_eq!(web.disks[0].key, "2000");
    assert_eq!(web.disks[0].capacity_mib, 10240);
    assert_eq!(web.disks[0].thin, "True");
    assert_eq!(web.nics.len(), 1);
    assert_eq!(web.nics[0].mac, "00:50:56:aa:bb:01");
    assert!(web.nics[0].connected);
    assert_eq!(web.networks, vec!["VM Network".to_string(), "Backup".to_string()]);
    assert_eq!(web.concerns.len(), 1);
    assert_eq!(web.concerns[0].category, "Warning");
}

#[test]
fn vm_without_satellite_rows_gets_empty_collections() {
    let store = populated_store();
    let vms = store.vms(&Filters::default(), QueryOptions::default()).unwrap();
    let dev = vms.iter().find(|vm| vm.id == "vm-5").unwrap();
    assert!(dev.disks.is_empty());
    assert!(dev.nics.is_empty());
    assert!(dev.concerns.is_empty());
}

#[test]
fn counts_respect_filters() {
    let store = populated_store();
    assert_eq!(store.vm_count(&Filters::default()).unwrap(), 5);
    assert_eq!(store.vm_count(&production()).unwrap(), 3);
    assert_eq!(
        store.vm_count(&Filters::default().with_os("Windows")).unwrap(),
        1
    );
    assert_eq!(
        store
            .vm_count(&Filters::default().with_power_state("poweredOn"))
            .unwrap(),
        3
    );
    assert_eq!(
        store
            .vm_count(&production().with_os("Red Hat").with_power_state("poweredOn"))
            .unwrap(),
        1
    );
}

#[test]
fn migratability_counts_include_warned_vms_as_migratable() {
    let store = populated_store();
    let counts = store.migratability_counts(&production()).unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.migratable, 2);
    assert_eq!(counts.migratable_with_warnings, 1);
    assert_eq!(counts.not_migratable, 1);

    assert_eq!(store.migratable_vm_count(&production()).unwrap(), 2);
    assert_eq!(
        store.migratable_with_warnings_vm_count(&production()).unwrap(),
        1
    );
    assert_eq!(store.not_migratable_vm_count(&production()).unwrap(), 1);
}

#[test]
fn resource_breakdowns_split_by_class() {
    let store = populated_store();
    let breakdowns = store.resource_breakdowns(&production()).unwrap();

    assert_eq!(breakdowns.cpu_cores.total, 7);
    assert_eq!(breakdowns.cpu_cores.total_for_migratable, 5);
    assert_eq!(breakdowns.cpu_cores.total_for_migratable_with_warnings, 4);
    assert_eq!(breakdowns.cpu_cores.total_for_not_migratable, 2);

    assert_eq!(breakdowns.ram_gb.total, 14);
    assert_eq!(breakdowns.ram_gb.total_for_migratable, 10);
    assert_eq!(breakdowns.ram_gb.total_for_migratable_with_warnings, 8);
    assert_eq!(breakdowns.ram_gb.total_for_not_migratable, 4);

    // Migratable and not-migratable partition the population.
    for breakdown in [
        &breakdowns.cpu_cores,
        &breakdowns.ram_gb,
        &breakdowns.disk_count,
        &breakdowns.disk_gb,
        &breakdowns.nic_count,
    ] {
        assert_eq!(
            breakdown.total_for_migratable + breakdown.total_for_not_migratable,
            breakdown.total
        );
    }
}

#[test]
fn total_resources_sum_the_matching_vms() {
    let store = populated_store();
    let totals = store.total_resources(&production()).unwrap();
    assert_eq!(totals.total_cpu_cores, 7);
    assert_eq!(totals.total_ram_gb, 14);
    assert_eq!(totals.total_disk_count, 4);
    assert_eq!(totals.total_disk_gb, 26);
    assert_eq!(totals.total_nic_count, 3);
}

#[test]
fn hosts_and_clusters() {
    let store = populated_store();
    let hosts = store.hosts(&Filters::default(), QueryOptions::default()).unwrap();
    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[0].id, "host-1");
    assert_eq!(hosts[0].cpu_cores, 16);
    assert_eq!(hosts[0].memory_mb, 131072);
    assert_eq!(hosts[0].model, "PowerEdge R750");

    let production_hosts = store.hosts(&production(), QueryOptions::default()).unwrap();
    assert_eq!(production_hosts.len(), 2);

    assert_eq!(
        store.clusters().unwrap(),
        vec!["Dev".to_string(), "Production".to_string()]
    );
}

#[test]
fn datastores_resolve_host_ids_when_hosts_are_present() {
    let store = populated_store();
    let datastores = store
        .datastores(&Filters::default(), QueryOptions::default())
        .unwrap();
    assert_eq!(datastores.len(), 2);

    // Ordered by cluster then name.
    assert_eq!(datastores[0].disk_id, "ds-dev-01");
    assert_eq!(datastores[0].host_id, "host-3");
    assert!(!datastores[0].hardware_accelerated_move);
    assert_eq!(datastores[0].ds_type, "NFS");

    let prod = &datastores[1];
    assert_eq!(prod.disk_id, "ds-prod-01");
    assert!(prod.host_id.contains("host-1"));
    assert!(prod.host_id.contains("host-2"));
    assert!(prod.hardware_accelerated_move);
    assert_eq!(prod.free_capacity_gb, 512.0);
    assert_eq!(prod.total_capacity_gb, 1024.0);
}

#[test]
fn networks_resolve_vlans_when_port_mapping_is_present() {
    let store = populated_store();
    let networks = store
        .networks(&production(), QueryOptions::default())
        .unwrap();
    assert_eq!(networks.len(), 2);

    let vm_network = networks.iter().find(|n| n.name == "VM Network").unwrap();
    assert_eq!(vm_network.vlan_id, "100");
    assert_eq!(vm_network.vms_count, 2);
    assert_eq!(vm_network.dvswitch, "dvs-1");
    assert_eq!(vm_network.net_type, "distributed");

    let backup = networks.iter().find(|n| n.name == "Backup").unwrap();
    assert_eq!(backup.vlan_id, "200");
    assert_eq!(backup.vms_count, 1);
}

#[test]
fn degraded_variants_emit_placeholder_values() {
    let store = populated_store();
    let report = store
        .ingest_script("DROP TABLE vhost;\nDROP TABLE dvport;")
        .unwrap();
    assert_eq!(report.executed, 2);

    let datastores = store
        .datastores(&Filters::default(), QueryOptions::default())
        .unwrap();
    assert!(datastores.iter().all(|ds| ds.host_id == "N/A"));

    let networks = store
        .networks(&Filters::default(), QueryOptions::default())
        .unwrap();
    assert!(!networks.is_empty());
    assert!(networks.iter().all(|n| n.vlan_id.is_empty()));
}

#[test]
fn pagination_is_stable_and_disjoint() {
    let store = populated_store();
    let page_ids = |limit, offset| -> Vec<String> {
        store
            .vms(&Filters::default(), QueryOptions::page(limit, offset))
            .unwrap()
            .into_iter()
            .map(|vm| vm.id)
            .collect()
    };

    assert_eq!(page_ids(2, 0), ["vm-1", "vm-2"]);
    assert_eq!(page_ids(2, 2), ["vm-3", "vm-4"]);
    assert_eq!(page_ids(2, 4), ["vm-5"]);
    // Offset without a limit still skips.
    assert_eq!(page_ids(0, 3), ["vm-4", "vm-5"]);
}

#[test]
fn migration_issues_count_distinct_vms_per_label() {
    let store = populated_store();
    let issues = store.migration_issues(&Filters::default(), None).unwrap();
    assert_eq!(issues.len(), 3);

    let hot_add = issues.iter().find(|i| i.label == "CPU hot add enabled").unwrap();
    assert_eq!(hot_add.category, "Warning");
    assert_eq!(hot_add.count, 2);

    let warnings = store
        .migration_issues(&Filters::default(), Some("Warning"))
        .unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].label, "CPU hot add enabled");

    // Cluster filter narrows the distinct-VM count.
    let dev_issues = store
        .migration_issues(&Filters::default().with_cluster("Dev"), None)
        .unwrap();
    assert!(dev_issues.is_empty());
}

#[test]
fn power_state_counts_cover_every_state() {
    let store = populated_store();
    let counts = store.power_state_counts(&Filters::default()).unwrap();
    assert_eq!(counts.get("poweredOn"), Some(&3));
    assert_eq!(counts.get("poweredOff"), Some(&1));
    assert_eq!(counts.get("suspended"), Some(&1));
}

#[test]
fn null_and_empty_power_states_fold_into_one_group() {
    let store = populated_store();
    let report = store
        .ingest_script(concat!(
            "INSERT INTO vinfo (\"VM ID\", \"VM\", \"Powerstate\", \"Cluster\") ",
            "VALUES ('vm-6', 'ghost-01', NULL, 'Dev');\n",
            "INSERT INTO vinfo (\"VM ID\", \"VM\", \"Powerstate\", \"Cluster\") ",
            "VALUES ('vm-7', 'ghost-02', '', 'Dev');",
        ))
        .unwrap();
    assert!(report.is_success());

    let counts = store.power_state_counts(&Filters::default()).unwrap();
    assert_eq!(counts.get(""), Some(&2));
    assert_eq!(counts.values().sum::<i64>(), 7);
}

#[test]
fn os_summary_groups_by_tools_name() {
    let store = populated_store();
    let summary = store.os_summary(&Filters::default()).unwrap();
    let names: Vec<&str> = summary.iter().map(|os| os.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Microsoft Windows Server 2019",
            "Red Hat Enterprise Linux 9",
            "Ubuntu Linux"
        ]
    );
    assert_eq!(summary[1].count, 2);
}

#[test]
fn fixture_passes_validation() {
    let store = populated_store();
    let result = store.validate().unwrap();
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    assert!(!result.has_warnings(), "unexpected warnings: {:?}", result.warnings);
}

#[test]
fn empty_store_fails_validation_with_no_vms() {
    let store = InventoryStore::open_in_memory().unwrap();
    let result = store.validate().unwrap();
    assert!(result.has_errors());
    assert_eq!(result.errors[0].code, "NO_VMS");
    assert!(result.to_error().is_some());
}

#[test]
fn written_concerns_feed_classification() {
    use vm_inventory_core::Concern;
    use vm_inventory_store::ConcernBatch;

    let mut store = populated_store();
    let batch = ConcernBatch::new().append(
        "vm-3",
        Concern {
            id: "disk.mode".into(),
            label: "Unsupported disk mode".into(),
            category: Concern::CRITICAL.into(),
            assessment: "Independent disks are not migrated".into(),
        },
    );
    assert_eq!(store.write_concerns(&batch).unwrap(), 1);

    let counts = store.migratability_counts(&production()).unwrap();
    assert_eq!(counts.not_migratable, 2);
    assert_eq!(counts.migratable, 1);
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.db");

    {
        let store = InventoryStore::open(&path).unwrap();
        store.create_schema().unwrap();
        let report = store.ingest_script(SCENARIO).unwrap();
        assert!(report.is_success());
    }

    let reopened = InventoryStore::open(&path).unwrap();
    assert_eq!(reopened.vm_count(&Filters::default()).unwrap(), 5);
    assert_eq!(reopened.vcenter_id().unwrap(), "vc-uuid-1");
}

#[test]
fn inventory_groups_everything_by_cluster() {
    let store = populated_store();
    let inventory = store.inventory().unwrap();
    assert_eq!(inventory.vcenter_id, "vc-uuid-1");

    let clusters: Vec<&str> = inventory.clusters.keys().map(String::as_str).collect();
    assert_eq!(clusters, ["Dev", "Production"]);

    let production = &inventory.clusters["Production"];
    assert_eq!(production.vms.len(), 3);
    assert_eq!(production.infra.hosts.len(), 2);
    assert_eq!(production.infra.total_hosts, 2);
    assert_eq!(production.infra.datastores.len(), 1);
    assert_eq!(production.infra.networks.len(), 2);

    let dev = &inventory.clusters["Dev"];
    assert_eq!(dev.vms.len(), 2);
    assert_eq!(dev.infra.hosts.len(), 1);

    assert_eq!(inventory.os_summary.len(), 3);
}
