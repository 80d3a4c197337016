//! Row and JSON-list decoders.
//!
//! Every projected column is decoded by an explicit rule rather than by
//! reflective scanning, so a schema drift shows up here as a decode
//! error instead of a silently wrong value. Missing or null fields take
//! typed defaults: strings decode to `""`, numerics to `0`, booleans to
//! `false`. Boolean source text accepts `"true"`, `"True"`, `"1"`, and
//! `"Yes"`; anything else is `false`.
//!
//! The decoders return [`rusqlite::Result`] so they compose directly
//! with `Statement::query_map`; JSON failures are surfaced as
//! [`rusqlite::Error::FromSqlConversionFailure`] carrying the column
//! index they happened at.

use rusqlite::Row;
use rusqlite::types::Type;
use serde_json::Value;
use vm_inventory_core::{Concern, Datastore, Disk, Host, Network, Nic, OsSummary, Vm};

/// Parses the spreadsheet's boolean spellings.
pub fn parse_bool(text: &str) -> bool {
    matches!(text.trim(), "true" | "True" | "1" | "Yes")
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn flag(row: &Row<'_>, idx: usize) -> rusqlite::Result<bool> {
    Ok(parse_bool(&text(row, idx)?))
}

fn json_error(idx: usize, err: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn str_field(object: &Value, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn i64_field(object: &Value, key: &str) -> i64 {
    match object.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn bool_field(object: &Value, key: &str) -> bool {
    match object.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => parse_bool(s),
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    }
}

fn list_items(json: &str) -> serde_json::Result<Vec<Value>> {
    match serde_json::from_str(json)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// Decodes a `json_group_array` disk list.
pub fn disks_from_json(json: &str) -> serde_json::Result<Vec<Disk>> {
    Ok(list_items(json)?
        .iter()
        .map(|item| Disk {
            key: str_field(item, "key"),
            unit_number: str_field(item, "unit_number"),
            file: str_field(item, "file"),
            capacity_mib: i64_field(item, "capacity_mib"),
            shared: bool_field(item, "shared"),
            rdm: bool_field(item, "rdm"),
            bus: str_field(item, "bus"),
            mode: str_field(item, "mode"),
            serial: str_field(item, "serial"),
            thin: str_field(item, "thin"),
            controller: str_field(item, "controller"),
            label: str_field(item, "label"),
            scsi_unit: str_field(item, "scsi_unit"),
        })
        .collect())
}

/// Decodes a `json_group_array` NIC list.
pub fn nics_from_json(json: &str) -> serde_json::Result<Vec<Nic>> {
    Ok(list_items(json)?
        .iter()
        .map(|item| Nic {
            network: str_field(item, "network"),
            mac: str_field(item, "mac"),
            label: str_field(item, "label"),
            adapter: str_field(item, "adapter"),
            dvswitch: str_field(item, "dvswitch"),
            connected: bool_field(item, "connected"),
            starts_connected: bool_field(item, "starts_connected"),
            nic_type: str_field(item, "nic_type"),
            ipv4_address: str_field(item, "ipv4_address"),
            ipv6_address: str_field(item, "ipv6_address"),
        })
        .collect())
}

/// Decodes a `json_group_array` concern list.
pub fn concerns_from_json(json: &str) -> serde_json::Result<Vec<Concern>> {
    Ok(list_items(json)?
        .iter()
        .map(|item| Concern {
            id: str_field(item, "id"),
            label: str_field(item, "label"),
            category: str_field(item, "category"),
            assessment: str_field(item, "assessment"),
        })
        .collect())
}

/// Decodes a `json_array` of network names, dropping nulls and empties.
pub fn strings_from_json(json: &str) -> serde_json::Result<Vec<String>> {
    Ok(list_items(json)?
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
        .collect())
}

/// Decodes one row of the VM plan projection. Column order is fixed by
/// [`crate::query::vm_plan`].
pub fn vm_from_row(row: &Row<'_>) -> rusqlite::Result<Vm> {
    let disks_json = text(row, 31)?;
    let nics_json = text(row, 32)?;
    let networks_json = text(row, 33)?;
    let concerns_json = text(row, 34)?;

    Ok(Vm {
        id: text(row, 0)?,
        name: text(row, 1)?,
        folder: text(row, 2)?,
        host: text(row, 3)?,
        uuid: text(row, 4)?,
        firmware: text(row, 5)?,
        power_state: text(row, 6)?,
        connection_state: text(row, 7)?,
        fault_tolerance_enabled: flag(row, 8)?,
        cpu_count: row.get(9)?,
        memory_mb: row.get(10)?,
        guest_name: text(row, 11)?,
        guest_name_from_tools: text(row, 12)?,
        host_name: text(row, 13)?,
        ip_address: text(row, 14)?,
        storage_used_mib: row.get(15)?,
        is_template: flag(row, 16)?,
        change_tracking_enabled: flag(row, 17)?,
        disk_enable_uuid: flag(row, 18)?,
        datacenter: text(row, 19)?,
        cluster: text(row, 20)?,
        hw_version: text(row, 21)?,
        total_disk_capacity_mib: row.get(22)?,
        provisioned_mib: row.get(23)?,
        resource_pool: text(row, 24)?,
        cpu_hot_add_enabled: flag(row, 25)?,
        cpu_hot_remove_enabled: flag(row, 26)?,
        cpu_sockets: row.get(27)?,
        cores_per_socket: row.get(28)?,
        memory_hot_add_enabled: flag(row, 29)?,
        ballooned_memory_mb: row.get(30)?,
        disks: disks_from_json(&disks_json).map_err(|e| json_error(31, e))?,
        nics: nics_from_json(&nics_json).map_err(|e| json_error(32, e))?,
        networks: strings_from_json(&networks_json).map_err(|e| json_error(33, e))?,
        concerns: concerns_from_json(&concerns_json).map_err(|e| json_error(34, e))?,
    })
}

/// Decodes one row of the host plan projection.
pub fn host_from_row(row: &Row<'_>) -> rusqlite::Result<Host> {
    Ok(Host {
        cluster: text(row, 0)?,
        cpu_cores: row.get(1)?,
        cpu_sockets: row.get(2)?,
        id: text(row, 3)?,
        memory_mb: row.get(4)?,
        model: text(row, 5)?,
        vendor: text(row, 6)?,
    })
}

/// Decodes one row of the datastore plan projection. The datastore name
/// doubles as its disk id in the source data.
pub fn datastore_from_row(row: &Row<'_>) -> rusqlite::Result<Datastore> {
    Ok(Datastore {
        cluster: text(row, 0)?,
        disk_id: text(row, 1)?,
        free_capacity_gb: row.get(2)?,
        hardware_accelerated_move: flag(row, 3)?,
        host_id: text(row, 4)?,
        model: text(row, 5)?,
        protocol_type: text(row, 6)?,
        total_capacity_gb: row.get(7)?,
        ds_type: text(row, 8)?,
        vendor: text(row, 9)?,
    })
}

/// Decodes one row of the network plan projection.
pub fn network_from_row(row: &Row<'_>) -> rusqlite::Result<Network> {
    Ok(Network {
        cluster: text(row, 0)?,
        dvswitch: text(row, 1)?,
        name: text(row, 2)?,
        net_type: text(row, 3)?,
        vlan_id: text(row, 4)?,
        vms_count: row.get(5)?,
    })
}

/// Decodes one row of the OS summary projection.
pub fn os_from_row(row: &Row<'_>) -> rusqlite::Result<OsSummary> {
    Ok(OsSummary {
        name: text(row, 0)?,
        count: row.get(1)?,
    })
}
