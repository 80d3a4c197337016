use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vm_inventory_core::{Filters, QueryOptions};
use vm_inventory_store::InventoryStore;

#[derive(Debug, Parser)]
#[command(name = "vm-inventory")]
#[command(about = "Query and validate an ingested virtualization inventory")]
struct Cli {
    /// Path to the inventory SQLite database.
    #[arg(long, global = true, default_value = "inventory.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the inventory schema in the database.
    Init,
    /// Apply a multi-statement SQL ingestion script best-effort.
    IngestScript(IngestScriptArgs),
    /// Run the validation battery and report errors and warnings.
    Validate,
    /// Print the full cluster-grouped inventory as JSON.
    Inventory,
    /// List virtual machines.
    Vms(VmsArgs),
    /// List hosts.
    Hosts(ListArgs),
    /// List datastores.
    Datastores(ListArgs),
    /// List networks.
    Networks(ListArgs),
    /// Print counts, power states, and migratability aggregates.
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
struct IngestScriptArgs {
    /// SQL script file produced by the workbook converter.
    script: PathBuf,
}

#[derive(Debug, Args)]
struct VmsArgs {
    /// Exact cluster name to filter on.
    #[arg(long)]
    cluster: Option<String>,
    /// Guest-OS substring to filter on.
    #[arg(long)]
    os: Option<String>,
    /// Exact power state to filter on (e.g. poweredOn).
    #[arg(long)]
    power_state: Option<String>,
    #[command(flatten)]
    page: PageArgs,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Exact cluster name to filter on.
    #[arg(long)]
    cluster: Option<String>,
    #[command(flatten)]
    page: PageArgs,
}

#[derive(Debug, Args)]
struct SummaryArgs {
    /// Exact cluster name to filter on.
    #[arg(long)]
    cluster: Option<String>,
}

#[derive(Debug, Args)]
struct PageArgs {
    /// Maximum rows to return (0 means all).
    #[arg(long, default_value_t = 0)]
    limit: u64,
    /// Rows to skip.
    #[arg(long, default_value_t = 0)]
    offset: u64,
    /// Pretty-print a single JSON array instead of JSON lines.
    #[arg(long)]
    pretty: bool,
}

impl PageArgs {
    fn options(&self) -> QueryOptions {
        QueryOptions::page(self.limit, self.offset)
    }
}

fn cluster_filters(cluster: &Option<String>) -> Filters {
    match cluster {
        Some(cluster) => Filters::default().with_cluster(cluster),
        None => Filters::default(),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init => run_init(&cli.db),
        Command::IngestScript(args) => run_ingest_script(&cli.db, args),
        Command::Validate => run_validate(&cli.db),
        Command::Inventory => run_inventory(&cli.db),
        Command::Vms(args) => run_vms(&cli.db, args),
        Command::Hosts(args) => run_hosts(&cli.db, args),
        Command::Datastores(args) => run_datastores(&cli.db, args),
        Command::Networks(args) => run_networks(&cli.db, args),
        Command::Summary(args) => run_summary(&cli.db, args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn open_store(db: &PathBuf) -> Result<InventoryStore, String> {
    InventoryStore::open(db).map_err(|e| format!("Failed to open database '{}': {e}", db.display()))
}

fn run_init(db: &PathBuf) -> Result<(), String> {
    let store = open_store(db)?;
    store
        .create_schema()
        .map_err(|e| format!("Failed to create schema: {e}"))?;
    println!("Initialized inventory schema in '{}'", db.display());
    Ok(())
}

fn run_ingest_script(db: &PathBuf, args: IngestScriptArgs) -> Result<(), String> {
    let script = fs::read_to_string(&args.script)
        .map_err(|e| format!("Failed to read script '{}': {e}", args.script.display()))?;
    let store = open_store(db)?;
    let report = store
        .ingest_script(&script)
        .map_err(|e| format!("Failed to run script: {e}"))?;

    println!("Executed {} statements", report.executed);
    for failure in &report.failures {
        let kind = if failure.optional { "optional" } else { "required" };
        eprintln!("{kind} statement failed: {} ({})", failure.statement, failure.error);
    }
    if !report.is_success() {
        return Err("ingestion failed for the primary VM table".to_string());
    }
    Ok(())
}

fn run_validate(db: &PathBuf) -> Result<(), String> {
    let store = open_store(db)?;
    let result = store
        .validate()
        .map_err(|e| format!("Failed to validate: {e}"))?;

    for warning in &result.warnings {
        println!("warning [{}]: {}", warning.code, warning.message);
    }
    for error in &result.errors {
        println!("error [{}]: {}", error.code, error.message);
    }
    match result.to_error() {
        Some(err) => Err(err.to_string()),
        None => {
            println!("schema is valid");
            Ok(())
        }
    }
}

fn run_inventory(db: &PathBuf) -> Result<(), String> {
    let store = open_store(db)?;
    let inventory = store
        .inventory()
        .map_err(|e| format!("Failed to build inventory: {e}"))?;
    print_pretty(&inventory)
}

fn run_vms(db: &PathBuf, args: VmsArgs) -> Result<(), String> {
    let mut filters = cluster_filters(&args.cluster);
    if let Some(os) = &args.os {
        filters = filters.with_os(os);
    }
    if let Some(state) = &args.power_state {
        filters = filters.with_power_state(state);
    }

    let store = open_store(db)?;
    let vms = store
        .vms(&filters, args.page.options())
        .map_err(|e| format!("Failed to list VMs: {e}"))?;
    print_rows(&vms, args.page.pretty)
}

fn run_hosts(db: &PathBuf, args: ListArgs) -> Result<(), String> {
    let store = open_store(db)?;
    let hosts = store
        .hosts(&cluster_filters(&args.cluster), args.page.options())
        .map_err(|e| format!("Failed to list hosts: {e}"))?;
    print_rows(&hosts, args.page.pretty)
}

fn run_datastores(db: &PathBuf, args: ListArgs) -> Result<(), String> {
    let store = open_store(db)?;
    let datastores = store
        .datastores(&cluster_filters(&args.cluster), args.page.options())
        .map_err(|e| format!("Failed to list datastores: {e}"))?;
    print_rows(&datastores, args.page.pretty)
}

fn run_networks(db: &PathBuf, args: ListArgs) -> Result<(), String> {
    let store = open_store(db)?;
    let networks = store
        .networks(&cluster_filters(&args.cluster), args.page.options())
        .map_err(|e| format!("Failed to list networks: {e}"))?;
    print_rows(&networks, args.page.pretty)
}

fn run_summary(db: &PathBuf, args: SummaryArgs) -> Result<(), String> {
    let filters = cluster_filters(&args.cluster);
    let store = open_store(db)?;

    let vm_count = store
        .vm_count(&filters)
        .map_err(|e| format!("Failed to count VMs: {e}"))?;
    let power_states = store
        .power_state_counts(&filters)
        .map_err(|e| format!("Failed to count power states: {e}"))?;
    let migratability = store
        .migratability_counts(&filters)
        .map_err(|e| format!("Failed to classify VMs: {e}"))?;
    let totals = store
        .total_resources(&filters)
        .map_err(|e| format!("Failed to total resources: {e}"))?;
    let breakdowns = store
        .resource_breakdowns(&filters)
        .map_err(|e| format!("Failed to break down resources: {e}"))?;

    let summary = serde_json::json!({
        "vm_count": vm_count,
        "power_states": power_states,
        "migratability": migratability,
        "total_resources": totals,
        "resource_breakdowns": breakdowns,
    });
    print_pretty(&summary)
}

fn print_pretty(value: &impl serde::Serialize) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}

fn print_rows(rows: &[impl serde::Serialize], pretty: bool) -> Result<(), String> {
    if pretty {
        return print_pretty(&rows);
    }
    for row in rows {
        let json =
            serde_json::to_string(row).map_err(|e| format!("Failed to serialize row: {e}"))?;
        println!("{json}");
    }
    Ok(())
}
