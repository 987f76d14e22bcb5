//! FFTA data CLI
//!
//! Serves the game data tables over HTTP, or prints them from the terminal.

use clap::{Parser, Subcommand};
use ffta_core::{Entity, ListFilters, StoreConfig, TableStore};
use ffta_server::ServerConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ffta")]
#[command(about = "FFTA game data service", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding races.csv, jobs.csv and abilities.csv
    #[arg(global = true, short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable debug logging
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },

    /// Print an entity's table, filtered the same way as the API
    Show {
        /// Entity name (races, jobs, abilities)
        entity: String,

        /// Race filter
        #[arg(long)]
        race: Option<String>,

        /// Job filter (abilities only)
        #[arg(long)]
        job: Option<String>,

        /// Ability name filter
        #[arg(long)]
        ability: Option<String>,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List entities with their backing files and sizes
    Entities,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { bind } => {
            let config = ServerConfig::new(cli.data_dir).with_bind_addr(bind);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(ffta_server::run(config))?;
        }
        Commands::Show {
            entity,
            race,
            job,
            ability,
            limit,
        } => {
            let filters = ListFilters { race, job, ability };
            cmd_show(&cli.data_dir, &entity, &filters, limit)?;
        }
        Commands::Entities => cmd_entities(&cli.data_dir)?,
    }

    Ok(())
}

fn cmd_show(
    data_dir: &Path,
    entity: &str,
    filters: &ListFilters,
    limit: Option<usize>,
) -> ffta_core::Result<()> {
    let entity: Entity = entity.parse()?;
    let store = TableStore::new(StoreConfig::from_data_dir(data_dir));
    let records = store.list_records(entity, filters)?;

    let Some(first) = records.first() else {
        println!("No matching rows in {}", entity);
        return Ok(());
    };

    let header: Vec<&str> = first.iter().map(|(name, _)| name).collect();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    let row_limit = limit.unwrap_or(records.len());
    for record in records.iter().take(row_limit) {
        let values: Vec<String> = record.iter().map(|(_, v)| v.to_string_value()).collect();
        println!("{}", values.join("\t"));
    }

    if records.len() > row_limit {
        println!("... ({} more rows)", records.len() - row_limit);
    }

    Ok(())
}

fn cmd_entities(data_dir: &Path) -> ffta_core::Result<()> {
    let store = TableStore::new(StoreConfig::from_data_dir(data_dir));

    for summary in store.summaries()? {
        println!(
            "{} ({} rows) {}",
            summary.entity,
            summary.rows,
            summary.path.display()
        );
        println!("  columns: {}", summary.columns.join(", "));
    }

    Ok(())
}
