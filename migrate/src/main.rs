//! gtfs-migrate CLI - convert agency exports to GTFS tables
//!
//! ```bash
//! gtfs-migrate                                  # all six tables, defaults
//! gtfs-migrate --input-dir raw --output-dir gtfs
//! gtfs-migrate --only shapes --geographic-bounds
//! gtfs-migrate --dedupe-routes --report report.json
//! ```

use clap::Parser;
use gtfs_migrate::{logging, run_all, CoordinateBounds, MigrateOptions, SourceEncoding, Table};
use std::error::Error;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "gtfs-migrate")]
#[command(about = "Convert agency CSV exports into GTFS tables", long_about = None)]
struct Cli {
    /// Directory holding the agency exports
    #[arg(short, long, env = "MIGRATE_INPUT_DIR", default_value = ".")]
    input_dir: PathBuf,

    /// Directory the tables are written to
    #[arg(short, long, env = "MIGRATE_OUTPUT_DIR", default_value = "tables")]
    output_dir: PathBuf,

    /// Encoding of the exports: auto, utf-8, iso-8859-1, iso-8859-15, windows-1252
    #[arg(short, long, env = "MIGRATE_ENCODING", default_value = "utf-8")]
    encoding: SourceEncoding,

    /// Only run these tables (repeatable); default is all of them
    #[arg(long = "only", value_name = "TABLE")]
    only: Vec<Table>,

    /// Keep one routes.csv row per route id
    #[arg(long)]
    dedupe_routes: bool,

    /// Check shape points against real latitude/longitude ranges
    #[arg(long)]
    geographic_bounds: bool,

    /// Write a JSON run report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    logging::init("info");

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let options = MigrateOptions {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        encoding: cli.encoding,
        dedupe_routes: cli.dedupe_routes,
        bounds: if cli.geographic_bounds {
            CoordinateBounds::Geographic
        } else {
            CoordinateBounds::Legacy
        },
        tables: if cli.only.is_empty() {
            Table::ALL.to_vec()
        } else {
            cli.only
        },
    };

    let report = run_all(&options)?;

    if let Some(path) = cli.report {
        report.write_json(&path)?;
        info!(path = %path.display(), "Report written");
    }

    Ok(())
}
