//! Command line front end of the lizard toolkit.
//!
//! Searches GPM L1C granules, reads swaths and lists flight metadata.
//! Data roots come from the environment (a `.env` file is honoured) or from
//! the YAML file given with `--config`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{FlightsArgs, GranulesArgs, ReadGpmArgs, SegmentsArgs};

#[derive(Parser, Debug)]
#[command(name = "lizard")]
#[command(about = "Airborne and satellite microwave data toolkit")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// YAML file with the data roots, instead of PATH_SAT/PATH_SEC/PATH_DAT
    #[arg(short, long, env = "LIZARD_CONFIG", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find granules overpassing a region or point
    Granules(GranulesArgs),
    /// Read a GPM L1C granule and print or write it
    ReadGpm(ReadGpmArgs),
    /// List the segments of a research flight
    Segments(SegmentsArgs),
    /// List research flights of missions and platforms
    Flights(FlightsArgs),
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.json_logs)?;
    debug!(command = ?args.command, "Starting lizard");

    let config = args.config.as_deref();
    match &args.command {
        Command::Granules(a) => commands::granules(config, a),
        Command::ReadGpm(a) => commands::read_gpm(config, a),
        Command::Segments(a) => commands::segments(a),
        Command::Flights(a) => commands::flights(a),
    }
}
