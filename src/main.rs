//! Ledger Audit CLI
//!
//! Reads a general-ledger CSV extract (and optionally a system-log extract),
//! runs every audit check and writes one CSV per check into
//! `<output-dir>/report_jet_<client>/`. A `section,instances` summary is
//! printed to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --client ACME --gl gl.csv --log log.csv --output-dir out
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info`, `debug` or `warn` to control logging verbosity

use clap::Parser;
use ledger_audit::{AuditConfig, AuditEngine, Result, SignPolicy};
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "ledger-audit",
    version,
    about = "Run journal-entry audit tests over a general-ledger extract"
)]
struct Args {
    /// Client identifier; names the report directory
    #[arg(long)]
    client: String,

    /// General-ledger CSV extract
    #[arg(long, value_name = "FILE")]
    gl: PathBuf,

    /// System-log CSV extract used for reconciliation
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Format for the joined entry date and time, overrides the config file
    #[arg(long, value_name = "FORMAT")]
    datetime_format: Option<String>,

    /// How the signed Net amount is derived, overrides the config file
    #[arg(long, value_enum)]
    sign_policy: Option<SignPolicy>,

    /// Directory the report directory is created in
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AuditConfig::load(path)?,
        None => AuditConfig::default(),
    };
    if let Some(format) = args.datetime_format {
        config.datetime_format = format;
    }
    if let Some(policy) = args.sign_policy {
        config.sign_policy = policy;
    }

    let engine = AuditEngine::with_config(config);

    let ledger = engine.load_ledger(BufReader::new(File::open(&args.gl)?))?;
    let system_log = match &args.log {
        Some(path) => Some(engine.load_log(BufReader::new(File::open(path)?))?),
        None => None,
    };

    let report = engine.run(&args.client, ledger, system_log.as_ref())?;
    for warning in report.warnings() {
        eprintln!("Warning: {}", warning.message);
    }

    let dir = report.write_to_dir(&args.output_dir)?;
    info!("Report written to {}", dir.display());

    let stdout = io::stdout();
    let handle = stdout.lock();
    report.write_summary(handle)?;

    Ok(())
}
