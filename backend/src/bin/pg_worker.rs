//! Privilege-dropping helper for the embedded PostgreSQL used by the
//! integration suites.
//!
//! When tests run as root, `pg_embedded_setup_unpriv` re-executes this binary
//! (named by `PG_EMBEDDED_WORKER`) as an unprivileged user with one lifecycle
//! step and the path of a JSON [`WorkerPayload`].

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Report, Result};
use pg_embedded_setup_unpriv::worker::WorkerPayload;
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

/// Cluster lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Step {
    Setup,
    Start,
    Stop,
}

/// `pg_worker` arguments.
#[derive(Debug, Parser)]
#[command(name = "pg_worker", about = "Run one embedded PostgreSQL lifecycle step")]
struct WorkerArgs {
    /// Step to perform.
    #[arg(value_enum)]
    step: Step,
    /// JSON payload describing settings and environment.
    config: PathBuf,
}

fn read_payload(path: &Path) -> Result<WorkerPayload> {
    let raw = fs::read(path).with_context(|| format!("read worker payload {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("parse worker payload {}", path.display()))
}

fn export_environment(pairs: Vec<(String, Option<String>)>) {
    for (key, value) in pairs {
        // SAFETY: runs before the runtime starts, while the process is single-threaded.
        unsafe {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn run(args: WorkerArgs) -> Result<()> {
    let payload = read_payload(&args.config)?;
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| Report::new(err).wrap_err("rebuild postgres settings"))?;
    export_environment(
        payload
            .environment
            .into_iter()
            .map(|(key, value)| (key, value.map(|secret| secret.expose().to_owned())))
            .collect(),
    );

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build worker runtime")?;
    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async {
            match args.step {
                Step::Setup => postgres.setup().await,
                Step::Start => postgres.start().await,
                Step::Stop => postgres.stop().await,
            }
        })
        .with_context(|| format!("postgres {:?} step failed", args.step))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    run(WorkerArgs::parse())
}
