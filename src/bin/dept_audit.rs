//! Offline department consistency checks.
//!
//! `dump` snapshots the live store into JSON files; `report` compares those
//! files and prints which departments lack an advisor or HOD.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use leave_portal::audit::{self, Snapshots, snapshot};
use leave_portal::config::Config;
use leave_portal::state::open_store;
use leave_portal::store::RecordStore;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "dept-audit",
    about = "Snapshot the leave portal store and audit department consistency",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write students, leaves, advisors and HODs as JSON files
    Dump {
        /// Directory to write the snapshot files into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the consistency report for a snapshot directory
    Report {
        /// Directory holding the snapshot files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match Cli::parse().command {
        Command::Dump { out } => {
            let config = Config::from_env().context("loading configuration")?;
            let store = open_store(&config).await?;
            let written = snapshot::dump(store.as_ref(), &out).await;
            store.close().await;
            let written = written?;
            info!(records = written, dir = %out.display(), "Snapshot complete");
        }
        Command::Report { dir } => {
            let report = audit::audit(&Snapshots::load(&dir));
            println!("{report}");
        }
    }

    Ok(())
}
