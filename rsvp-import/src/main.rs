//! rsvp-import - load a CSV guest list into the hosted store
//!
//! Usage: `rsvp-import --file invite_list.csv`
//!
//! The file needs a `Name,Address` header row. Guests already in the store
//! (compared by normalized name) are skipped, so the tool can be re-run after
//! the list grows.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rsvp_common::import::{import_guests, load_guest_csv};
use rsvp_common::store::RestStore;
use rsvp_common::{Config, Error, GuestDirectory};
use tracing::{error, info};

/// Command-line arguments for rsvp-import
#[derive(Parser, Debug)]
#[command(name = "rsvp-import")]
#[command(about = "Import a CSV guest list into the RSVP store")]
#[command(version)]
struct Args {
    /// Guest list CSV file with a Name,Address header
    #[arg(short, long, default_value = "../invite_list.csv")]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if !args.file.exists() {
        bail!("CSV file not found: {}", args.file.display());
    }

    let config = Config::from_env();
    if !config.store.is_configured() {
        eprintln!("Store is not configured. Set these environment variables:");
        eprintln!("  export SUPABASE_URL=https://<project>.supabase.co");
        eprintln!("  export SUPABASE_API_KEY=<service role key>");
        bail!("SUPABASE_URL and SUPABASE_API_KEY are required");
    }

    info!("Importing guests from {}", args.file.display());
    let guests = load_guest_csv(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let store = Arc::new(
        RestStore::new(&config.store, config.request_timeout)
            .context("Failed to create store client")?,
    );
    let directory = GuestDirectory::new(store.clone());

    match import_guests(store.as_ref(), &directory, guests).await {
        Ok(summary) => {
            info!(
                "Import finished: {} imported, {} already present",
                summary.imported, summary.skipped
            );
            Ok(())
        }
        Err(Error::PartialImport { failed, imported }) => {
            error!("{} guests failed to import ({} imported)", failed, imported);
            bail!("Import completed with {} errors", failed)
        }
        Err(e) => Err(e).context("Import failed"),
    }
}
