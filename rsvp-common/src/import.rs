//! Guest list import
//!
//! Reads a `Name,Address` CSV file and adds guests that are not already in
//! the directory. Names are compared after normalization. Repeated names in
//! the file collapse to their first row; `skipped` counts the remaining names
//! that were already in the directory. New guests are inserted in batches; a
//! failed batch is counted and the import moves on to the next one, so earlier
//! batches stay committed.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{error, info, warn};

use crate::directory::GuestDirectory;
use crate::error::{Error, Result};
use crate::matching::normalize;
use crate::models::NewGuest;
use crate::store::Store;

/// Guests per insert request
pub const IMPORT_BATCH_SIZE: usize = 50;

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse guest rows from CSV text
///
/// The first row is a header. Rows with fewer than two fields, and rows whose
/// name is empty or the literal `Name`, are skipped.
pub fn parse_guest_csv<R: Read>(reader: R) -> Result<Vec<NewGuest>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut guests = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.len() < 2 {
            continue;
        }

        let name = record.get(0).unwrap_or_default();
        if name.is_empty() || name == "Name" {
            continue;
        }

        guests.push(NewGuest {
            name: name.to_string(),
            address: record.get(1).unwrap_or_default().to_string(),
        });
    }

    Ok(guests)
}

/// Read and parse a guest list file
pub fn load_guest_csv(path: &Path) -> Result<Vec<NewGuest>> {
    let file = File::open(path)?;
    let guests = parse_guest_csv(file)?;
    info!("Parsed {} guests from {}", guests.len(), path.display());
    Ok(guests)
}

/// Insert guests that are not yet in the directory
///
/// Returns [`Error::PartialImport`] when any batch failed. The directory cache
/// is cleared after a successful import.
pub async fn import_guests(
    store: &dyn Store,
    directory: &GuestDirectory,
    guests: Vec<NewGuest>,
) -> Result<ImportSummary> {
    if !store.is_configured() {
        return Err(Error::Config(
            "SUPABASE_URL and SUPABASE_API_KEY must be set to import guests".to_string(),
        ));
    }

    if let Err(e) = store.ensure_guests_table().await {
        warn!("Could not ensure guests table exists: {}", e);
    }

    let existing: HashSet<String> = match directory.load().await {
        Ok(existing) => {
            info!("Found {} existing guests", existing.len());
            existing.iter().map(|guest| normalize(&guest.name)).collect()
        }
        Err(e) => {
            warn!("Could not load existing guests, treating list as empty: {}", e);
            HashSet::new()
        }
    };

    let mut in_file = HashSet::new();
    let unique: Vec<NewGuest> = guests
        .into_iter()
        .filter(|guest| in_file.insert(normalize(&guest.name)))
        .collect();

    let unique_count = unique.len();
    let new_guests: Vec<NewGuest> = unique
        .into_iter()
        .filter(|guest| !existing.contains(&normalize(&guest.name)))
        .collect();
    let skipped = unique_count - new_guests.len();

    if new_guests.is_empty() {
        info!("No new guests to import ({} skipped)", skipped);
        return Ok(ImportSummary {
            imported: 0,
            skipped,
        });
    }

    info!("Importing {} new guests", new_guests.len());

    let mut imported = 0;
    let mut failed = 0;
    for (index, batch) in new_guests.chunks(IMPORT_BATCH_SIZE).enumerate() {
        match store.insert_guests(batch).await {
            Ok(()) => {
                imported += batch.len();
                info!(
                    "Imported batch {}: {} guests ({}/{})",
                    index + 1,
                    batch.len(),
                    imported,
                    new_guests.len()
                );
            }
            Err(e) => {
                failed += batch.len();
                error!("Batch {} failed: {}", index + 1, e);
            }
        }
    }

    if failed > 0 {
        return Err(Error::PartialImport { failed, imported });
    }

    directory.invalidate().await;
    info!("Import complete: {} imported, {} skipped", imported, skipped);
    Ok(ImportSummary { imported, skipped })
}
