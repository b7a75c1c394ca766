//! Loads the two catalog sources and publishes the base dataset

use std::{fs::File, path::Path, sync::mpsc, thread};

use anyhow::anyhow;
use log::{debug, error, info};

use crate::{
    config::CatalogSources,
    domain::record::{Catalog, Provenance, TrackRecord},
    ingest::{error::IngestError, row::RawRow},
};

pub mod error;
pub mod row;

/// Reads one CSV source and normalizes its rows.
///
/// Rows failing the release-date gate are dropped silently; rows the
/// CSV layer cannot decode are skipped with a debug trace. Only the
/// file itself failing aborts the source.
fn load_source(path: &Path, provenance: Provenance) -> Result<Vec<TrackRecord>, IngestError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                debug!("skipping undecodable row in {}: {err}", path.display());
                continue;
            }
        };
        if let Some(record) = row.normalize(provenance) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Loads and concatenates both sources, historical first.
///
/// The sources are read on two scoped threads and joined before the
/// catalog is published; either source failing aborts the whole load.
pub fn load_catalog(sources: &CatalogSources) -> Result<Catalog, IngestError> {
    let (historical, modern) = thread::scope(|scope| {
        let historical = scope.spawn(|| load_source(&sources.historical_path, Provenance::Historical));
        let modern = scope.spawn(|| load_source(&sources.modern_path, Provenance::Modern));
        (historical.join(), modern.join())
    });

    let historical = historical.map_err(|_| anyhow!("historical reader thread panicked"))??;
    let modern = modern.map_err(|_| anyhow!("modern reader thread panicked"))??;

    info!(
        "catalog loaded: {} historical + {} modern records",
        historical.len(),
        modern.len()
    );

    let mut records = historical;
    records.extend(modern);
    Ok(Catalog::new(records))
}

/// Handle to an in-flight catalog load.
///
/// Dropping the handle discards the result: the loader thread finishes
/// on its own and its send goes nowhere.
pub struct IngestHandle {
    receiver: mpsc::Receiver<Result<Catalog, IngestError>>,
}

/// Starts loading the catalog on a background thread.
pub fn spawn_load(sources: CatalogSources) -> IngestHandle {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        // the receiver may already be gone; that is the discard path
        let _ = sender.send(load_catalog(&sources));
    });
    IngestHandle { receiver }
}

impl IngestHandle {
    /// Blocks until the load finishes.
    pub fn wait(self) -> Result<Catalog, IngestError> {
        match self.receiver.recv() {
            Ok(result) => result,
            Err(_) => Err(IngestError::Internal(anyhow!(
                "catalog loader exited before publishing a result"
            ))),
        }
    }

    /// Non-blocking poll; `None` while the load is still running.
    pub fn try_wait(&self) -> Option<Result<Catalog, IngestError>> {
        self.receiver.try_recv().ok()
    }

    /// Blocks until the load finishes; a failed load is logged and
    /// yields the empty catalog. There is no retry, a fresh process
    /// start is the only recovery path.
    pub fn wait_or_empty(self) -> Catalog {
        match self.wait() {
            Ok(catalog) => catalog,
            Err(err) => {
                error!("catalog ingestion failed: {err}");
                Catalog::default()
            }
        }
    }
}
