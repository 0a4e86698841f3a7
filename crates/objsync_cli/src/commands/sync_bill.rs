//! Sync-bill command implementation.

use super::demo::service;
use super::{print_run, Output};
use objsync_engine::SyncConfig;
use objsync_tally::local::Bill;
use objsync_tally::{samples, server, TallyBackend, BACKEND_NAME};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Runs the sync-bill command.
///
/// Syncs the bill at `path`, or the sample bill, against a fresh API.
/// Unless `seed` is false the API holds the sample reference data.
pub fn run(
    path: Option<&Path>,
    seed: bool,
    config: SyncConfig,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let bill = match path {
        Some(path) => load(path)?,
        None => samples::bill(),
    };
    info!(
        "Syncing bill {} with {} items, total {}",
        bill.invoice_number,
        bill.items.len(),
        bill.total()
    );

    let api = Arc::new(server::server());
    if seed {
        samples::seed(&api)?;
    }
    let backend = Arc::new(TallyBackend::new(Arc::clone(&api)));
    let stats = print_run(&mut service(&backend, config).sync(&bill, BACKEND_NAME)?, output)?;

    if stats.failed > 0 {
        return Err(format!("{} of {} entities failed to sync", stats.failed, stats.entities).into());
    }
    Ok(())
}

/// Reads a local bill from a JSON file.
fn load(path: &Path) -> Result<Bill, Box<dyn std::error::Error>> {
    let file = File::open(path).map_err(|e| format!("Cannot open {}: {e}", path.display()))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sample_bill_syncs() {
        run(None, true, SyncConfig::default(), Output::Json).unwrap();
    }

    #[test]
    fn unseeded_api_fails() {
        let err = run(None, false, SyncConfig::default(), Output::Text).unwrap_err();
        assert!(err.to_string().contains("failed to sync"));
    }

    #[test]
    fn bill_loads_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &samples::bill()).unwrap();
        file.flush().unwrap();

        let bill = load(file.path()).unwrap();
        assert_eq!(bill, samples::bill());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load(Path::new("/nonexistent/bill.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot open"));
    }
}
