//! The two reference demos.

use super::{print_run, Output};
use objsync_engine::{Backends, SyncConfig, SyncService};
use objsync_remote::RemoteServer;
use objsync_tally::server::{self, resources};
use objsync_tally::{entities, samples, TallyBackend, BACKEND_NAME};
use serde_json::json;
use std::sync::Arc;

/// Syncs the CAD currency.
///
/// Currencies cannot be created remotely. The local currency is matched
/// against the API's records by ISO code.
pub fn currency(config: SyncConfig, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let api = Arc::new(server::server());
    seed_currency(&api)?;
    let backend = Arc::new(TallyBackend::new(Arc::clone(&api)));
    let service = service(&backend, config);

    let currency = samples::cad();
    print_run(&mut service.sync(&currency, BACKEND_NAME)?, output)?;

    let remote = entities::Currency::from_local(&currency, backend.maps())?;
    println!("Result = {remote:?}");
    Ok(())
}

/// Syncs the Staples vendor.
///
/// Its location is read-only and is looked up before the vendor is sent.
/// The local currency of vendor and location has no remote counterpart on
/// either, so it is not synced.
pub fn vendor(config: SyncConfig, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let api = Arc::new(server::server());
    seed_currency(&api)?;
    samples::save(&api, resources::LOCATION, json!({"name": "Vancouver"}))?;
    let backend = Arc::new(TallyBackend::new(Arc::clone(&api)));
    let service = service(&backend, config);

    print_run(&mut service.sync(&samples::cad(), BACKEND_NAME)?, output)?;

    let vendor = samples::staples();
    print_run(&mut service.sync(&vendor, BACKEND_NAME)?, output)?;

    let remote = entities::Vendor::from_local(&vendor, backend.maps())?;
    println!("Result = {remote:?}");
    Ok(())
}

fn seed_currency(api: &RemoteServer) -> Result<String, Box<dyn std::error::Error>> {
    Ok(samples::save(
        api,
        resources::CURRENCY,
        json!({"name": "Canadian Dollar", "iso_code": "CAD"}),
    )?)
}

pub(super) fn service(backend: &Arc<TallyBackend>, config: SyncConfig) -> SyncService {
    SyncService::new(Backends::new().with(backend.clone()), config)
}
