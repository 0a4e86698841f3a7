//! The tally integration backend.

use crate::database::ObjectMaps;
use crate::entities::{
    BillCollection, ChartOfAccounts, Currency, Department, Item, Location, Vendor, VendorBill,
};
use crate::server::endpoints;
use objsync_core::SyncEntity;
use objsync_engine::{Backend, BackendMapping, EngineResult, LocalEntity, RemoteConnector};
use objsync_remote::{LoopbackConnector, RemoteServer};
use std::sync::Arc;
use tracing::debug;

/// Registry name of the tally backend.
pub const BACKEND_NAME: &str = "tally";

/// Syncs local accounting data with a tally API.
///
/// Local currencies, locations, departments, accounts, vendors, bill
/// lines and bills convert into their remote shapes. Reference data
/// (currencies, locations, departments and accounts) is only looked up;
/// vendors and bills are created. Bill lines travel inside their bill,
/// and bill collections only group bills.
#[derive(Debug)]
pub struct TallyBackend {
    mapping: BackendMapping,
    connector: LoopbackConnector,
    maps: ObjectMaps,
}

impl TallyBackend {
    /// Creates a backend talking to `server` with empty object maps.
    pub fn new(server: Arc<RemoteServer>) -> Self {
        Self::with_maps(server, ObjectMaps::new())
    }

    /// Creates a backend talking to `server` with existing object maps.
    pub fn with_maps(server: Arc<RemoteServer>, maps: ObjectMaps) -> Self {
        Self {
            mapping: mapping(&maps),
            connector: LoopbackConnector::new(server),
            maps,
        }
    }

    /// Returns the object maps.
    pub fn maps(&self) -> &ObjectMaps {
        &self.maps
    }

    /// Returns the API server.
    pub fn server(&self) -> &Arc<RemoteServer> {
        self.connector.server()
    }
}

impl Backend for TallyBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn mapping(&self) -> &BackendMapping {
        &self.mapping
    }

    fn connector(&self) -> &dyn RemoteConnector {
        &self.connector
    }
}

fn mapping(maps: &ObjectMaps) -> BackendMapping {
    let mapping = BackendMapping::new();
    let mapping = convert(mapping, maps, Currency::from_local);
    let mapping = convert(mapping, maps, Location::from_local);
    let mapping = convert(mapping, maps, Department::from_local);
    let mapping = convert(mapping, maps, ChartOfAccounts::from_local);
    let mapping = convert(mapping, maps, Vendor::from_local);
    let mapping = convert(mapping, maps, Item::from_local);
    let mapping = convert(mapping, maps, VendorBill::from_local);
    let mapping = convert(mapping, maps, BillCollection::from_local);

    mapping
        .read_only("Currency", "iso_code")
        .read_only("Location", "name")
        .read_only("Department", "name")
        .read_only("ChartOfAccounts", "number")
        .endpoint("Currency", endpoints::CURRENCIES)
        .endpoint("Location", endpoints::LOCATIONS)
        .endpoint("Department", endpoints::DEPARTMENTS)
        .endpoint("ChartOfAccounts", endpoints::ACCOUNTS)
        .endpoint("Vendor", endpoints::VENDORS)
        .endpoint("VendorBill", endpoints::VENDOR_BILLS)
        .object_map("Currency", Arc::clone(&maps.currency))
        .object_map("Location", Arc::clone(&maps.location))
        .object_map("Department", Arc::clone(&maps.department))
        .object_map("ChartOfAccounts", Arc::clone(&maps.account_code))
        .object_map("Vendor", Arc::clone(&maps.vendor))
        .object_map("VendorBill", Arc::clone(&maps.vendor_bill))
        .embedded("Item")
        .embedded("BillCollection")
}

/// Registers a `from_local` conversion that reads the object maps.
fn convert<L, R, F>(mapping: BackendMapping, maps: &ObjectMaps, from_local: F) -> BackendMapping
where
    L: LocalEntity,
    R: SyncEntity + 'static,
    F: Fn(&L, &ObjectMaps) -> EngineResult<Arc<R>> + Send + Sync + 'static,
{
    let maps = maps.clone();
    mapping.convert(move |local: &L| {
        let remote = from_local(local, &maps)?;
        debug!("Converted local {} into {}", local.local_type(), remote.key());
        Ok(remote as Arc<dyn SyncEntity>)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use tracing_test::traced_test;

    fn backend() -> TallyBackend {
        TallyBackend::new(Arc::new(crate::server::server()))
    }

    #[test]
    fn every_local_type_converts() {
        let backend = backend();
        let bill = samples::bill();

        let key = |local: &dyn LocalEntity| backend.to_remote(local).unwrap().key().to_string();

        assert_eq!(key(&bill.currency), "Currency=1");
        assert_eq!(key(&bill.vendor.location), "Location=1");
        assert_eq!(key(&bill.items[0].account.department), "Department=1");
        assert_eq!(key(&bill.items[0].account), "ChartOfAccounts=1");
        assert_eq!(key(&bill.vendor), "Vendor=1");
        assert_eq!(key(&bill.items[1]), "Item=2");
        assert_eq!(key(&bill), "VendorBill=1");
    }

    #[test]
    fn mapping_tables() {
        let backend = backend();
        let mapping = backend.mapping();
        assert_eq!(mapping.lookup_field("Currency"), Some("iso_code"));
        assert_eq!(mapping.lookup_field("ChartOfAccounts"), Some("number"));
        assert!(!mapping.is_read_only("Vendor"));
        assert!(mapping.is_embedded("Item"));
        assert_eq!(mapping.endpoint_for("VendorBill").unwrap(), "/vendorbills");
        assert!(mapping.object_map_for("Item").is_err());
        assert!(mapping.is_embedded("BillCollection"));
    }

    #[test]
    #[traced_test]
    fn conversions_are_logged() {
        backend().to_remote(&samples::staples()).unwrap();
        assert!(logs_contain("into Vendor=1"));
    }

    #[test]
    fn bill_collection_converts_every_bill() {
        let backend = backend();
        let collection = samples::bill_collection(3);

        let remote = backend.to_remote(&collection).unwrap();
        assert_eq!(remote.key().to_string(), "BillCollection=1");
        let bills: Vec<_> = remote.dependencies()[0]
            .entities()
            .map(|bill| bill.key().to_string())
            .collect();
        assert_eq!(bills, ["VendorBill=1", "VendorBill=2", "VendorBill=3"]);
    }
}
