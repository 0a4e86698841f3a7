//! Identity maps of the tally backend.

use objsync_engine::EngineResult;
use objsync_storage::ObjectMap;
use std::sync::Arc;

/// One object map per synced tally entity type.
#[derive(Debug, Clone)]
pub struct ObjectMaps {
    /// Currencies.
    pub currency: Arc<ObjectMap>,
    /// Locations.
    pub location: Arc<ObjectMap>,
    /// Departments.
    pub department: Arc<ObjectMap>,
    /// Account codes, keyed by account code id.
    pub account_code: Arc<ObjectMap>,
    /// Vendors.
    pub vendor: Arc<ObjectMap>,
    /// Vendor bills.
    pub vendor_bill: Arc<ObjectMap>,
}

impl ObjectMaps {
    /// Creates empty maps.
    pub fn new() -> Self {
        let map = |name: &str| Arc::new(ObjectMap::new(name));
        Self {
            currency: map("Currency"),
            location: map("Location"),
            department: map("Department"),
            account_code: map("Account Code"),
            vendor: map("Vendor"),
            vendor_bill: map("Bill"),
        }
    }

    /// Clears every map.
    pub fn reset(&self) {
        for map in self.all() {
            map.reset();
        }
    }

    /// Returns every map.
    pub fn all(&self) -> [&Arc<ObjectMap>; 6] {
        [
            &self.currency,
            &self.location,
            &self.department,
            &self.account_code,
            &self.vendor,
            &self.vendor_bill,
        ]
    }
}

impl Default for ObjectMaps {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the remote id recorded for `local_id`.
pub(crate) fn remote_id(map: &ObjectMap, local_id: u64) -> EngineResult<Option<String>> {
    Ok(map
        .get_one(&local_id.to_string())?
        .map(|mapping| mapping.remote_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use objsync_storage::ObjectMapping;

    #[test]
    fn remote_id_lookup() {
        let maps = ObjectMaps::new();
        assert_eq!(remote_id(&maps.vendor, 1).unwrap(), None);

        maps.vendor.save(&ObjectMapping::new("1", "v-1")).unwrap();
        assert_eq!(remote_id(&maps.vendor, 1).unwrap().as_deref(), Some("v-1"));
    }

    #[test]
    fn reset_clears_all_maps() {
        let maps = ObjectMaps::new();
        maps.currency.save(&ObjectMapping::new("1", "cad")).unwrap();
        maps.vendor_bill.save(&ObjectMapping::new("1", "b-1")).unwrap();

        maps.reset();
        assert!(maps.all().iter().all(|map| map.is_empty()));
    }
}
