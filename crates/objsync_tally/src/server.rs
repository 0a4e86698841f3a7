//! The tally remote API.

use objsync_remote::{RemoteServer, ServerConfig};

/// Resource names of the tally API.
pub mod resources {
    /// Currencies.
    pub const CURRENCY: &str = "Currency";
    /// Locations.
    pub const LOCATION: &str = "Location";
    /// Departments.
    pub const DEPARTMENT: &str = "Department";
    /// Ledger accounts.
    pub const CHART_OF_ACCOUNTS: &str = "Chart of Accounts";
    /// Vendors.
    pub const VENDOR: &str = "Vendor";
    /// Vendor bills.
    pub const VENDOR_BILL: &str = "Vendor Bill";
}

/// Endpoints of the tally API.
pub mod endpoints {
    /// Currencies.
    pub const CURRENCIES: &str = "/currencies";
    /// Locations.
    pub const LOCATIONS: &str = "/locations";
    /// Departments.
    pub const DEPARTMENTS: &str = "/departments";
    /// Ledger accounts.
    pub const ACCOUNTS: &str = "/accounts";
    /// Vendors.
    pub const VENDORS: &str = "/vendors";
    /// Vendor bills.
    pub const VENDOR_BILLS: &str = "/vendorbills";
}

/// Creates an empty tally API with the default configuration.
pub fn server() -> RemoteServer {
    server_with(ServerConfig::default())
}

/// Creates an empty tally API.
///
/// Currencies, locations, departments and accounts are read-only.
pub fn server_with(config: ServerConfig) -> RemoteServer {
    use endpoints::*;
    use resources::*;

    RemoteServer::new(config)
        .with_read_only(CURRENCIES, CURRENCY, &["id", "name", "iso_code"])
        .with_read_only(LOCATIONS, LOCATION, &["id", "name"])
        .with_read_only(DEPARTMENTS, DEPARTMENT, &["id", "name"])
        .with_read_only(ACCOUNTS, CHART_OF_ACCOUNTS, &["id", "number", "name"])
        .with_writable(VENDORS, VENDOR, &["id", "name", "location_id"])
        .with_writable(
            VENDOR_BILLS,
            VENDOR_BILL,
            &[
                "id",
                "invoice",
                "account_id",
                "vendor_id",
                "currency_id",
                "location_id",
                "department_id",
                "items",
            ],
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_data_is_read_only() {
        let server = server();
        for endpoint in [
            endpoints::CURRENCIES,
            endpoints::LOCATIONS,
            endpoints::DEPARTMENTS,
            endpoints::ACCOUNTS,
        ] {
            let (status, _) = server.handle_request("POST", endpoint, Some(&json!({"name": "x"})));
            assert_eq!(status, 405, "{endpoint}");
        }
    }

    #[test]
    fn vendors_can_be_created() {
        let server = server();
        let (status, _) = server.handle_request(
            "POST",
            endpoints::VENDORS,
            Some(&json!({"name": "Staples", "location_id": "van01"})),
        );
        assert_eq!(status, 200);
        assert_eq!(server.store(resources::VENDOR).unwrap().len(), 1);
    }
}
