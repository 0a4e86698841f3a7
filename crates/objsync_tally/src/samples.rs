//! Sample data for demos and tests.
//!
//! Local entities share ids where they refer to the same thing: the
//! vendor's location is also the department's branch.

use crate::local::{
    Account, AccountCode, Bill, BillCollection, Currency, Department, Item, Location, Vendor,
};
use crate::server::resources;
use objsync_remote::{RemoteServer, ServerError, ServerResult};
use serde_json::{json, Value};

/// Canadian dollars.
pub fn cad() -> Currency {
    Currency {
        id: 1,
        name: "CAD".into(),
        rate: 1.0,
    }
}

/// The Vancouver branch.
pub fn vancouver() -> Location {
    Location {
        id: 1,
        name: "Vancouver".into(),
        local_currency: cad(),
    }
}

/// Accounting, at the Vancouver branch.
pub fn accounting() -> Department {
    Department {
        id: 1,
        name: "Accounting".into(),
        branch: vancouver(),
    }
}

/// Office supplies, booked by accounting.
pub fn office_supplies() -> Account {
    Account {
        id: 1,
        account_code: AccountCode {
            id: 1,
            code: "4000".into(),
            description: "Office Supplies".into(),
        },
        department: accounting(),
    }
}

/// Staples, in Vancouver.
pub fn staples() -> Vendor {
    Vendor {
        id: 1,
        name: "Staples".into(),
        currency: cad(),
        location: vancouver(),
    }
}

/// A two-line office supplies bill from Staples.
pub fn bill() -> Bill {
    let item = |id, description: &str, quantity, unit_cost| Item {
        id,
        account: office_supplies(),
        description: description.into(),
        quantity,
        unit_cost,
        currency: cad(),
    };
    Bill {
        id: 1,
        invoice_number: "INV1001".into(),
        vendor: staples(),
        currency: cad(),
        items: vec![item(1, "Printer paper", 2, 25), item(2, "Toner", 1, 12)],
    }
}

/// `count` bills from Staples, numbered from 1, in one collection.
///
/// Bill `n` is invoice `INV100n` and its lines have ids `10n+1` and `10n+2`.
pub fn bill_collection(count: u64) -> BillCollection {
    let bills = (1..=count)
        .map(|n| {
            let mut bill = bill();
            bill.id = n;
            bill.invoice_number = format!("INV{}", 1000 + n);
            for (line, item) in bill.items.iter_mut().enumerate() {
                item.id = n * 10 + line as u64 + 1;
            }
            bill
        })
        .collect();
    BillCollection { id: 1, bills }
}

/// Remote keys of the seeded reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seeded {
    /// Key of the CAD currency.
    pub currency: String,
    /// Key of the Vancouver location.
    pub location: String,
    /// Key of the Accounting department.
    pub department: String,
    /// Key of account 4000.
    pub account: String,
}

/// Stores the reference data the samples look up.
pub fn seed(server: &RemoteServer) -> ServerResult<Seeded> {
    Ok(Seeded {
        currency: save(
            server,
            resources::CURRENCY,
            json!({"name": "Canadian Dollar", "iso_code": "CAD"}),
        )?,
        location: save(server, resources::LOCATION, json!({"name": "Vancouver"}))?,
        department: save(server, resources::DEPARTMENT, json!({"name": "Accounting"}))?,
        account: save(
            server,
            resources::CHART_OF_ACCOUNTS,
            json!({"number": "4000", "name": "Office Supplies"}),
        )?,
    })
}

/// Stores `record` directly in the resource named `resource`.
pub fn save(server: &RemoteServer, resource: &str, record: Value) -> ServerResult<String> {
    let store = server
        .store(resource)
        .ok_or_else(|| ServerError::RouteNotFound(resource.to_string()))?;
    Ok(store.save(record)?)
}
