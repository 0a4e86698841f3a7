//! Entities as the local system owns them.

use serde::{Deserialize, Serialize};

/// A currency. `name` holds the ISO code, e.g. `"CAD"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// Local id.
    pub id: u64,
    /// ISO code.
    pub name: String,
    /// Exchange rate to the home currency.
    pub rate: f64,
}

/// A branch location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Local id.
    pub id: u64,
    /// Location name.
    pub name: String,
    /// Currency used at the location.
    pub local_currency: Currency,
}

/// A department of a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    /// Local id.
    pub id: u64,
    /// Department name.
    pub name: String,
    /// Owning branch.
    pub branch: Location,
}

/// A ledger account code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCode {
    /// Local id.
    pub id: u64,
    /// Account number.
    pub code: String,
    /// Account description.
    pub description: String,
}

/// An account code booked by a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Local id.
    pub id: u64,
    /// Account code.
    pub account_code: AccountCode,
    /// Booking department.
    pub department: Department,
}

/// A supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Local id.
    pub id: u64,
    /// Vendor name.
    pub name: String,
    /// Billing currency.
    pub currency: Currency,
    /// Vendor location.
    pub location: Location,
}

/// A bill line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Local id.
    pub id: u64,
    /// Account the line is booked to.
    pub account: Account,
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: u32,
    /// Cost per unit.
    pub unit_cost: u64,
    /// Line currency.
    pub currency: Currency,
}

impl Item {
    /// Line total.
    pub fn total(&self) -> u64 {
        u64::from(self.quantity) * self.unit_cost
    }
}

/// A vendor bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Local id.
    pub id: u64,
    /// Vendor invoice number.
    pub invoice_number: String,
    /// Billing vendor.
    pub vendor: Vendor,
    /// Bill currency.
    pub currency: Currency,
    /// Bill lines.
    pub items: Vec<Item>,
}

impl Bill {
    /// Sum of the line totals.
    pub fn total(&self) -> u64 {
        self.items.iter().map(Item::total).sum()
    }
}

/// A batch of bills synced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillCollection {
    /// Local id.
    pub id: u64,
    /// The bills.
    pub bills: Vec<Bill>,
}
