//! Entities as the tally remote sees them.
//!
//! Each type is built from its local counterpart with `from_local`,
//! which fills `remote_id` from the type's object map. Single entity
//! references serialize as `<field>_id` holding the referenced remote
//! id; bill items are embedded in the bill body.

use crate::database::{remote_id, ObjectMaps};
use crate::local;
use objsync_core::{Dependency, LocalId, RemoteIds, SyncEntity};
use objsync_engine::{EngineResult, SyncError};
use serde_json::{json, Map, Value};
use std::sync::Arc;

macro_rules! sync_identity {
    ($name:literal) => {
        fn entity_type(&self) -> &'static str {
            $name
        }

        fn local_id(&self) -> &LocalId {
            &self.local_id
        }

        fn remote_id(&self) -> Option<&str> {
            self.remote_id.as_deref()
        }
    };
}

/// Adds `<field>_id` references to a default serialization.
fn with_refs(mut body: Value, refs: &[(&str, Option<String>)]) -> Value {
    if let Value::Object(fields) = &mut body {
        for (field, id) in refs {
            fields.insert(format!("{field}_id"), json!(id));
        }
    }
    body
}

/// A currency. Read-only, looked up by `iso_code`.
#[derive(Debug, Clone)]
pub struct Currency {
    /// Local id.
    pub local_id: LocalId,
    /// Remote id.
    pub remote_id: Option<String>,
    /// Display name.
    pub name: String,
    /// ISO 4217 code.
    pub iso_code: String,
}

impl Currency {
    /// Builds the remote currency of `local`.
    pub fn from_local(local: &local::Currency, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        Ok(Arc::new(Self {
            local_id: local.id.into(),
            remote_id: remote_id(&maps.currency, local.id)?,
            name: local.name.clone(),
            iso_code: local.name.clone(),
        }))
    }
}

impl SyncEntity for Currency {
    sync_identity!("Currency");

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(self.name));
        fields.insert("iso_code".into(), json!(self.iso_code));
        fields
    }
}

/// A location. Read-only, looked up by `name`.
#[derive(Debug, Clone)]
pub struct Location {
    /// Local id.
    pub local_id: LocalId,
    /// Remote id.
    pub remote_id: Option<String>,
    /// Location name.
    pub name: String,
}

impl Location {
    /// Builds the remote location of `local`.
    pub fn from_local(local: &local::Location, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        Ok(Arc::new(Self {
            local_id: local.id.into(),
            remote_id: remote_id(&maps.location, local.id)?,
            name: local.name.clone(),
        }))
    }
}

impl SyncEntity for Location {
    sync_identity!("Location");

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(self.name));
        fields
    }
}

/// A department. Read-only, looked up by `name`.
#[derive(Debug, Clone)]
pub struct Department {
    /// Local id.
    pub local_id: LocalId,
    /// Remote id.
    pub remote_id: Option<String>,
    /// Department name.
    pub name: String,
}

impl Department {
    /// Builds the remote department of `local`.
    pub fn from_local(local: &local::Department, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        Ok(Arc::new(Self {
            local_id: local.id.into(),
            remote_id: remote_id(&maps.department, local.id)?,
            name: local.name.clone(),
        }))
    }
}

impl SyncEntity for Department {
    sync_identity!("Department");

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(self.name));
        fields
    }
}

/// A ledger account. Read-only, looked up by `number`.
///
/// Identified by the local account code, so every account sharing a
/// code maps to the same remote record.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    /// Local account code id.
    pub local_id: LocalId,
    /// Remote id.
    pub remote_id: Option<String>,
    /// Account number.
    pub number: String,
    /// Account name.
    pub name: String,
}

impl ChartOfAccounts {
    /// Builds the remote account of `local`.
    pub fn from_local(local: &local::Account, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        let code = &local.account_code;
        Ok(Arc::new(Self {
            local_id: code.id.into(),
            remote_id: remote_id(&maps.account_code, code.id)?,
            number: code.code.clone(),
            name: code.description.clone(),
        }))
    }
}

impl SyncEntity for ChartOfAccounts {
    sync_identity!("ChartOfAccounts");

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("number".into(), json!(self.number));
        fields.insert("name".into(), json!(self.name));
        fields
    }
}

/// A vendor at a location.
#[derive(Debug, Clone)]
pub struct Vendor {
    /// Local id.
    pub local_id: LocalId,
    /// Remote id.
    pub remote_id: Option<String>,
    /// Vendor name.
    pub name: String,
    /// Vendor location.
    pub location: Arc<Location>,
}

impl Vendor {
    /// Builds the remote vendor of `local`.
    ///
    /// The local currency has no remote counterpart on vendors and is dropped.
    pub fn from_local(local: &local::Vendor, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        Ok(Arc::new(Self {
            local_id: local.id.into(),
            remote_id: remote_id(&maps.vendor, local.id)?,
            name: local.name.clone(),
            location: Location::from_local(&local.location, maps)?,
        }))
    }
}

impl SyncEntity for Vendor {
    sync_identity!("Vendor");

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(self.name));
        fields
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::one(&self.location)]
    }

    fn serialize(&self, ids: &RemoteIds) -> Value {
        with_refs(
            base(self),
            &[("location", ids.resolve(self.location.as_ref()))],
        )
    }
}

/// A bill line, embedded in its bill.
#[derive(Debug, Clone)]
pub struct Item {
    /// Local id.
    pub local_id: LocalId,
    /// Always `None`; lines have no remote identity of their own.
    pub remote_id: Option<String>,
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: u32,
    /// Cost per unit.
    pub rate: u64,
    /// Line total.
    pub total: u64,
    /// Line currency.
    pub currency: Arc<Currency>,
}

impl Item {
    /// Builds the remote line of `local`.
    pub fn from_local(local: &local::Item, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        Ok(Arc::new(Self {
            local_id: local.id.into(),
            remote_id: None,
            description: local.description.clone(),
            quantity: local.quantity,
            rate: local.unit_cost,
            total: local.total(),
            currency: Currency::from_local(&local.currency, maps)?,
        }))
    }
}

impl SyncEntity for Item {
    sync_identity!("Item");

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("description".into(), json!(self.description));
        fields.insert("quantity".into(), json!(self.quantity));
        fields.insert("rate".into(), json!(self.rate));
        fields.insert("total".into(), json!(self.total));
        fields
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::one(&self.currency)]
    }

    fn serialize(&self, ids: &RemoteIds) -> Value {
        with_refs(
            base(self),
            &[("currency", ids.resolve(self.currency.as_ref()))],
        )
    }
}

/// A vendor bill.
#[derive(Debug, Clone)]
pub struct VendorBill {
    /// Local id.
    pub local_id: LocalId,
    /// Remote id.
    pub remote_id: Option<String>,
    /// Vendor invoice number.
    pub invoice: String,
    /// Account of the first line.
    pub account: Arc<ChartOfAccounts>,
    /// Billing vendor.
    pub vendor: Arc<Vendor>,
    /// Bill currency.
    pub currency: Arc<Currency>,
    /// Branch of the first line's department.
    pub location: Arc<Location>,
    /// Department of the first line.
    pub department: Arc<Department>,
    /// Bill lines.
    pub items: Vec<Arc<Item>>,
}

impl VendorBill {
    /// Builds the remote bill of `local`.
    ///
    /// Account, location and department are taken from the first line.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::Conversion`] if the bill has no lines.
    pub fn from_local(local: &local::Bill, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        let first = local.items.first().ok_or_else(|| SyncError::Conversion {
            local_type: "Bill",
            message: format!("bill {} has no items", local.id),
        })?;
        let department = &first.account.department;

        Ok(Arc::new(Self {
            local_id: local.id.into(),
            remote_id: remote_id(&maps.vendor_bill, local.id)?,
            invoice: local.invoice_number.clone(),
            account: ChartOfAccounts::from_local(&first.account, maps)?,
            vendor: Vendor::from_local(&local.vendor, maps)?,
            currency: Currency::from_local(&local.currency, maps)?,
            location: Location::from_local(&department.branch, maps)?,
            department: Department::from_local(department, maps)?,
            items: local
                .items
                .iter()
                .map(|item| Item::from_local(item, maps))
                .collect::<EngineResult<_>>()?,
        }))
    }
}

impl SyncEntity for VendorBill {
    sync_identity!("VendorBill");

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("invoice".into(), json!(self.invoice));
        fields
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::one(&self.account),
            Dependency::one(&self.vendor),
            Dependency::one(&self.currency),
            Dependency::one(&self.location),
            Dependency::one(&self.department),
            Dependency::many(&self.items),
        ]
    }

    fn serialize(&self, ids: &RemoteIds) -> Value {
        let mut body = with_refs(
            base(self),
            &[
                ("account", ids.resolve(self.account.as_ref())),
                ("vendor", ids.resolve(self.vendor.as_ref())),
                ("currency", ids.resolve(self.currency.as_ref())),
                ("location", ids.resolve(self.location.as_ref())),
                ("department", ids.resolve(self.department.as_ref())),
            ],
        );
        body["items"] = self.items.iter().map(|item| item.serialize(ids)).collect();
        body
    }
}

/// A batch of vendor bills.
///
/// Only a container: the tally API has no record for it, so the backend
/// declares it embedded and each bill is synced on its own.
#[derive(Debug, Clone)]
pub struct BillCollection {
    /// Local id.
    pub local_id: LocalId,
    /// Always `None`.
    pub remote_id: Option<String>,
    /// The bills.
    pub bills: Vec<Arc<VendorBill>>,
}

impl BillCollection {
    /// Builds the remote bills of `local`.
    pub fn from_local(local: &local::BillCollection, maps: &ObjectMaps) -> EngineResult<Arc<Self>> {
        Ok(Arc::new(Self {
            local_id: local.id.into(),
            remote_id: None,
            bills: local
                .bills
                .iter()
                .map(|bill| VendorBill::from_local(bill, maps))
                .collect::<EngineResult<_>>()?,
        }))
    }
}

impl SyncEntity for BillCollection {
    sync_identity!("BillCollection");

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::many(&self.bills)]
    }

    fn serialize(&self, ids: &RemoteIds) -> Value {
        json!({ "bills": self.bills.iter().map(|bill| bill.serialize(ids)).collect::<Vec<_>>() })
    }
}

/// The default body: ids plus scalar fields.
fn base(entity: &dyn SyncEntity) -> Value {
    let mut body = Map::new();
    body.insert("local_id".into(), json!(entity.local_id().as_str()));
    body.insert("remote_id".into(), json!(entity.remote_id()));
    body.extend(entity.fields());
    Value::Object(body)
}
