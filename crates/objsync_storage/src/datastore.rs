//! Generic keyed record store.

use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use rand::Rng;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A stored record: a JSON object keyed by field name.
pub type Record = Map<String, Value>;

/// Default alphabet for generated keys.
pub const DEFAULT_KEYSPACE: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Digits-only alphabet for generated keys.
pub const DIGITS: &str = "0123456789";

/// Length of generated keys.
pub const KEY_LENGTH: usize = 6;

#[derive(Debug, Default)]
struct Records {
    by_key: HashMap<String, Record>,
    /// Keys in insertion order.
    order: Vec<String>,
}

impl Records {
    fn upsert(&mut self, key: String, record: Record) {
        if self.by_key.insert(key.clone(), record).is_none() {
            self.order.push(key);
        }
    }

    fn remove(&mut self, key: &str) {
        if self.by_key.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Record> {
        self.order.iter().filter_map(|k| self.by_key.get(k))
    }
}

/// An in-memory record store with a declared field list.
///
/// Every record must carry all declared fields except the primary key,
/// which is generated when absent. The store is guarded by a single lock:
///
/// - reads (`retrieve*`, `find`) use `try_lock` and fail with
///   [`StorageError::Busy`] while a writer holds the lock
/// - writes (`save`, `remove`, `reset`) block until the lock is free
///
/// # Example
///
/// ```rust
/// use objsync_storage::Datastore;
/// use serde_json::json;
///
/// let store = Datastore::new("Currency", &["id", "name", "iso_code"]);
/// let key = store.save(json!({"name": "Canadian Dollar", "iso_code": "CAD"})).unwrap();
///
/// let record = store.retrieve(&key).unwrap().unwrap();
/// assert_eq!(record["iso_code"], "CAD");
/// ```
#[derive(Debug)]
pub struct Datastore {
    name: String,
    fields: Vec<String>,
    pk: String,
    keyspace: Vec<char>,
    records: Mutex<Records>,
}

impl Datastore {
    /// Creates a store with the given display name and declared fields.
    ///
    /// The primary key defaults to `"id"` and generated keys are drawn
    /// from [`DEFAULT_KEYSPACE`].
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            pk: "id".to_string(),
            keyspace: DEFAULT_KEYSPACE.chars().collect(),
            records: Mutex::new(Records::default()),
        }
    }

    /// Sets the primary key field.
    #[must_use]
    pub fn with_primary_key(mut self, pk: impl Into<String>) -> Self {
        self.pk = pk.into();
        self
    }

    /// Sets the alphabet used for generated keys.
    ///
    /// An empty alphabet is ignored.
    #[must_use]
    pub fn with_keyspace(mut self, keyspace: &str) -> Self {
        if !keyspace.is_empty() {
            self.keyspace = keyspace.chars().collect();
        }
        self
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primary key field.
    pub fn primary_key(&self) -> &str {
        &self.pk
    }

    /// Returns the declared fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the number of records. Waits for any writer to finish.
    pub fn len(&self) -> usize {
        self.records.lock().by_key.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the record stored under `key`, or `None` if absent.
    pub fn retrieve(&self, key: &str) -> StorageResult<Option<Record>> {
        let records = self.try_read()?;
        Ok(records.by_key.get(key).cloned())
    }

    /// Returns the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`StorageError::KeyNotFound`] if no record exists.
    pub fn retrieve_strict(&self, key: &str) -> StorageResult<Record> {
        self.retrieve(key)?.ok_or_else(|| StorageError::KeyNotFound {
            store: self.name.clone(),
            key: key.to_string(),
        })
    }

    /// Returns all records in insertion order.
    pub fn retrieve_all(&self) -> StorageResult<Vec<Record>> {
        let records = self.try_read()?;
        let all = records.iter().cloned().collect();
        Ok(all)
    }

    /// Returns the first record (in insertion order) whose `field` equals `value`.
    pub fn find(&self, field: &str, value: &Value) -> StorageResult<Option<Record>> {
        let records = self.try_read()?;
        let found = records
            .iter()
            .find(|record| record.get(field) == Some(value))
            .cloned();
        Ok(found)
    }

    /// Inserts or replaces a record and returns its key.
    ///
    /// When the body has no primary key a fresh key is generated and
    /// written into the stored record.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Malformed`] if the body is not a JSON object or
    ///   its primary key is neither a string nor a number
    /// - [`StorageError::MissingField`] if a declared field is absent
    pub fn save(&self, body: Value) -> StorageResult<String> {
        let mut record = self.validate(body)?;

        let mut records = self.records.lock();
        let key = match record.get(&self.pk) {
            Some(Value::String(key)) => key.clone(),
            Some(Value::Number(key)) => key.to_string(),
            Some(other) => {
                return Err(StorageError::Malformed(format!(
                    "primary key '{}' must be a string or number, got {}",
                    self.pk, other
                )))
            }
            None => {
                let key = self.unused_key(&records);
                record.insert(self.pk.clone(), Value::String(key.clone()));
                key
            }
        };

        records.upsert(key.clone(), record);
        Ok(key)
    }

    /// Removes the record stored under `key`. Absent keys are ignored.
    pub fn remove(&self, key: &str) {
        self.records.lock().remove(key);
    }

    /// Removes every record.
    pub fn reset(&self) {
        *self.records.lock() = Records::default();
    }

    fn try_read(&self) -> StorageResult<parking_lot::MutexGuard<'_, Records>> {
        self.records.try_lock().ok_or_else(|| StorageError::Busy {
            store: self.name.clone(),
        })
    }

    fn validate(&self, body: Value) -> StorageResult<Record> {
        let Value::Object(record) = body else {
            return Err(StorageError::Malformed(
                "values must be JSON objects".to_string(),
            ));
        };

        for field in self.fields.iter().filter(|f| **f != self.pk) {
            if !record.contains_key(field) {
                return Err(StorageError::MissingField {
                    field: field.clone(),
                });
            }
        }

        Ok(record)
    }

    fn generate_key(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..KEY_LENGTH)
            .map(|_| self.keyspace[rng.gen_range(0..self.keyspace.len())])
            .collect::<String>()
            .to_lowercase()
    }

    fn unused_key(&self, records: &Records) -> String {
        loop {
            let key = self.generate_key();
            if !records.by_key.contains_key(&key) {
                return key;
            }
        }
    }
}

impl fmt::Display for Datastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.len();
        let plural = if count == 1 { "" } else { "s" };
        write!(f, "<{} Datastore: {} record{}>", self.name, count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn currency_store() -> Datastore {
        Datastore::new("Currency", &["id", "name", "iso_code"])
    }

    #[test]
    fn save_generates_key_when_absent() {
        let store = currency_store();
        let key = store
            .save(json!({"name": "US Dollar", "iso_code": "USD"}))
            .unwrap();

        assert_eq!(key.len(), KEY_LENGTH);
        let record = store.retrieve(&key).unwrap().unwrap();
        assert_eq!(record["id"], json!(key));
    }

    #[test]
    fn save_uses_existing_primary_key() {
        let store = currency_store();
        let key = store
            .save(json!({"id": "cad", "name": "Canadian Dollar", "iso_code": "CAD"}))
            .unwrap();
        assert_eq!(key, "cad");

        let key = store
            .save(json!({"id": 7, "name": "Pound", "iso_code": "GBP"}))
            .unwrap();
        assert_eq!(key, "7");
    }

    #[test]
    fn save_upserts() {
        let store = currency_store();
        store
            .save(json!({"id": "a", "name": "Old", "iso_code": "CAD"}))
            .unwrap();
        store
            .save(json!({"id": "a", "name": "New", "iso_code": "CAD"}))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.retrieve("a").unwrap().unwrap()["name"], "New");
    }

    #[test]
    fn save_missing_field_fails() {
        let store = currency_store();
        let result = store.save(json!({"name": "Canadian Dollar"}));
        assert!(matches!(
            result,
            Err(StorageError::MissingField { ref field }) if field == "iso_code"
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn save_non_object_fails() {
        let store = currency_store();
        let result = store.save(json!(["CAD"]));
        assert!(matches!(result, Err(StorageError::Malformed(_))));
    }

    #[test]
    fn retrieve_all_empty_store() {
        let store = currency_store();
        assert!(store.retrieve_all().unwrap().is_empty());
    }

    #[test]
    fn retrieve_all_keeps_insertion_order() {
        let store = currency_store();
        for code in ["CAD", "USD", "GBP"] {
            store.save(json!({"name": code, "iso_code": code})).unwrap();
        }

        let codes: Vec<_> = store
            .retrieve_all()
            .unwrap()
            .into_iter()
            .map(|r| r["iso_code"].clone())
            .collect();
        assert_eq!(codes, vec![json!("CAD"), json!("USD"), json!("GBP")]);
    }

    #[test]
    fn retrieve_missing_key() {
        let store = currency_store();
        assert!(store.retrieve("nope").unwrap().is_none());
        assert!(matches!(
            store.retrieve_strict("nope"),
            Err(StorageError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn find_by_field() {
        let store = currency_store();
        store
            .save(json!({"name": "Canadian Dollar", "iso_code": "CAD"}))
            .unwrap();
        store
            .save(json!({"name": "British Pound", "iso_code": "GBP"}))
            .unwrap();

        let found = store.find("iso_code", &json!("GBP")).unwrap().unwrap();
        assert_eq!(found["name"], "British Pound");
        assert!(store.find("iso_code", &json!("JPY")).unwrap().is_none());
    }

    #[test]
    fn find_returns_first_match_in_insertion_order() {
        let store = currency_store();
        let first = store
            .save(json!({"name": "Canadian Dollar", "iso_code": "CAD"}))
            .unwrap();
        store
            .save(json!({"name": "Loonie", "iso_code": "CAD"}))
            .unwrap();

        let found = store.find("iso_code", &json!("CAD")).unwrap().unwrap();
        assert_eq!(found["id"], json!(first));
        assert_eq!(found["name"], "Canadian Dollar");
        assert!(store.find("symbol", &json!("CAD")).unwrap().is_none());
    }

    #[test]
    fn reads_fail_while_locked() {
        let store = currency_store();
        let key = store
            .save(json!({"name": "Canadian Dollar", "iso_code": "CAD"}))
            .unwrap();

        let guard = store.records.lock();
        let err = store.retrieve(&key).unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(store.retrieve_all(), Err(StorageError::Busy { .. })));
        drop(guard);

        assert!(store.retrieve(&key).unwrap().is_some());
    }

    #[test]
    fn remove_and_reset() {
        let store = currency_store();
        let a = store.save(json!({"name": "A", "iso_code": "AAA"})).unwrap();
        let b = store.save(json!({"name": "B", "iso_code": "BBB"})).unwrap();

        store.remove(&a);
        store.remove("missing");
        assert_eq!(store.len(), 1);

        store.reset();
        assert!(store.retrieve(&b).unwrap().is_none());
        assert!(store.retrieve_all().unwrap().is_empty());
    }

    #[test]
    fn display_counts_records() {
        let store = currency_store();
        assert_eq!(store.to_string(), "<Currency Datastore: 0 records>");
        store.save(json!({"name": "A", "iso_code": "AAA"})).unwrap();
        assert_eq!(store.to_string(), "<Currency Datastore: 1 record>");
    }

    proptest! {
        #[test]
        fn generated_keys_use_keyspace(count in 1usize..20) {
            let store = Datastore::new("Vendor", &["id", "name"]).with_keyspace(DIGITS);
            for i in 0..count {
                let key = store.save(json!({"name": format!("vendor {i}")})).unwrap();
                prop_assert!(key.chars().all(|c| c.is_ascii_digit()));
                prop_assert_eq!(key.len(), KEY_LENGTH);
            }
            prop_assert_eq!(store.len(), count);
        }
    }
}
