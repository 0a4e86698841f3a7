//! Resources served by the mock remote.

use crate::error::{ServerError, ServerResult};
use crate::router::Target;
use objsync_storage::{Datastore, Record};
use serde_json::{Number, Value};

/// A record store exposed through the API.
#[derive(Debug)]
pub struct Resource {
    store: Datastore,
    writable: bool,
}

impl Resource {
    /// Creates a resource that accepts new records.
    pub fn writable(store: Datastore) -> Self {
        Self {
            store,
            writable: true,
        }
    }

    /// Creates a resource that can only be read.
    pub fn read_only(store: Datastore) -> Self {
        Self {
            store,
            writable: false,
        }
    }

    /// Returns the record store.
    pub fn store(&self) -> &Datastore {
        &self.store
    }

    /// Returns true if the resource accepts new records.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Answers a `GET` on `target`.
    ///
    /// A collection answers every record as an array.
    pub fn get(&self, target: &Target, numeric_queries: bool) -> ServerResult<Value> {
        match target {
            Target::Collection => Ok(Value::Array(
                self.store
                    .retrieve_all()?
                    .into_iter()
                    .map(Value::Object)
                    .collect(),
            )),
            Target::Key(key) => self
                .store
                .retrieve(key)?
                .map(Value::Object)
                .ok_or_else(|| self.not_found(self.store.primary_key(), key)),
            Target::Query { field, value } => self
                .search(field, value, numeric_queries)?
                .map(Value::Object)
                .ok_or_else(|| self.not_found(field, value)),
        }
    }

    /// Answers a `POST` of `body` on `target`, returning the new key.
    pub fn post(&self, target: &Target, body: Option<&Value>) -> ServerResult<String> {
        if !self.writable || *target != Target::Collection {
            return Err(ServerError::MethodNotAllowed);
        }
        let body = body.ok_or_else(|| ServerError::InvalidRequest("missing body".into()))?;
        Ok(self.store.save(body.clone())?)
    }

    fn search(&self, field: &str, value: &str, numeric: bool) -> ServerResult<Option<Record>> {
        if let Some(record) = self.store.find(field, &Value::String(value.to_string()))? {
            return Ok(Some(record));
        }
        let number = numeric
            .then(|| value.parse::<i64>().ok().map(Number::from))
            .flatten();
        match number {
            Some(number) => Ok(self.store.find(field, &Value::Number(number))?),
            None => Ok(None),
        }
    }

    fn not_found(&self, field: &str, value: &str) -> ServerError {
        ServerError::NotFound {
            resource: self.store.name().to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
