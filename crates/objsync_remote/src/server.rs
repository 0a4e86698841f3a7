//! The mock remote server.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::resource::Resource;
use crate::router::{Method, Router};
use objsync_storage::Datastore;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// An in-process remote API.
///
/// Each resource is a [`Datastore`] reachable under a path prefix.
/// Requests are answered synchronously with a status code and a JSON
/// body.
///
/// # Example
///
/// ```
/// use objsync_remote::RemoteServer;
/// use serde_json::json;
///
/// let server = RemoteServer::default()
///     .with_read_only("/currencies", "Currency", &["id", "name", "iso_code"])
///     .with_writable("/vendors", "Vendor", &["id", "name", "location_id"]);
///
/// let (status, _) = server.handle_request("POST", "/currencies", Some(&json!({})));
/// assert_eq!(status, 405);
///
/// let (status, key) = server.handle_request(
///     "POST",
///     "/vendors",
///     Some(&json!({"name": "Acme", "location_id": null})),
/// );
/// assert_eq!(status, 200);
/// assert!(key.is_string());
/// ```
#[derive(Debug)]
pub struct RemoteServer {
    config: ServerConfig,
    router: Router,
    resources: HashMap<String, Resource>,
}

impl RemoteServer {
    /// Creates a server without resources.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: Router::new(),
            resources: HashMap::new(),
        }
    }

    /// Adds a resource accepting new records.
    pub fn with_writable(self, prefix: &str, name: &str, fields: &[&str]) -> Self {
        let store = self.store_for(name, fields);
        self.with_resource(prefix, name, Resource::writable(store))
    }

    /// Adds a resource that can only be read.
    pub fn with_read_only(self, prefix: &str, name: &str, fields: &[&str]) -> Self {
        let store = self.store_for(name, fields);
        self.with_resource(prefix, name, Resource::read_only(store))
    }

    /// Adds `resource` as `name` under `prefix`.
    pub fn with_resource(mut self, prefix: &str, name: &str, resource: Resource) -> Self {
        self.router.register(prefix, name);
        self.resources.insert(name.to_string(), resource);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the resource named `name`.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Returns the record store of the resource named `name`.
    pub fn store(&self, name: &str) -> Option<&Datastore> {
        self.resource(name).map(Resource::store)
    }

    /// Removes every record of every resource.
    pub fn reset(&self) {
        for resource in self.resources.values() {
            resource.store().reset();
        }
    }

    /// Handles a request and answers `(status, body)`.
    ///
    /// Failures answer their status with an `{"error": ...}` body.
    pub fn handle_request(&self, method: &str, route: &str, body: Option<&Value>) -> (u16, Value) {
        let result = method
            .parse::<Method>()
            .and_then(|method| self.handle(method, route, body));
        match result {
            Ok(body) => (200, body),
            Err(err) => {
                debug!("{} {} failed: {}", method, route, err);
                (err.status(), err.body())
            }
        }
    }

    /// Handles a parsed request.
    ///
    /// `POST` answers the new record's key as a JSON string.
    pub fn handle(&self, method: Method, route: &str, body: Option<&Value>) -> ServerResult<Value> {
        let (route_entry, target) = self.router.resolve(route)?;
        let resource = self
            .resources
            .get(&route_entry.resource)
            .ok_or_else(|| ServerError::RouteNotFound(route.to_string()))?;
        debug!("{} {} -> {} {:?}", method, route, route_entry.resource, target);

        match method {
            Method::Get => resource.get(&target, self.config.numeric_queries),
            Method::Post => resource.post(&target, body).map(Value::String),
        }
    }

    fn store_for(&self, name: &str, fields: &[&str]) -> Datastore {
        Datastore::new(name, fields).with_keyspace(&self.config.keyspace)
    }
}

impl Default for RemoteServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
