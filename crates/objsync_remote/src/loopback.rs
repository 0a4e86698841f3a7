//! Remote clients talking to an in-process server.

use crate::server::RemoteServer;
use objsync_engine::{RemoteClient, RemoteConnector, Response};
use serde_json::Value;
use std::sync::Arc;

/// Connects remote clients to a shared [`RemoteServer`].
#[derive(Debug, Clone)]
pub struct LoopbackConnector {
    server: Arc<RemoteServer>,
}

impl LoopbackConnector {
    /// Creates a connector for `server`.
    pub fn new(server: Arc<RemoteServer>) -> Self {
        Self { server }
    }

    /// Returns the server.
    pub fn server(&self) -> &Arc<RemoteServer> {
        &self.server
    }
}

impl RemoteConnector for LoopbackConnector {
    fn connect(&self, endpoint: &str) -> Box<dyn RemoteClient> {
        Box::new(LoopbackClient {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            server: Arc::clone(&self.server),
        })
    }
}

struct LoopbackClient {
    endpoint: String,
    server: Arc<RemoteServer>,
}

impl LoopbackClient {
    fn request(&self, method: &str, route: &str, body: Option<&Value>) -> Response {
        let (status, body) = self.server.handle_request(method, route, body);
        Response::new(status, body)
    }
}

impl RemoteClient for LoopbackClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, body: &Value) -> Response {
        self.request("POST", &self.endpoint, Some(body))
    }

    fn retrieve(&self, key: &str) -> Response {
        let route = format!("{}/{}", self.endpoint, urlencoding::encode(key));
        self.request("GET", &route, None)
    }

    fn search(&self, field: &str, value: &str) -> Response {
        let route = format!(
            "{}/?{}={}",
            self.endpoint,
            urlencoding::encode(field),
            urlencoding::encode(value)
        );
        self.request("GET", &route, None)
    }
}
