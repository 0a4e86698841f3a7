//! Remote client abstraction.

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A response from the remote system.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP-like status code.
    pub status: u16,
    /// Response body.
    pub body: Value,
}

impl Response {
    /// The only success status.
    pub const OK: u16 = 200;

    /// Creates a response.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Creates a successful response.
    pub fn ok(body: Value) -> Self {
        Self::new(Self::OK, body)
    }

    /// Returns true for status 200.
    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }

    /// Renders the body as a message. Strings are returned unquoted.
    pub fn body_text(&self) -> String {
        match &self.body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// A client for one remote endpoint.
///
/// Implementations perform the call to completion before returning;
/// transport failures are reported as non-200 responses.
pub trait RemoteClient: Send + Sync {
    /// The endpoint this client talks to.
    fn endpoint(&self) -> &str;

    /// Creates a remote record from `body`.
    fn send(&self, body: &Value) -> Response;

    /// Fetches the record stored under `key`.
    fn retrieve(&self, key: &str) -> Response;

    /// Finds the first record whose `field` equals `value`.
    fn search(&self, field: &str, value: &str) -> Response;
}

/// Builds clients for the endpoints of one backend.
pub trait RemoteConnector: Send + Sync {
    /// Returns a client for `endpoint`.
    fn connect(&self, endpoint: &str) -> Box<dyn RemoteClient>;
}

/// A call made against a remote client.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    /// `send` with its body.
    Send(Value),
    /// `retrieve` with its key.
    Retrieve(String),
    /// `search` with its field and value.
    Search {
        /// Field searched on.
        field: String,
        /// Value searched for.
        value: String,
    },
}

impl RemoteCall {
    fn operation(&self) -> Operation {
        match self {
            RemoteCall::Send(_) => Operation::Send,
            RemoteCall::Retrieve(_) => Operation::Retrieve,
            RemoteCall::Search { .. } => Operation::Search,
        }
    }
}

/// A call together with the endpoint it was made against.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Endpoint of the client.
    pub endpoint: String,
    /// The call.
    pub call: RemoteCall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Operation {
    Send,
    Retrieve,
    Search,
}

/// A recording remote for testing.
///
/// Responses are configured per endpoint and operation; unconfigured
/// calls answer 404. Every call is recorded in order.
#[derive(Debug, Default)]
pub struct MockRemote {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<HashMap<(String, Operation), Response>>,
}

impl MockRemote {
    /// Creates a mock remote with no configured responses.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Sets the response to `send` calls on `endpoint`.
    pub fn set_send_response(&self, endpoint: &str, response: Response) {
        self.set_response(endpoint, Operation::Send, response);
    }

    /// Sets the response to `retrieve` calls on `endpoint`.
    pub fn set_retrieve_response(&self, endpoint: &str, response: Response) {
        self.set_response(endpoint, Operation::Retrieve, response);
    }

    /// Sets the response to `search` calls on `endpoint`.
    pub fn set_search_response(&self, endpoint: &str, response: Response) {
        self.set_response(endpoint, Operation::Search, response);
    }

    /// Returns every recorded call.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns the calls made against `endpoint`.
    pub fn calls_to(&self, endpoint: &str) -> Vec<RemoteCall> {
        self.calls
            .lock()
            .iter()
            .filter(|recorded| recorded.endpoint == endpoint)
            .map(|recorded| recorded.call.clone())
            .collect()
    }

    /// Returns the bodies sent to `endpoint`.
    pub fn sent_to(&self, endpoint: &str) -> Vec<Value> {
        self.calls_to(endpoint)
            .into_iter()
            .filter_map(|call| match call {
                RemoteCall::Send(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn set_response(&self, endpoint: &str, operation: Operation, response: Response) {
        self.responses
            .lock()
            .insert((endpoint.to_string(), operation), response);
    }

    fn call(&self, endpoint: &str, call: RemoteCall) -> Response {
        let response = self
            .responses
            .lock()
            .get(&(endpoint.to_string(), call.operation()))
            .cloned()
            .unwrap_or_else(|| Response::new(404, json!({"error": "no mock response set"})));
        self.calls.lock().push(RecordedCall {
            endpoint: endpoint.to_string(),
            call,
        });
        response
    }
}

impl RemoteConnector for Arc<MockRemote> {
    fn connect(&self, endpoint: &str) -> Box<dyn RemoteClient> {
        Box::new(MockClient {
            endpoint: endpoint.to_string(),
            remote: Arc::clone(self),
        })
    }
}

struct MockClient {
    endpoint: String,
    remote: Arc<MockRemote>,
}

impl RemoteClient for MockClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, body: &Value) -> Response {
        self.remote
            .call(&self.endpoint, RemoteCall::Send(body.clone()))
    }

    fn retrieve(&self, key: &str) -> Response {
        self.remote
            .call(&self.endpoint, RemoteCall::Retrieve(key.to_string()))
    }

    fn search(&self, field: &str, value: &str) -> Response {
        self.remote.call(
            &self.endpoint,
            RemoteCall::Search {
                field: field.to_string(),
                value: value.to_string(),
            },
        )
    }
}
