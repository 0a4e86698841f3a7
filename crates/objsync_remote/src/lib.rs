//! # objsync remote
//!
//! An in-process mock of a remote record API.
//!
//! This crate provides:
//! - Per-resource record stores behind a path router
//! - `GET /<resource>/<key>` and `GET /<resource>/?<field>=<value>`
//! - `POST /<resource>` creating a record and answering its key
//! - Read-only resources that reject `POST` with 405
//! - A loopback [`RemoteConnector`](objsync_engine::RemoteConnector) talking to the server
//!
//! Every request answers a `(status, body)` pair; failures carry an
//! `{"error": ...}` body.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod loopback;
mod resource;
mod router;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use loopback::LoopbackConnector;
pub use resource::Resource;
pub use router::{Method, Route, Router, Target};
pub use server::RemoteServer;
