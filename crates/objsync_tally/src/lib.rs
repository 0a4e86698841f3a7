//! # objsync tally
//!
//! Integration backend for the tally accounting API.
//!
//! This crate provides:
//! - The local accounting model ([`local`])
//! - Its remote shapes with `from_local` conversions ([`entities`])
//! - Per-type object maps ([`ObjectMaps`])
//! - The tally API routes over the mock remote ([`server`])
//! - The [`TallyBackend`] registered as `"tally"`
//! - Sample data for demos and tests ([`samples`])
//!
//! ## Example
//!
//! ```
//! use objsync_engine::{Backends, SyncConfig, SyncService, SyncStatus};
//! use objsync_tally::{samples, server, TallyBackend, BACKEND_NAME};
//! use std::sync::Arc;
//!
//! let api = Arc::new(server::server());
//! samples::seed(&api).unwrap();
//!
//! let backends = Backends::new().with(Arc::new(TallyBackend::new(api)));
//! let service = SyncService::new(backends, SyncConfig::default());
//!
//! let last = service
//!     .sync(&samples::cad(), BACKEND_NAME)
//!     .unwrap()
//!     .last()
//!     .unwrap();
//! assert_eq!(last.status, SyncStatus::Completed);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod database;
pub mod entities;
pub mod local;
pub mod samples;
pub mod server;

pub use backend::{TallyBackend, BACKEND_NAME};
pub use database::ObjectMaps;
