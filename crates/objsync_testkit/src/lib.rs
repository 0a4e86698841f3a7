//! # objsync testkit
//!
//! Test utilities for objsync.
//!
//! This crate provides:
//! - A generic entity type for building arbitrary graphs
//! - A backend over the recording [`MockRemote`](objsync_engine::MockRemote)
//! - A seeded tally world (API, backend, reference data)
//! - Random local bills
//! - Property-based generators of entity DAGs
//!
//! ## Usage
//!
//! ```rust
//! use objsync_testkit::prelude::*;
//!
//! let world = TallyWorld::seeded();
//! let events: Vec<_> = world
//!     .service()
//!     .sync(&objsync_tally::samples::cad(), objsync_tally::BACKEND_NAME)
//!     .unwrap()
//!     .collect();
//! assert_eq!(events.len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
