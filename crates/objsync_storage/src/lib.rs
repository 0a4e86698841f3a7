//! # objsync Storage
//!
//! Keyed record stores for objsync.
//!
//! This crate provides the lowest-level storage abstraction used by the
//! sync engine and by the mock remote system. Records are JSON objects
//! keyed by a primary field; stores do not interpret anything beyond the
//! declared field list.
//!
//! ## Design Principles
//!
//! - One [`Datastore`] per record type, each guarded by its own lock
//! - Reads never wait: a read against a store held by a writer fails with
//!   [`StorageError::Busy`], which callers treat as retryable
//! - Writes block until the lock is acquired
//! - No transactions across stores
//!
//! ## Available Stores
//!
//! - [`Datastore`] - Generic record store with field validation and key generation
//! - [`ObjectMap`] - Typed identity map from local ids to remote ids
//!
//! ## Example
//!
//! ```rust
//! use objsync_storage::{ObjectMap, ObjectMapping};
//!
//! let map = ObjectMap::new("Currency");
//! map.save(&ObjectMapping::new("1", "cad01")).unwrap();
//! let found = map.get_one("1").unwrap().unwrap();
//! assert_eq!(found.remote_id, "cad01");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod datastore;
mod error;
mod object_map;

pub use datastore::{Datastore, Record, DEFAULT_KEYSPACE, DIGITS, KEY_LENGTH};
pub use error::{StorageError, StorageResult};
pub use object_map::{ObjectMap, ObjectMapping};
