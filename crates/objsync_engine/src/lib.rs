//! # objsync engine
//!
//! Per-entity sync state machine and run orchestration.
//!
//! This crate provides:
//! - The [`RemoteClient`] interface and a recording [`MockRemote`]
//! - Backend mapping tables ([`BackendMapping`])
//! - The per-entity state machine ([`SyncEngine::sync`])
//! - The pull-based progress stream ([`SyncRun`])
//! - The backend registry and entry point ([`Backends`], [`SyncService`])
//!
//! ## Flow
//!
//! 1. The backend converts a local entity into its remote-shaped value
//! 2. The dependency graph of that value is built and resolved
//! 3. Each entity in the resolved order is synced, emitting
//!    `Created`, `InProgress` and a terminal status
//!
//! ## Key Invariants
//!
//! - An entity with a non-empty `remote_id` is never re-created unless forced
//! - Read-only types are only ever looked up, never sent
//! - A successful sync always records the identity pair in the type's object map
//! - Entities are synced strictly in dependency order

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod client;
mod config;
mod engine;
mod error;
mod mapping;
mod run;

pub use backend::{Backend, Backends, SyncService};
pub use client::{MockRemote, RecordedCall, RemoteCall, RemoteClient, RemoteConnector, Response};
pub use config::{FailurePolicy, SyncConfig};
pub use engine::{EntityState, SyncEngine, SyncResult, SyncStatus};
pub use error::{EngineResult, SyncError};
pub use mapping::{BackendMapping, LocalEntity};
pub use run::{RunStats, SyncRun};
