//! # objsync Core
//!
//! Entity model and dependency ordering for objsync.
//!
//! This crate provides:
//! - The [`SyncEntity`] capability implemented by every remote-shaped entity
//! - Identity types ([`LocalId`], [`EntityKey`])
//! - The graph builder, which deduplicates shared sub-entities by identity
//! - The dependency resolver, which linearizes a graph into a sync order
//!
//! ## Key Invariants
//!
//! - Two entities with the same type and local id are the same entity
//!   for graph purposes, whatever their other fields hold
//! - A graph never holds two nodes for the same [`EntityKey`]
//! - In a resolved order every dependency precedes its dependents
//! - Dependency cycles are rejected, never silently closed
//!
//! ## Example
//!
//! ```rust,ignore
//! use objsync_core::sync_order;
//!
//! let order = sync_order(bill)?;
//! for entity in &order {
//!     println!("{}", entity.key());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod entity;
mod error;
pub mod graph;

pub use entity::{Dependency, EntityKey, LocalId, RemoteIds, SyncEntity};
pub use error::{GraphError, GraphResult};
pub use graph::{build_graph, resolve_order, sync_order, DependencyGraph, Node, NodeId};
