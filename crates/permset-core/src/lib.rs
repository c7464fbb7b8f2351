//! Core of the permissioned set.
//!
//! This crate holds the stateful instance that owns a whitelist and a
//! blacklist and replaces them only when presented with the authority's
//! signature, along with the deployment context, storage policy and event
//! bus it is assembled from.

/// Chain id and address an instance is bound to.
pub mod chain;
/// Errors returned by delegated updates.
pub mod error;
/// Broadcast channel for membership events.
pub mod event_bus;
/// Handling of duplicate and overlapping entries.
pub mod policy;
/// The permissioned set itself.
pub mod set;

pub use chain::ChainContext;
pub use error::PermissionError;
pub use event_bus::EventBus;
pub use policy::MembershipPolicy;
pub use set::{MembershipUpdate, PermissionedSet};
