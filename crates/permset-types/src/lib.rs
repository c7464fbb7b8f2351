//! Common types for signature-delegated permissioned sets.
//!
//! This crate defines the values exchanged between an authority signing a
//! membership update off-chain, the relayer submitting it and the instance
//! verifying it, together with the EIP-712 encoding all three agree on.

/// EIP-712 domain binding signatures to one instance.
pub mod domain;
/// Event types published on membership changes.
pub mod events;
/// Permission requests and their signed form.
pub mod request;
/// Recoverable signature components.
pub mod signature;
/// Typed-data encoding and formatting helpers.
pub mod utils;

pub use alloy_primitives::{Address, B256};
pub use domain::{DomainContext, DOMAIN_VERSION};
pub use events::PermissionEvent;
pub use request::{PermissionRequest, SignedPermission};
pub use signature::{SignatureFormatError, SignatureParts, SIGNATURE_LENGTH};
pub use utils::{typed_data_digest, without_0x_prefix};
