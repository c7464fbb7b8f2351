//! Authentication for signature-delegated permission updates.
//!
//! This crate recovers the signer of an EIP-712 digest and decides whether
//! that signer is the authority of an instance.
//!
//! # Security Model
//!
//! - Only `v` values 27 and 28 are accepted
//! - High-`s` signatures are rejected, never normalized
//! - Every recovery failure surfaces as the same opaque error
//! - Authorization is a plain identity comparison against one authority

pub mod access;
pub mod error;
pub mod signature;

pub use access::{authorize, AccessController};
pub use error::AuthError;
pub use signature::{recover, Secp256k1Verifier, SignatureVerifier, SECP256K1N_HALF};

#[cfg(feature = "testing")]
pub use signature::MockSignatureVerifier;
