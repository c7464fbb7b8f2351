//! Error types for signer recovery and authorization.

use alloy_primitives::Address;
use thiserror::Error;

/// Errors that can occur while authenticating a delegated update.
///
/// Recovery failures are deliberately collapsed into one variant so that
/// callers learn nothing about which check a forged signature tripped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
	/// Malformed, malleable or unrecoverable signature
	#[error("Invalid signature")]
	InvalidSignature,

	/// Signature recovered to an account other than the authority
	#[error("Address {0} is not authorized")]
	Unauthorized(Address),
}
