//! Error types for delegated membership updates.

use alloy_primitives::Address;
use permset_auth::AuthError;
use thiserror::Error;

/// Reasons a delegated update is rejected.
///
/// Every variant leaves the whitelist and blacklist exactly as they were
/// before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionError {
	/// Malformed, malleable or unrecoverable signature
	#[error("Invalid signature")]
	InvalidSignature,

	/// Signature recovered to an account other than the authority
	#[error("Signer {signer} is not the authority")]
	Unauthorized { signer: Address },

	/// Lists violate the configured membership policy
	#[error("Invalid membership: {0}")]
	InvalidMembership(String),
}

impl From<AuthError> for PermissionError {
	fn from(err: AuthError) -> Self {
		match err {
			AuthError::InvalidSignature => PermissionError::InvalidSignature,
			AuthError::Unauthorized(signer) => PermissionError::Unauthorized { signer },
		}
	}
}
