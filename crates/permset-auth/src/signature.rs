//! Signer recovery for EIP-712 digests.
//!
//! Recovers the account that produced a `(v, r, s)` signature over a
//! 32-byte digest. Signatures are checked for a valid recovery parameter
//! and a canonical (low) `s` before any curve arithmetic runs.

use alloy_primitives::{b256, Address, Signature, B256, U256};
use permset_types::SignatureParts;

use crate::error::AuthError;

/// Half the secp256k1 group order. Any `s` above this is the malleable twin
/// of a canonical signature.
pub const SECP256K1N_HALF: B256 =
	b256!("7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0");

/// Recovers signing identities from digests and signatures.
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait SignatureVerifier: Send + Sync {
	/// Returns the account that signed `digest`, or
	/// [`AuthError::InvalidSignature`] when none can be recovered.
	fn recover(&self, digest: &B256, signature: &SignatureParts) -> Result<Address, AuthError>;
}

/// secp256k1 ECDSA recovery, as performed by `ecrecover`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
	fn recover(&self, digest: &B256, signature: &SignatureParts) -> Result<Address, AuthError> {
		recover(digest, signature)
	}
}

/// Recover the signer of a pre-hashed digest.
///
/// # Errors
///
/// Returns [`AuthError::InvalidSignature`] when:
/// - `v` is not 27 or 28
/// - `s` is greater than half the curve order
/// - no public key can be recovered from `(r, s)`
pub fn recover(digest: &B256, signature: &SignatureParts) -> Result<Address, AuthError> {
	let Some(y_parity) = signature.y_parity() else {
		tracing::debug!(v = signature.v, "Rejected signature recovery parameter");
		return Err(AuthError::InvalidSignature);
	};

	// B256 orders bytewise, which is numeric order for big-endian words.
	if signature.s > SECP256K1N_HALF {
		tracing::debug!("Rejected high-s signature");
		return Err(AuthError::InvalidSignature);
	}

	let sig = Signature::new(
		U256::from_be_bytes(signature.r.0),
		U256::from_be_bytes(signature.s.0),
		y_parity,
	);

	sig.recover_address_from_prehash(digest).map_err(|_| {
		tracing::debug!("Signature recovery failed");
		AuthError::InvalidSignature
	})
}
