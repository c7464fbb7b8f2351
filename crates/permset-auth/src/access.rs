//! Authority checks gating every membership mutation.

use alloy_primitives::Address;

use crate::error::AuthError;

/// Returns whether a recovered signer is the expected authority.
pub fn authorize(recovered: &Address, expected: &Address) -> bool {
	recovered == expected
}

/// Holds the single identity allowed to authorize updates.
///
/// The authority is fixed at construction; there is no setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessController {
	authority: Address,
}

impl AccessController {
	pub fn new(authority: Address) -> Self {
		Self { authority }
	}

	/// The configured authority.
	pub fn authority(&self) -> Address {
		self.authority
	}

	/// Returns whether `recovered` is the authority.
	pub fn authorize(&self, recovered: &Address) -> bool {
		authorize(recovered, &self.authority)
	}

	/// Like [`authorize`](Self::authorize), but as a `Result`.
	pub fn ensure_authorized(&self, recovered: &Address) -> Result<(), AuthError> {
		if self.authorize(recovered) {
			Ok(())
		} else {
			Err(AuthError::Unauthorized(*recovered))
		}
	}
}
