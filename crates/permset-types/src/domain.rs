//! EIP-712 domain binding a signature to one deployed instance.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::utils::compute_domain_hash;

/// Protocol version committed to by every domain.
pub const DOMAIN_VERSION: &str = "1";

/// EIP-712 domain of a permissioned set instance.
///
/// Changing any field changes every digest produced under the domain, so a
/// signature is only valid for one instance on one chain at one protocol
/// version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainContext {
	/// Display name, also used for domain separation.
	pub name: String,
	/// Protocol version string.
	pub version: String,
	/// Chain the instance lives on.
	pub chain_id: u64,
	/// Address of the instance verifying signatures.
	pub verifying_contract: Address,
}

impl DomainContext {
	/// Creates a domain at the current [`DOMAIN_VERSION`].
	pub fn new(name: impl Into<String>, chain_id: u64, verifying_contract: Address) -> Self {
		Self {
			name: name.into(),
			version: DOMAIN_VERSION.to_string(),
			chain_id,
			verifying_contract,
		}
	}

	/// EIP-712 domain separator.
	pub fn separator(&self) -> B256 {
		compute_domain_hash(self)
	}
}
