//! Execution environment an instance is deployed into.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Chain id and address of a deployed instance.
///
/// Both values feed the instance's EIP-712 domain, which is what stops a
/// signature for one deployment from being replayed against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContext {
	pub chain_id: u64,
	pub address: Address,
}

impl ChainContext {
	pub fn new(chain_id: u64, address: Address) -> Self {
		Self { chain_id, address }
	}

	/// Context of an instance created by `deployer` with account nonce
	/// `nonce`, addressed as a CREATE deployment would be.
	pub fn deploy(chain_id: u64, deployer: Address, nonce: u64) -> Self {
		Self {
			chain_id,
			address: deployer.create(nonce),
		}
	}
}
