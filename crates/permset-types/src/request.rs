//! Permission requests: the desired membership state an authority signs.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::utils::{compute_struct_hash, typed_data_digest};
use crate::{DomainContext, SignatureParts};

/// Intended new membership state, bound to the account that will submit it.
///
/// This is a full replacement of both lists, not a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
	/// Account expected to submit the update.
	pub caller: Address,
	/// Replacement whitelist, in order.
	pub whitelist: Vec<Address>,
	/// Replacement blacklist, in order.
	pub blacklist: Vec<Address>,
}

impl PermissionRequest {
	pub fn new(caller: Address, whitelist: Vec<Address>, blacklist: Vec<Address>) -> Self {
		Self {
			caller,
			whitelist,
			blacklist,
		}
	}

	/// EIP-712 struct hash of this request.
	pub fn struct_hash(&self) -> B256 {
		compute_struct_hash(self)
	}

	/// Digest to sign for this request under `domain`.
	pub fn signing_hash(&self, domain: &DomainContext) -> B256 {
		typed_data_digest(domain, self)
	}
}

/// A permission request together with its signature, as handed to a relayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPermission {
	pub caller: Address,
	#[serde(default)]
	pub whitelist: Vec<Address>,
	#[serde(default)]
	pub blacklist: Vec<Address>,
	pub signature: SignatureParts,
}

impl SignedPermission {
	pub fn new(request: PermissionRequest, signature: SignatureParts) -> Self {
		Self {
			caller: request.caller,
			whitelist: request.whitelist,
			blacklist: request.blacklist,
			signature,
		}
	}

	/// The request the signature claims to cover.
	pub fn request(&self) -> PermissionRequest {
		PermissionRequest::new(self.caller, self.whitelist.clone(), self.blacklist.clone())
	}
}
