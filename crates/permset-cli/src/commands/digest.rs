//! Hashes a signer needs to authorize a request.

use alloy_primitives::B256;
use anyhow::Result;
use permset_config::Config;
use permset_types::{DomainContext, PermissionRequest};
use serde::Serialize;

/// Every intermediate hash of a request's EIP-712 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestReport {
	pub domain: DomainContext,
	pub domain_separator: B256,
	pub struct_hash: B256,
	pub digest: B256,
	pub request: PermissionRequest,
}

pub fn digest(config: &Config, request: PermissionRequest) -> Result<DigestReport> {
	let set = config.build_set()?;
	let digest = set.digest_for(request.caller, &request.whitelist, &request.blacklist);

	Ok(DigestReport {
		domain: set.domain().clone(),
		domain_separator: set.domain_separator(),
		struct_hash: request.struct_hash(),
		digest,
		request,
	})
}
