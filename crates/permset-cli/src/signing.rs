//! Local-key signing of permission digests.
//!
//! The authority's key never touches the instance. It is read from an
//! environment variable by the tooling that produces signed requests.

use alloy_primitives::B256;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{anyhow, bail, Result};
use permset_types::SignatureParts;

/// Default environment variable holding the authority's private key.
pub const DEFAULT_KEY_ENV: &str = "PERMSET_SIGNER_KEY";

/// Reads a hex private key from `var` and builds a signer from it.
pub fn load_signer(var: &str) -> Result<PrivateKeySigner> {
	let Ok(key) = std::env::var(var) else {
		bail!("Environment variable {var} is not set");
	};
	parse_signer(&key)
}

/// Parses a hex private key, with or without `0x`.
pub fn parse_signer(key: &str) -> Result<PrivateKeySigner> {
	key.trim()
		.parse::<PrivateKeySigner>()
		.map_err(|e| anyhow!("Invalid private key: {e}"))
}

/// Signs a 32-byte digest without any message prefix.
pub fn sign_digest(signer: &PrivateKeySigner, digest: &B256) -> Result<SignatureParts> {
	let signature = signer
		.sign_hash_sync(digest)
		.map_err(|e| anyhow!("Failed to sign digest: {e}"))?;
	Ok(signature.into())
}
