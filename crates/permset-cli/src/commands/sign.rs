//! Produces a signed request a relayer can submit.

use alloy_signer_local::PrivateKeySigner;
use anyhow::Result;
use permset_config::Config;
use permset_types::{PermissionRequest, SignedPermission};

use crate::signing::sign_digest;

/// Signs `request` for the configured instance.
///
/// A key other than the configured authority still signs, since the result
/// is only rejected once submitted; the mismatch is logged.
pub fn sign(
	config: &Config,
	request: PermissionRequest,
	signer: &PrivateKeySigner,
) -> Result<SignedPermission> {
	let set = config.build_set()?;
	let digest = set.digest_for(request.caller, &request.whitelist, &request.blacklist);

	if signer.address() != set.authority() {
		tracing::warn!(
			signer = %signer.address(),
			authority = %set.authority(),
			"Signing key is not the configured authority"
		);
	}

	let signature = sign_digest(signer, &digest)?;
	tracing::info!(instance = %set.address(), digest = %digest, "Signed permission request");

	Ok(SignedPermission::new(request, signature))
}
