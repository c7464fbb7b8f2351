//! Recoverable secp256k1 signature components as submitted by relayers.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::without_0x_prefix;

/// Length of a packed `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Errors that can occur when decoding a packed signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureFormatError {
	/// Input is not valid hexadecimal
	#[error("Invalid hex: {0}")]
	InvalidHex(String),
	/// Input does not decode to 65 bytes
	#[error("Signature must be 65 bytes, got {0}")]
	InvalidLength(usize),
}

/// Signature over a 32-byte digest, split into its three components.
///
/// `v` is kept exactly as supplied; whether it is an acceptable recovery
/// value is decided by the verifier, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureParts {
	/// Recovery parameter, 27 or 28 for a well-formed signature.
	pub v: u8,
	/// First scalar.
	pub r: B256,
	/// Second scalar.
	pub s: B256,
}

impl SignatureParts {
	pub fn new(v: u8, r: B256, s: B256) -> Self {
		Self { v, r, s }
	}

	/// Y-parity encoded by `v`, or `None` when `v` is not 27 or 28.
	pub fn y_parity(&self) -> Option<bool> {
		match self.v {
			27 => Some(false),
			28 => Some(true),
			_ => None,
		}
	}

	/// Packs the components as `r || s || v`.
	pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
		let mut out = [0u8; SIGNATURE_LENGTH];
		out[..32].copy_from_slice(self.r.as_slice());
		out[32..64].copy_from_slice(self.s.as_slice());
		out[64] = self.v;
		out
	}

	/// Splits a packed `r || s || v` signature.
	///
	/// A trailing byte of 0 or 1 is read as a bare y-parity and widened to
	/// 27 or 28; any other value is kept unchanged.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureFormatError> {
		if bytes.len() != SIGNATURE_LENGTH {
			return Err(SignatureFormatError::InvalidLength(bytes.len()));
		}

		let v = match bytes[64] {
			v @ (0 | 1) => v + 27,
			v => v,
		};

		Ok(Self {
			v,
			r: B256::from_slice(&bytes[..32]),
			s: B256::from_slice(&bytes[32..64]),
		})
	}
}

impl From<alloy_primitives::Signature> for SignatureParts {
	fn from(sig: alloy_primitives::Signature) -> Self {
		Self {
			v: if sig.v() { 28 } else { 27 },
			r: B256::from(sig.r().to_be_bytes::<32>()),
			s: B256::from(sig.s().to_be_bytes::<32>()),
		}
	}
}

impl FromStr for SignatureParts {
	type Err = SignatureFormatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = hex::decode(without_0x_prefix(s.trim()))
			.map_err(|e| SignatureFormatError::InvalidHex(e.to_string()))?;
		Self::from_bytes(&bytes)
	}
}

impl fmt::Display for SignatureParts {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.to_bytes()))
	}
}
