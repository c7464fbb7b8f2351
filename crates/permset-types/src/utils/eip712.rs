//! EIP-712 typed-data encoding for permission requests.
//!
//! These helpers provide:
//! - Domain hash computation for a [`DomainContext`]
//! - Element-wise folding of `address[]` values into a single word
//! - Struct hash computation for a [`PermissionRequest`]
//! - Final digest computation (0x1901 || domainHash || structHash)
//!
//! The encoding is reproduced bit-for-bit by any standard EIP-712 signer
//! given the same domain and `permission` type, so both sides of the
//! delegation agree on the digest without exchanging it.

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::{DomainContext, PermissionRequest};

/// EIP-712 domain type string. All four fields are always present.
pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// EIP-712 type string of a permission request.
pub const PERMISSION_TYPE: &str =
	"permission(address _caller,address[] _whitelist,address[] _blacklist)";

/// Prefix bytes of the final EIP-712 digest preimage.
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

/// Compute EIP-712 domain hash
/// (keccak256(abi.encode(typeHash, nameHash, versionHash, chainId, verifyingContract))).
pub fn compute_domain_hash(domain: &DomainContext) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(DOMAIN_TYPE.as_bytes()));
	enc.push_b256(&keccak256(domain.name.as_bytes()));
	enc.push_b256(&keccak256(domain.version.as_bytes()));
	enc.push_u256(U256::from(domain.chain_id));
	enc.push_address(&domain.verifying_contract);
	keccak256(enc.finish())
}

/// Fold an `address[]` value into the single word used in its parent struct.
///
/// Each element is encoded as a left-padded 32-byte word, the words are
/// concatenated in order and the result is hashed. An empty array hashes the
/// empty byte string.
pub fn hash_address_array(addresses: &[Address]) -> B256 {
	let mut enc = Eip712AbiEncoder::with_capacity(addresses.len());
	for address in addresses {
		enc.push_address(address);
	}
	keccak256(enc.finish())
}

/// Compute the EIP-712 struct hash of a permission request.
pub fn compute_struct_hash(request: &PermissionRequest) -> B256 {
	let mut enc = Eip712AbiEncoder::with_capacity(4);
	enc.push_b256(&keccak256(PERMISSION_TYPE.as_bytes()));
	enc.push_address(&request.caller);
	enc.push_b256(&hash_address_array(&request.whitelist));
	enc.push_b256(&hash_address_array(&request.blacklist));
	keccak256(enc.finish())
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainHash || structHash).
pub fn compute_final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.extend_from_slice(&EIP712_PREFIX);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Digest a signer must sign to authorize `request` under `domain`.
pub fn typed_data_digest(domain: &DomainContext, request: &PermissionRequest) -> B256 {
	compute_final_digest(&compute_domain_hash(domain), &compute_struct_hash(request))
}

/// Minimal ABI encoder for the static word types used in EIP-712 hashing.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	/// Encoder with room for `words` 32-byte words.
	pub fn with_capacity(words: usize) -> Self {
		Self {
			buf: Vec::with_capacity(words * 32),
		}
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}
