//! Utility functions for typed-data encoding and hex formatting.

pub mod eip712;
pub mod formatting;

pub use eip712::{
	compute_domain_hash, compute_final_digest, compute_struct_hash, hash_address_array,
	typed_data_digest, Eip712AbiEncoder, DOMAIN_TYPE, PERMISSION_TYPE,
};
pub use formatting::without_0x_prefix;
