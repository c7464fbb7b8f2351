//! Storage policy for submitted membership lists.
//!
//! A policy only shapes what is stored after a signature has been accepted.
//! The signed encoding always covers the lists exactly as submitted.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::PermissionError;

/// How duplicate and overlapping entries are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipPolicy {
	/// Store both lists exactly as submitted.
	#[default]
	Preserve,
	/// Collapse repeated entries to their first occurrence. An address may
	/// still appear in both lists.
	Deduplicate,
	/// Reject lists with repeated entries or an address in both lists.
	Strict,
}

impl MembershipPolicy {
	/// Shapes the submitted lists into what will be stored.
	///
	/// Only [`MembershipPolicy::Strict`] can fail.
	pub fn apply(
		&self,
		whitelist: Vec<Address>,
		blacklist: Vec<Address>,
	) -> Result<(Vec<Address>, Vec<Address>), PermissionError> {
		match self {
			Self::Preserve => Ok((whitelist, blacklist)),
			Self::Deduplicate => Ok((dedup_in_order(whitelist), dedup_in_order(blacklist))),
			Self::Strict => {
				unique_members(&whitelist, "whitelist")?;
				let denied = unique_members(&blacklist, "blacklist")?;
				if let Some(both) = whitelist.iter().find(|a| denied.contains(*a)) {
					return Err(PermissionError::InvalidMembership(format!(
						"{both} is in both whitelist and blacklist"
					)));
				}
				Ok((whitelist, blacklist))
			},
		}
	}
}

fn dedup_in_order(list: Vec<Address>) -> Vec<Address> {
	let mut seen = HashSet::with_capacity(list.len());
	list.into_iter().filter(|a| seen.insert(*a)).collect()
}

fn unique_members<'a>(
	list: &'a [Address],
	label: &str,
) -> Result<HashSet<&'a Address>, PermissionError> {
	let mut seen = HashSet::with_capacity(list.len());
	for address in list {
		if !seen.insert(address) {
			return Err(PermissionError::InvalidMembership(format!(
				"{address} appears more than once in {label}"
			)));
		}
	}
	Ok(seen)
}

impl fmt::Display for MembershipPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Preserve => "preserve",
			Self::Deduplicate => "deduplicate",
			Self::Strict => "strict",
		};
		f.write_str(name)
	}
}

impl FromStr for MembershipPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"preserve" => Ok(Self::Preserve),
			"deduplicate" => Ok(Self::Deduplicate),
			"strict" => Ok(Self::Strict),
			other => Err(format!(
				"Unknown membership policy '{other}' (expected preserve, deduplicate or strict)"
			)),
		}
	}
}
