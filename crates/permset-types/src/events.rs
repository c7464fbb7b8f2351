//! Event types published by permissioned set instances.
//!
//! Events flow through an event bus so that surrounding systems can react
//! to membership changes and record rejected updates.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Events emitted by a permissioned set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PermissionEvent {
	/// A delegated update was applied. Carries both replacement lists.
	#[serde(rename_all = "camelCase")]
	MembershipChanged {
		instance: Address,
		whitelist: Vec<Address>,
		blacklist: Vec<Address>,
	},
	/// A delegated update was rejected and state left unchanged.
	#[serde(rename_all = "camelCase")]
	UpdateRejected {
		instance: Address,
		caller: Address,
		reason: String,
	},
}

impl PermissionEvent {
	/// Address of the instance that emitted the event.
	pub fn instance(&self) -> Address {
		match self {
			Self::MembershipChanged { instance, .. } | Self::UpdateRejected { instance, .. } => {
				*instance
			},
		}
	}
}
