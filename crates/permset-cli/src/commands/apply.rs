//! Replays signed requests against a freshly deployed instance.
//!
//! Each request is submitted by the caller it names, in file order. A
//! rejected request is reported and does not stop the run.

use alloy_primitives::Address;
use anyhow::{Context, Result};
use permset_config::Config;
use permset_core::PermissionError;
use permset_types::{PermissionEvent, SignedPermission};
use serde::Serialize;
use std::path::Path;
use tokio::sync::broadcast::error::TryRecvError;

/// Result of one submitted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
	pub index: usize,
	pub caller: Address,
	pub applied: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
	pub instance: Address,
	pub outcomes: Vec<Outcome>,
	pub whitelist: Vec<Address>,
	pub blacklist: Vec<Address>,
	pub events: Vec<PermissionEvent>,
}

/// Reads a JSON array of signed requests.
pub async fn load_requests(path: &Path) -> Result<Vec<SignedPermission>> {
	let contents = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("Failed to read {}", path.display()))?;
	serde_json::from_str(&contents)
		.with_context(|| format!("Failed to parse signed requests in {}", path.display()))
}

pub fn apply(config: &Config, requests: Vec<SignedPermission>) -> Result<ApplyReport> {
	let events = config.event_bus();
	let mut receiver = events.subscribe();
	let mut set = config.build_set()?.with_event_bus(events);

	let mut outcomes = Vec::with_capacity(requests.len());
	for (index, signed) in requests.into_iter().enumerate() {
		let result = set.delegated_set(
			signed.caller,
			signed.whitelist,
			signed.blacklist,
			&signed.signature,
		);
		outcomes.push(outcome(index, signed.caller, result.map(|_| ())));
	}

	let mut published = Vec::new();
	loop {
		match receiver.try_recv() {
			Ok(event) => published.push(event),
			Err(TryRecvError::Lagged(skipped)) => {
				tracing::warn!(skipped, "Event buffer overflowed, oldest events dropped");
			},
			Err(TryRecvError::Empty | TryRecvError::Closed) => break,
		}
	}

	Ok(ApplyReport {
		instance: set.address(),
		outcomes,
		whitelist: set.whitelist().to_vec(),
		blacklist: set.blacklist().to_vec(),
		events: published,
	})
}

fn outcome(index: usize, caller: Address, result: Result<(), PermissionError>) -> Outcome {
	Outcome {
		index,
		caller,
		applied: result.is_ok(),
		error: result.err().map(|e| e.to_string()),
	}
}
