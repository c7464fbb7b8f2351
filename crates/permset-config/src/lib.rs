//! Configuration for permissioned set instances.
//!
//! An instance is described by a TOML file naming the set, its authority
//! and the chain it lives on. Values may reference environment variables
//! with `${VAR}` or `${VAR:-default}`, which are substituted before parsing.
//!
//! ```toml
//! [instance]
//! name = "Wedding"
//! authority = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"
//! membership_policy = "preserve"
//!
//! [chain]
//! chain_id = 31337
//! deployer = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
//! deployer_nonce = 0
//!
//! [events]
//! capacity = 64
//! ```

use alloy_primitives::Address;
use permset_core::{ChainContext, EventBus, MembershipPolicy, PermissionedSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted event channel capacity.
pub const MAX_EVENT_CAPACITY: usize = 65_536;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, not the echoed input.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Complete configuration of one instance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
	/// Identity and policy of the instance.
	pub instance: InstanceConfig,
	/// Chain the instance is deployed on.
	pub chain: ChainConfig,
	/// Event channel settings.
	#[serde(default)]
	pub events: EventsConfig,
}

/// Identity and policy of the instance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InstanceConfig {
	/// EIP-712 domain name.
	pub name: String,
	/// Only account whose signatures are accepted.
	pub authority: Address,
	/// Handling of duplicate and overlapping entries.
	#[serde(default)]
	pub membership_policy: MembershipPolicy,
}

/// Deployment of the instance.
///
/// The address is either given directly with `verifying_contract` or
/// derived from `deployer` and `deployer_nonce` the way CREATE derives it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChainConfig {
	pub chain_id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deployer: Option<Address>,
	#[serde(default)]
	pub deployer_nonce: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verifying_contract: Option<Address>,
}

/// Event channel settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventsConfig {
	/// Events buffered per subscriber before the oldest are dropped.
	/// Defaults to 64.
	#[serde(default = "default_event_capacity")]
	pub capacity: usize,
}

impl Default for EventsConfig {
	fn default() -> Self {
		Self {
			capacity: default_event_capacity(),
		}
	}
}

fn default_event_capacity() -> usize {
	64
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to bound regex work.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let var_name = var_name.as_str();

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{var_name}' not found"
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}

	result.push_str(&input[last..]);
	Ok(result)
}

impl Config {
	/// Loads, resolves and validates the configuration at `path`.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let contents = tokio::fs::read_to_string(path).await?;
		let config: Config = contents.parse()?;

		tracing::debug!(
			path = %path.display(),
			instance = %config.instance.name,
			chain_id = config.chain.chain_id,
			"Loaded configuration"
		);
		Ok(config)
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.instance.name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Instance name cannot be empty".into(),
			));
		}
		if self.instance.authority.is_zero() {
			return Err(ConfigError::Validation(
				"Authority cannot be the zero address".into(),
			));
		}

		if self.chain.chain_id == 0 {
			return Err(ConfigError::Validation(
				"chain_id must be greater than 0".into(),
			));
		}
		match (self.chain.deployer, self.chain.verifying_contract) {
			(Some(_), Some(_)) => {
				return Err(ConfigError::Validation(
					"Set either deployer or verifying_contract, not both".into(),
				));
			},
			(None, None) => {
				return Err(ConfigError::Validation(
					"One of deployer or verifying_contract is required".into(),
				));
			},
			(None, Some(_)) if self.chain.deployer_nonce != 0 => {
				return Err(ConfigError::Validation(
					"deployer_nonce has no effect without deployer".into(),
				));
			},
			_ => {},
		}

		if self.events.capacity == 0 || self.events.capacity > MAX_EVENT_CAPACITY {
			return Err(ConfigError::Validation(format!(
				"events.capacity must be between 1 and {MAX_EVENT_CAPACITY}, got {}",
				self.events.capacity
			)));
		}

		Ok(())
	}

	/// Chain id and address of the configured instance.
	pub fn chain_context(&self) -> Result<ChainContext, ConfigError> {
		let chain = &self.chain;
		match (chain.verifying_contract, chain.deployer) {
			(Some(address), _) => Ok(ChainContext::new(chain.chain_id, address)),
			(None, Some(deployer)) => Ok(ChainContext::deploy(
				chain.chain_id,
				deployer,
				chain.deployer_nonce,
			)),
			(None, None) => Err(ConfigError::Validation(
				"One of deployer or verifying_contract is required".into(),
			)),
		}
	}

	/// Event bus sized as configured.
	pub fn event_bus(&self) -> EventBus {
		EventBus::new(self.events.capacity)
	}

	/// Creates a fresh, empty instance as configured.
	pub fn build_set(&self) -> Result<PermissionedSet, ConfigError> {
		let chain = self.chain_context()?;
		let set = PermissionedSet::new(&chain, self.instance.name.clone(), self.instance.authority)
			.with_policy(self.instance.membership_policy);
		Ok(set)
	}

	/// Serializes the configuration back to TOML.
	pub fn to_toml(&self) -> Result<String, ConfigError> {
		toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
