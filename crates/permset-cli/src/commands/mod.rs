pub mod apply;
pub mod digest;
pub mod sign;

use alloy_primitives::Address;
use clap::{Args, Subcommand};
use permset_types::PermissionRequest;
use std::path::PathBuf;

use crate::signing::DEFAULT_KEY_ENV;

#[derive(Debug, Subcommand)]
pub enum Commands {
	/// Print the EIP-712 hashes the authority must sign for a request
	Digest {
		#[command(flatten)]
		request: RequestArgs,
	},

	/// Sign a request with a local key and print it as JSON
	Sign {
		#[command(flatten)]
		request: RequestArgs,

		/// Environment variable holding the authority's private key
		#[arg(long, default_value = DEFAULT_KEY_ENV)]
		key_env: String,
	},

	/// Replay signed requests against a fresh instance
	Apply {
		/// JSON file with an array of signed requests, applied in order
		#[arg(long)]
		requests: PathBuf,
	},

	/// Print the resolved configuration
	ShowConfig,
}

/// Membership update as given on the command line.
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
	/// Account that will submit the update
	#[arg(long)]
	pub caller: Address,

	/// Replacement whitelist (comma separated)
	#[arg(long, value_delimiter = ',')]
	pub whitelist: Vec<Address>,

	/// Replacement blacklist (comma separated)
	#[arg(long, value_delimiter = ',')]
	pub blacklist: Vec<Address>,
}

impl From<RequestArgs> for PermissionRequest {
	fn from(args: RequestArgs) -> Self {
		PermissionRequest::new(args.caller, args.whitelist, args.blacklist)
	}
}
