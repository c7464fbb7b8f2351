use anyhow::{Context, Result};
use clap::Parser;
use permset_cli::commands::{apply, digest, sign, Commands};
use permset_cli::signing::load_signer;
use permset_config::Config;
use permset_core::MembershipPolicy;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "permset")]
#[command(about = "Sign and relay delegated whitelist/blacklist updates")]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Configuration file of the instance
	#[arg(
		global = true,
		long,
		env = "PERMSET_CONFIG",
		default_value = "config/permset.toml"
	)]
	config: PathBuf,

	/// Override the configured membership policy (preserve, deduplicate, strict)
	#[arg(global = true, long)]
	policy: Option<MembershipPolicy>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(global = true, long, default_value = "info")]
	log_level: String,
}

/// Targets whose logs follow `--log-level`; everything else stays at warn.
const LOG_TARGETS: [&str; 6] = [
	"permset",
	"permset_cli",
	"permset_core",
	"permset_auth",
	"permset_types",
	"permset_config",
];

fn default_log_directive(level: &str) -> String {
	let mut directive: Vec<String> = LOG_TARGETS
		.iter()
		.map(|target| format!("{target}={level}"))
		.collect();
	directive.push("warn".to_string());
	directive.join(",")
}

/// Logs go to stderr so stdout stays valid JSON or TOML.
fn init_logging(level: &str) {
	// RUST_LOG takes precedence over --log-level
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_log_directive(level)));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(&cli.log_level);

	let mut config = Config::from_file(&cli.config)
		.await
		.with_context(|| format!("Failed to load {}", cli.config.display()))?;
	tracing::debug!(config = %cli.config.display(), "Configuration loaded");

	if let Some(policy) = cli.policy {
		tracing::debug!(%policy, "Overriding membership policy");
		config.instance.membership_policy = policy;
	}

	match cli.command {
		Commands::Digest { request } => {
			let report = digest::digest(&config, request.into())?;
			print_json(&report)?;
		},
		Commands::Sign { request, key_env } => {
			let signer = load_signer(&key_env)?;
			let signed = sign::sign(&config, request.into(), &signer)?;
			print_json(&signed)?;
		},
		Commands::Apply { requests } => {
			let requests = apply::load_requests(&requests).await?;
			tracing::info!(count = requests.len(), "Replaying signed requests");
			let report = apply::apply(&config, requests)?;
			print_json(&report)?;
		},
		Commands::ShowConfig => {
			print!("{}", config.to_toml()?);
		},
	}

	Ok(())
}
