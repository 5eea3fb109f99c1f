//! Command-line entry point for the token toolkit.
//!
//! Loads the configuration, builds a ledger client for the configured chain
//! (with the signing key only for commands that submit transactions), and runs
//! one workflow per invocation. Reports are printed to
//! stdout; diagnostics go through `tracing`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use token_account::{AccountInterface, LocalAccount};
use token_config::Config;
use token_core::{ContractArtifact, TokenEngine, ToolkitError};
use token_delivery::implementations::evm::alloy::AlloyLedger;
use token_events::{EventDecoder, EventSchema};
use token_types::{parse_address, Amount};

mod output;

/// Command-line arguments for the token toolkit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "token.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Deploy the token from its build artifact
	Deploy {
		/// Artifact JSON with `abi` and `bytecode`, overrides `token.artifact`
		#[arg(long)]
		artifact: Option<PathBuf>,
	},
	/// Compare gas of one batched airdrop against individual transfers
	Airdrop {
		/// Run the batched and individual paths concurrently
		#[arg(long)]
		concurrent: bool,
	},
	/// Transfer to a recipient, then approve it as a spender
	TransferApprove {
		/// Recipient and spender address
		#[arg(long)]
		to: String,
		/// Tokens to transfer
		#[arg(long, default_value = "100")]
		amount: String,
		/// Tokens to approve
		#[arg(long, default_value = "50")]
		allowance: String,
	},
	/// Print decoded token events from recent blocks
	Logs {
		/// Number of blocks before the latest to scan
		#[arg(long)]
		lookback: Option<u64>,
	},
	/// Print the token balance of an address
	Balance { address: String },
}

impl Command {
	/// Whether the command submits transactions and needs the signing key.
	fn requires_signer(&self) -> bool {
		matches!(
			self,
			Command::Deploy { .. } | Command::Airdrop { .. } | Command::TransferApprove { .. }
		)
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::info!(
		chain_id = config.network.chain_id,
		path = %args.config.display(),
		"Loaded configuration"
	);

	let engine = build_engine(config, args.command.requires_signer())?;
	let symbol = engine.config().token.symbol.clone();

	match args.command {
		Command::Deploy { artifact } => {
			let artifact = load_artifact(&engine, artifact)
				.await?
				.ok_or_else(|| {
					ToolkitError::Configuration(
						"no artifact configured (set token.artifact or pass --artifact)".into(),
					)
				})?;
			let deployment = engine.deploy(&artifact.bytecode).await?;
			output::print_deployment(&deployment);
		}
		Command::Airdrop { concurrent } => {
			let plan = engine.airdrop_plan()?;
			let orchestrator = engine.orchestrator()?;
			let report = if concurrent {
				orchestrator.compare_concurrently(&plan).await?
			} else {
				orchestrator.compare(&plan).await?
			};
			println!("{}", report);
		}
		Command::TransferApprove {
			to,
			amount,
			allowance,
		} => {
			let recipient = parse_address(&to).map_err(ToolkitError::from)?;
			let amount = parse_amount(&amount)?;
			let allowance = parse_amount(&allowance)?;

			let report = engine
				.transfer_approve(recipient, amount, allowance)
				.await?;
			output::print_transfer_approve(&report, &symbol);
		}
		Command::Logs { lookback } => {
			let schema = match load_artifact(&engine, None).await? {
				Some(artifact) => artifact.event_schema(),
				None => EventSchema::token(),
			};
			let decoder = EventDecoder::new(schema);

			let history = engine.log_history(&decoder, lookback).await?;
			output::print_log_history(&history);
		}
		Command::Balance { address } => {
			let holder = parse_address(&address).map_err(ToolkitError::from)?;
			let balance = engine.inspector()?.balance_of(holder).await?;
			println!("Balance of {}: {} {}", holder, balance, symbol);
		}
	}

	Ok(())
}

/// Wires the configured endpoint, and the signing key when `signing` is set,
/// into a token engine.
fn build_engine(config: Config, signing: bool) -> Result<TokenEngine, ToolkitError> {
	let network = &config.network;
	let poll_interval = config.delivery.poll_interval();

	let ledger = if signing {
		let account = LocalAccount::from_private_key(config.signing_key()?)?;
		tracing::info!(signer = %account.address(), "Using signing account");
		AlloyLedger::new(&network.rpc_url, network.chain_id, &account, poll_interval)?
	} else {
		tracing::debug!("Using read-only ledger client");
		AlloyLedger::read_only(&network.rpc_url, network.chain_id, poll_interval)?
	};

	Ok(TokenEngine::new(config, Arc::new(ledger)))
}

/// Loads the artifact named on the command line, falling back to the configured one.
async fn load_artifact(
	engine: &TokenEngine,
	path: Option<PathBuf>,
) -> Result<Option<ContractArtifact>, ToolkitError> {
	let Some(path) = path.or_else(|| engine.config().token.artifact.clone()) else {
		return Ok(None);
	};
	ContractArtifact::from_file(path).await.map(Some)
}

fn parse_amount(value: &str) -> Result<Amount, ToolkitError> {
	Amount::parse_units(value)
		.map_err(|e| ToolkitError::Configuration(format!("invalid amount: {}", e)))
}
