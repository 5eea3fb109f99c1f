//! Token engine wiring configuration to workflows.
//!
//! [`TokenEngine`] is built once per run from a loaded [`Config`] and a
//! ledger client. It resolves configured values (token address, recipients,
//! fee classes) and hands out workflows that all share one
//! [`WorkflowContext`], and therefore one signer lock.

pub mod context;

use crate::handlers::airdrop::AirdropOrchestrator;
use crate::handlers::deploy::{self, DeployParams, Deployment};
use crate::handlers::logs::{self, LogHistory};
use crate::handlers::transfer::{self, TransferApproveReport};
use crate::inspector::Inspector;
use crate::ToolkitError;
use context::WorkflowContext;
use std::sync::Arc;
use token_config::{Config, SIGNER_ALIAS};
use token_delivery::LedgerClient;
use token_events::EventDecoder;
use token_types::{parse_address, Address, Amount, Bytes, DistributionPlan, PlanEntry};

/// Entry point for every toolkit workflow.
pub struct TokenEngine {
	config: Config,
	context: WorkflowContext,
}

impl TokenEngine {
	pub fn new(config: Config, ledger: Arc<dyn LedgerClient>) -> Self {
		let context = WorkflowContext::new(ledger, config.delivery.receipt_timeout());
		Self { config, context }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn context(&self) -> &WorkflowContext {
		&self.context
	}

	pub fn signer_address(&self) -> Result<Address, ToolkitError> {
		self.context.signer_address()
	}

	/// Address of the deployed token.
	pub fn token_address(&self) -> Result<Address, ToolkitError> {
		Ok(self.config.token_address()?)
	}

	/// Builds the configured distribution plan, resolving the signer alias.
	pub fn airdrop_plan(&self) -> Result<DistributionPlan, ToolkitError> {
		let signer = self.signer_address()?;
		let entries = self
			.config
			.airdrop
			.recipients
			.iter()
			.map(|recipient| {
				let address = if recipient.address == SIGNER_ALIAS {
					signer
				} else {
					parse_address(&recipient.address)?
				};
				Ok(PlanEntry {
					recipient: address,
					amount: recipient.amount,
				})
			})
			.collect::<Result<Vec<_>, ToolkitError>>()?;

		Ok(DistributionPlan::from_entries(entries)?)
	}

	pub fn orchestrator(&self) -> Result<AirdropOrchestrator, ToolkitError> {
		self.signer_address()?;
		Ok(AirdropOrchestrator::new(
			self.context.clone(),
			self.token_address()?,
			self.config.fees.batch,
			self.config.fees.individual,
		))
	}

	pub fn inspector(&self) -> Result<Inspector, ToolkitError> {
		Ok(Inspector::new(
			self.context.ledger().clone(),
			self.token_address()?,
		))
	}

	/// Deploys the token from its creation bytecode using the configured parameters.
	pub async fn deploy(&self, bytecode: &Bytes) -> Result<Deployment, ToolkitError> {
		let token = &self.config.token;
		let params = DeployParams {
			name: token.name.clone(),
			symbol: token.symbol.clone(),
			cap: token.cap,
			initial_supply: token.initial_supply,
		};
		deploy::deploy(&self.context, bytecode, &params, self.config.fees.deploy).await
	}

	pub async fn transfer_approve(
		&self,
		recipient: Address,
		amount: Amount,
		allowance: Amount,
	) -> Result<TransferApproveReport, ToolkitError> {
		transfer::transfer_approve(
			&self.context,
			&self.inspector()?,
			recipient,
			amount,
			allowance,
			&self.config.fees,
		)
		.await
	}

	/// Decoded token activity over the trailing `lookback` blocks, or the
	/// configured default.
	pub async fn log_history(
		&self,
		decoder: &EventDecoder,
		lookback: Option<u64>,
	) -> Result<LogHistory, ToolkitError> {
		let lookback = lookback.unwrap_or(self.config.logs.lookback_blocks);
		logs::fetch_history(
			self.context.ledger().as_ref(),
			decoder,
			self.token_address()?,
			lookback,
		)
		.await
	}
}
