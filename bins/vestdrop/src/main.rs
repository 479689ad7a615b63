//! vestdrop — one-shot vested token distribution.
//!
//! Computes the published allocation schedule, validates every total, and
//! drives the ledger node through four sequential batches: create
//! anonymous proxy accounts, fund them, hand their control to the
//! multisig, and issue the vested transfers. Configuration is two
//! environment variables; any failure aborts the run with a non-zero
//! exit.

use anyhow::{Context, Result};
use tracing::info;

mod config;
mod keys;
mod ledger;
mod pipeline;

use config::Config;
use keys::{Signer, VESTING_MODULE_ID, module_account};
use ledger::{Ledger, RpcLedger};
use vestdrop_core::plan::DistributionPlan;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    // Every allocation invariant is checked here, before any connection
    // is opened: if the amounts are wrong, nothing may be submitted.
    let plan = DistributionPlan::build().context("allocation table failed validation")?;

    let signer = Signer::from_hex_seed(&config.account_secret)?;

    let ledger = RpcLedger::connect(&config.rpc_endpoint)?;
    let chain = ledger.chain_info().await.context("Failed to reach the ledger node")?;
    info!(
        endpoint = %config.rpc_endpoint,
        chain = %chain.chain,
        version = %chain.version,
        "connected"
    );
    info!("active account: {}", signer.address());
    info!("vesting pot account: {}", module_account(VESTING_MODULE_ID)?);
    info!("controller multisig: {}", pipeline::CONTROLLER_MULTISIG);
    info!(
        grants = plan.len(),
        total = %plan.grand_total(),
        scheduled_units = plan.scheduled_units(),
        "distribution plan validated"
    );

    pipeline::run(&ledger, &signer, &plan).await?;

    info!("distribution complete");
    Ok(())
}
