//! The four-step distribution pipeline.
//!
//! Strictly sequential: each step is one atomic batch, confirmed before
//! the next begins. Every step asserts the cardinality (and, for
//! delegation, the identity) of its results; any mismatch aborts the
//! whole run. There is no partial-success or resume path; after a
//! failure an operator inspects ledger state and re-runs by hand.

use anyhow::{Context, Result, anyhow, ensure};
use tracing::{debug, info};

use vestdrop_core::amount::Amount;
use vestdrop_core::constants::{PROXY_FUNDING_TOKENS, PROXY_INDEX_BASE};
use vestdrop_core::plan::DistributionPlan;

use crate::keys::{Signer, VESTING_MODULE_ID, module_account};
use crate::ledger::{Call, Event, Ledger};

/// Long-term controller of every proxy account: the 2-of-3 multisig.
pub const CONTROLLER_MULTISIG: &str = "Bv2XYc7xKp9mQfTnR4dZsW8uHj6gMa5NePkLiUwSoDrCtq3J";

/// Run the full distribution against `ledger`.
pub async fn run<L: Ledger>(ledger: &L, signer: &Signer, plan: &DistributionPlan) -> Result<()> {
    let authority = signer.address();
    let proxies = create_proxies(ledger, signer, plan.len()).await?;
    fund_proxies(ledger, signer, &proxies).await?;
    delegate_to_multisig(ledger, signer, &authority, &proxies).await?;
    distribute(ledger, signer, plan, &proxies).await?;
    Ok(())
}

/// Step 1: register one anonymous proxy account per grant, indices
/// counting up from `PROXY_INDEX_BASE`.
async fn create_proxies<L: Ledger>(
    ledger: &L,
    signer: &Signer,
    count: usize,
) -> Result<Vec<String>> {
    info!(count, "creating anonymous proxies");
    let calls: Vec<Call> = (0..count)
        .map(|i| Call::CreateProxy { index: PROXY_INDEX_BASE + i as u32 })
        .collect();
    let events = ledger
        .submit_batch(signer, &calls)
        .await
        .context("proxy creation batch failed")?;

    let proxies: Vec<String> = events
        .into_iter()
        .filter_map(|event| match event {
            Event::ProxyCreated { proxy } => Some(proxy),
            _ => None,
        })
        .collect();
    ensure!(
        proxies.len() == count,
        "not all proxies created: expected {count}, got {}",
        proxies.len()
    );
    info!(count = proxies.len(), "proxies created");
    debug!(?proxies, "proxy accounts");
    Ok(proxies)
}

/// Step 2: float each proxy so it can pay its own fees under multisig
/// control.
async fn fund_proxies<L: Ledger>(ledger: &L, signer: &Signer, proxies: &[String]) -> Result<()> {
    let float = Amount::from_tokens(PROXY_FUNDING_TOKENS);
    info!(count = proxies.len(), float = %float, "funding proxies");
    let calls: Vec<Call> = proxies
        .iter()
        .map(|proxy| Call::Transfer { dest: proxy.clone(), amount: float })
        .collect();
    let events = ledger
        .submit_batch(signer, &calls)
        .await
        .context("proxy funding batch failed")?;

    let transfers = events.iter().filter(|e| matches!(e, Event::Transfer { .. })).count();
    ensure!(
        transfers == proxies.len(),
        "not all proxies funded: expected {}, got {transfers}",
        proxies.len()
    );
    info!("all proxies funded");
    Ok(())
}

/// Step 3: replace the distribution authority with the multisig as each
/// proxy's controller.
async fn delegate_to_multisig<L: Ledger>(
    ledger: &L,
    signer: &Signer,
    authority: &str,
    proxies: &[String],
) -> Result<()> {
    info!(multisig = CONTROLLER_MULTISIG, "changing delegate to multisig");
    let mut calls = Vec::with_capacity(proxies.len() * 2);
    for proxy in proxies {
        calls.push(Call::RemoveDelegate { proxy: proxy.clone(), delegate: authority.to_string() });
        calls.push(Call::AddDelegate {
            proxy: proxy.clone(),
            delegate: CONTROLLER_MULTISIG.to_string(),
        });
    }
    let events = ledger
        .submit_batch(signer, &calls)
        .await
        .context("delegation batch failed")?;

    let mut added = 0usize;
    for event in &events {
        if let Event::DelegateAdded { delegate, .. } = event {
            ensure!(
                delegate == CONTROLLER_MULTISIG,
                "proxy delegated to {delegate}, expected the multisig"
            );
            added += 1;
        }
    }
    ensure!(
        added == proxies.len(),
        "not all proxies delegated: expected {}, got {added}",
        proxies.len()
    );
    info!("all proxies delegated to multisig");
    Ok(())
}

/// Step 4: top up the vesting pot with the grand total, then issue every
/// vested transfer.
async fn distribute<L: Ledger>(
    ledger: &L,
    signer: &Signer,
    plan: &DistributionPlan,
    proxies: &[String],
) -> Result<()> {
    let vesting_pot = module_account(VESTING_MODULE_ID)?;
    info!(total = %plan.grand_total(), pot = %vesting_pot, "distributing funds");

    let mut calls = Vec::with_capacity(plan.len() + 1);
    calls.push(Call::Transfer { dest: vesting_pot, amount: plan.grand_total() });
    for (grant, proxy) in plan.grants().iter().zip(proxies) {
        calls.push(Call::VestedTransfer { dest: proxy.clone(), schedule: grant.schedule.clone() });
    }
    let events = ledger
        .submit_batch(signer, &calls)
        .await
        .context("distribution batch failed")?;

    let mut transferred: u128 = 0;
    for event in &events {
        if let Event::Transfer { amount, .. } = event {
            transferred = transferred
                .checked_add(amount.units())
                .ok_or_else(|| anyhow!("transfer amounts overflow"))?;
        }
    }
    // The pot top-up moves the grand total; the vested transfers move the
    // scheduled portion. Remainders stay with the authority.
    let expected = plan.grand_total().units() + plan.scheduled_units();
    ensure!(
        transferred == expected,
        "distributed {transferred} base units, expected {expected}"
    );
    info!(
        distributed = plan.scheduled_units(),
        dust = plan.remainder_units(),
        "funds distributed"
    );
    Ok(())
}
