//! Ledger client: batched calls, inclusion events, and the JSON-RPC
//! implementation.
//!
//! The distribution treats the node as an opaque collaborator with one
//! capability that matters: sign and submit a batch of operations
//! atomically, block until the batch lands in a block (or is rejected),
//! and return the events it emitted. No retries, no partial success: a
//! failed batch fails the whole run.

use anyhow::{Context, Result, bail};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use vestdrop_core::amount::Amount;
use vestdrop_core::vesting::VestingSchedule;

use crate::keys::Signer;

/// One operation in an atomic batch.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    /// Register an anonymous proxy account, derived from the submitting
    /// authority and `index`, controlled by the authority.
    CreateProxy { index: u32 },
    /// Move `amount` from the submitting authority to `dest`.
    Transfer { dest: String, amount: Amount },
    /// Remove `delegate` as a controller of `proxy`.
    RemoveDelegate { proxy: String, delegate: String },
    /// Add `delegate` as a controller of `proxy`.
    AddDelegate { proxy: String, delegate: String },
    /// Move the schedule's locked amount to `dest`, released per the
    /// vesting terms.
    VestedTransfer { dest: String, schedule: VestingSchedule },
}

/// An event emitted by a confirmed batch. Events the pipeline does not
/// assert on are skipped at parse time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    ProxyCreated { proxy: String },
    Transfer { from: String, to: String, amount: Amount },
    DelegateAdded { proxy: String, delegate: String },
}

/// Basic node identification, logged at startup.
#[derive(Clone, Debug)]
pub struct ChainInfo {
    pub chain: String,
    pub version: String,
}

/// The ledger capability the pipeline runs against.
pub trait Ledger {
    /// Chain name and node version.
    async fn chain_info(&self) -> Result<ChainInfo>;

    /// Sign and submit `calls` as one atomic batch, wait for inclusion,
    /// and return the emitted events. Rejection or non-inclusion is an
    /// error.
    async fn submit_batch(&self, signer: &Signer, calls: &[Call]) -> Result<Vec<Event>>;
}

/// JSON-RPC implementation over HTTP.
pub struct RpcLedger {
    client: HttpClient,
}

impl RpcLedger {
    pub fn connect(endpoint: &str) -> Result<Self> {
        let client = HttpClientBuilder::default()
            .build(endpoint)
            .context("Failed to build RPC client")?;
        Ok(Self { client })
    }
}

impl Ledger for RpcLedger {
    async fn chain_info(&self) -> Result<ChainInfo> {
        let info: serde_json::Value = self
            .client
            .request("getinfo", ArrayParams::new())
            .await
            .context("RPC getinfo failed")?;
        Ok(ChainInfo {
            chain: info["chain"].as_str().unwrap_or("unknown").to_string(),
            version: info["version"].as_str().unwrap_or("unknown").to_string(),
        })
    }

    async fn submit_batch(&self, signer: &Signer, calls: &[Call]) -> Result<Vec<Event>> {
        let payload = serde_json::to_vec(&json!({
            "signer": signer.address(),
            "calls": calls,
        }))
        .context("Failed to serialize batch")?;

        let envelope = json!({
            "payload": hex::encode(&payload),
            "pubkey": signer.public_key_hex(),
            "signature": signer.sign(&payload),
        });

        let mut params = ArrayParams::new();
        params.insert(envelope).unwrap();

        // The node holds the request open until the batch is included in a
        // block or rejected; the receipt carries the emitted events.
        let receipt: serde_json::Value = self
            .client
            .request("submitbatch", params)
            .await
            .context("RPC submitbatch failed")?;

        let Some(block) = receipt["block"].as_str() else {
            bail!("batch was not included in a block");
        };
        debug!(block, calls = calls.len(), "batch included");

        let events = receipt["events"].as_array().map(Vec::as_slice).unwrap_or_default();
        Ok(events.iter().filter_map(parse_event).collect())
    }
}

/// Parse one event object from a receipt into typed values.
fn parse_event(event: &serde_json::Value) -> Option<Event> {
    let data = &event["data"];
    match event["method"].as_str()? {
        "ProxyCreated" => Some(Event::ProxyCreated { proxy: data["proxy"].as_str()?.to_string() }),
        "Transfer" => Some(Event::Transfer {
            from: data["from"].as_str()?.to_string(),
            to: data["to"].as_str()?.to_string(),
            amount: Amount::from_units(data["amount"].as_str()?.parse().ok()?),
        }),
        "DelegateAdded" => Some(Event::DelegateAdded {
            proxy: data["proxy"].as_str()?.to_string(),
            delegate: data["delegate"].as_str()?.to_string(),
        }),
        _ => None,
    }
}
