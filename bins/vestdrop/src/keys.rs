//! Signing keys and address derivation for the distribution authority.
//!
//! Addresses are Base58Check: a version byte, the BLAKE3 hash of the
//! Ed25519 public key, and a 4-byte BLAKE3 checksum over both. Ledger
//! modules own sovereign accounts whose "public key" is the module
//! identifier padded with zero bytes to the full key length.

use anyhow::{Context, Result, anyhow, bail};
use ed25519_dalek::{Signature, Signer as _, SigningKey};

/// Version byte prefixed to every address payload.
pub const ADDRESS_VERSION: u8 = 0x2a;

/// Module identifier of the vesting pot account.
pub const VESTING_MODULE_ID: &str = "mod/vesting";

/// The distribution authority's signing key.
pub struct Signer {
    key: SigningKey,
}

impl Signer {
    /// Build a signer from a hex-encoded 32-byte seed.
    pub fn from_hex_seed(seed_hex: &str) -> Result<Self> {
        let bytes = hex::decode(seed_hex.trim()).context("account secret is not valid hex")?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("account secret must be exactly 32 bytes (64 hex characters)"))?;
        Ok(Self { key: SigningKey::from_bytes(&seed) })
    }

    /// The authority's on-ledger address.
    pub fn address(&self) -> String {
        encode_address(self.key.verifying_key().as_bytes())
    }

    /// Hex-encoded public key, sent alongside every signed batch.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }

    /// Detached signature over `payload`, hex-encoded.
    pub fn sign(&self, payload: &[u8]) -> String {
        let signature: Signature = self.key.sign(payload);
        hex::encode(signature.to_bytes())
    }
}

/// Sovereign account of a ledger module: the module identifier padded
/// with zero bytes to the 32-byte key length, encoded like any public key.
pub fn module_account(module_id: &str) -> Result<String> {
    let id = module_id.as_bytes();
    if id.len() > 32 {
        bail!("module id longer than 32 bytes: {module_id:?}");
    }
    let mut key = [0u8; 32];
    key[..id.len()].copy_from_slice(id);
    Ok(encode_address(&key))
}

/// Base58Check-encode a public key as an address.
pub fn encode_address(pubkey: &[u8; 32]) -> String {
    let mut payload = Vec::with_capacity(1 + 32 + 4);
    payload.push(ADDRESS_VERSION);
    payload.extend_from_slice(blake3::hash(pubkey).as_bytes());
    let checksum = blake3::hash(&payload);
    payload.extend_from_slice(&checksum.as_bytes()[..4]);
    bs58::encode(payload).into_string()
}
