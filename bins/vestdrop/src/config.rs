//! Configuration loaded from environment variables.
//!
//! Two parameters only: the signing secret and the node endpoint. The
//! allocation data itself is compiled in; there is nothing else to
//! configure.

/// Well-known development seed, for rehearsal runs against a local node.
/// A real run always sets `VESTDROP_ACCOUNT_SECRET`.
pub const DEV_ACCOUNT_SECRET: &str =
    "0101010101010101010101010101010101010101010101010101010101010101";

#[derive(Clone, Debug)]
pub struct Config {
    /// Hex-encoded 32-byte seed of the distribution authority.
    pub account_secret: String,
    /// Ledger node JSON-RPC endpoint.
    pub rpc_endpoint: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let account_secret = std::env::var("VESTDROP_ACCOUNT_SECRET")
            .unwrap_or_else(|_| DEV_ACCOUNT_SECRET.to_string());

        let rpc_endpoint = std::env::var("VESTDROP_RPC_ENDPOINT")
            .unwrap_or_else(|_| "http://127.0.0.1:9933".to_string());

        Config { account_secret, rpc_endpoint }
    }
}
