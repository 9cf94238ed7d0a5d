use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use url::Url;

const DEFAULT_CONTRACT_ADDRESS: &str = "SP1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRCBGD7R";
const DEFAULT_CONTRACT_NAME: &str = "passkey-wallet";
const DEFAULT_NETWORK: &str = "testnet";
const DEFAULT_API_URL: &str = "https://api.testnet.hiro.so";

/// Monitor configuration, read from the environment with hardcoded
/// defaults: CONTRACT_ADDRESS, CONTRACT_NAME, STACKS_NETWORK,
/// STACKS_API_URL.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub contract_address: String,
    pub contract_name: String,
    pub stacks_network: String,
    pub stacks_api_url: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("contract_address", DEFAULT_CONTRACT_ADDRESS)?
            .set_default("contract_name", DEFAULT_CONTRACT_NAME)?
            .set_default("stacks_network", DEFAULT_NETWORK)?
            .set_default("stacks_api_url", DEFAULT_API_URL)?
            .add_source(Environment::default());

        let cfg: AppConfig = builder.build()?.try_deserialize()?;

        // Catch a malformed base URL at startup instead of as a fetch error.
        Url::parse(&cfg.stacks_api_url)
            .map_err(|e| ConfigError::Message(format!("invalid STACKS_API_URL: {e}")))?;

        Ok(cfg)
    }

    /// Fully qualified contract identifier, `address.name`.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }
}
