use std::str::FromStr;

use alloy::primitives::{Address, U256};
use serde::Deserialize;

use crate::types::{Amount, Timestamp};

/// Default custody address of the ledger.
pub const DEFAULT_LEDGER_ADDRESS: &str = "0x00000000000000000000000000000000000f4a11";

/// Default address of the collateral token.
pub const DEFAULT_COLLATERAL_ADDRESS: &str = "0x000000000000000000000000000000000000da10";

/// Default address of the reward token.
pub const DEFAULT_REWARD_ADDRESS: &str = "0x0000000000000000000000000000000000019e1d";

/// Log output format for binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Path of the scenario file replayed by the simulator
    pub scenario_path: String,

    /// Custody address of the ledger
    pub ledger_address: Address,

    /// Address of the collateral token
    pub collateral_address: Address,

    /// Address of the reward token
    pub reward_address: Address,

    /// Initial collateral supply minted to the deployer (default: 1_000_000_000_000)
    pub collateral_supply: Amount,

    /// Starting time of the simulated clock (default: now)
    pub genesis_timestamp: Timestamp,

    /// Log output format (default: pretty)
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let address = |key: &str, default: &str| -> anyhow::Result<Address> {
            let raw = lookup(key).unwrap_or_else(|| default.to_string());
            Address::from_str(raw.trim())
                .map_err(|_| anyhow::anyhow!("{key} must be a 20-byte hex address"))
        };

        Ok(Self {
            scenario_path: lookup("SCENARIO_PATH").unwrap_or_else(|| "scenario.json".to_string()),
            ledger_address: address("LEDGER_ADDRESS", DEFAULT_LEDGER_ADDRESS)?,
            collateral_address: address("COLLATERAL_ADDRESS", DEFAULT_COLLATERAL_ADDRESS)?,
            reward_address: address("REWARD_ADDRESS", DEFAULT_REWARD_ADDRESS)?,
            collateral_supply: lookup("COLLATERAL_SUPPLY")
                .unwrap_or_else(|| "1000000000000".to_string())
                .trim()
                .parse::<U256>()
                .map_err(|_| anyhow::anyhow!("COLLATERAL_SUPPLY must be a valid uint256"))?,
            genesis_timestamp: match lookup("GENESIS_TIMESTAMP") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("GENESIS_TIMESTAMP must be a valid u64"))?,
                None => chrono::Utc::now().timestamp().max(0) as u64,
            },
            log_format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                None | Some("pretty") => LogFormat::Pretty,
                Some("json") => LogFormat::Json,
                Some(other) => {
                    anyhow::bail!("LOG_FORMAT must be `pretty` or `json`, got `{other}`")
                }
            },
        })
    }
}
