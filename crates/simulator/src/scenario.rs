//! Scenario file format.
//!
//! ```json
//! {
//!   "accounts": [
//!     { "address": "0x00000000000000000000000000000000000000a1", "funding": 1000, "approval": 20 }
//!   ],
//!   "steps": [
//!     { "action": "deposit", "account": "0x00000000000000000000000000000000000000a1", "amount": 10 },
//!     { "action": "advance", "seconds": 31536000 },
//!     { "action": "claim", "account": "0x00000000000000000000000000000000000000a1" }
//!   ]
//! }
//! ```
//!
//! Amounts may be JSON numbers or decimal / `0x` hex strings.

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use yield_common::types::Amount;

/// Default deployer of both tokens.
pub const DEFAULT_DEPLOYER: Address = Address::repeat_byte(0x01);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Account that receives the collateral supply and initially owns the reward token.
    #[serde(default = "default_deployer")]
    pub deployer: Address,
    #[serde(default)]
    pub accounts: Vec<AccountSetup>,
    pub steps: Vec<Step>,
}

fn default_deployer() -> Address {
    DEFAULT_DEPLOYER
}

impl Scenario {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Initial funding and approval for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSetup {
    pub address: Address,
    /// Collateral transferred from the deployer before the first step.
    #[serde(default)]
    pub funding: AmountArg,
    /// Allowance granted to the ledger before the first step.
    #[serde(default)]
    pub approval: AmountArg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Deposit { account: Address, amount: AmountArg },
    Remove { account: Address, amount: AmountArg },
    Claim { account: Address },
    /// Replace the account's allowance to the ledger.
    Approve { account: Address, amount: AmountArg },
    /// Move the clock forward.
    Advance { seconds: u64 },
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Deposit { account, amount } => write!(f, "deposit {} from {}", amount, account),
            Step::Remove { account, amount } => write!(f, "remove {} to {}", amount, account),
            Step::Claim { account } => write!(f, "claim for {}", account),
            Step::Approve { account, amount } => write!(f, "approve {} by {}", amount, account),
            Step::Advance { seconds } => write!(f, "advance {}s", seconds),
        }
    }
}

/// Amount as written in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountArg {
    Number(u64),
    Text(String),
}

impl Default for AmountArg {
    fn default() -> Self {
        AmountArg::Number(0)
    }
}

impl AmountArg {
    pub fn value(&self) -> anyhow::Result<Amount> {
        match self {
            AmountArg::Number(n) => Ok(U256::from(*n)),
            AmountArg::Text(s) => U256::from_str(s.trim())
                .map_err(|_| anyhow::anyhow!("`{s}` is not a valid uint256 amount")),
        }
    }
}

impl std::fmt::Display for AmountArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountArg::Number(n) => write!(f, "{}", n),
            AmountArg::Text(s) => write!(f, "{}", s),
        }
    }
}
