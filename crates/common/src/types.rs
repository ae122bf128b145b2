use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed-point free token amount, matching the EVM `uint256` word.
pub type Amount = U256;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Seconds in a 365-day year. The reward rate is 100% of principal per year.
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

/// Per-account ledger state.
///
/// An account that never deposited is indistinguishable from one whose entry
/// is all zeroes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Collateral currently held in custody for the account.
    pub principal: Amount,
    /// Reward units accrued but not yet minted.
    pub pending_yield: Amount,
    /// Time of the last deposit.
    pub last_accrual_time: Timestamp,
}

/// Kinds of observable ledger events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DepositedLiquidity,
    RemovedLiquidity,
    YieldClaimed,
}

impl EventType {
    /// Solidity-style event signature used to derive the log topic.
    pub fn signature(&self) -> &'static str {
        match self {
            EventType::DepositedLiquidity => "DepositedLiquidity(address,uint256)",
            EventType::RemovedLiquidity => "RemovedLiquidity(address,uint256)",
            EventType::YieldClaimed => "YieldClaimed(address,uint256)",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::DepositedLiquidity => write!(f, "deposited_liquidity"),
            EventType::RemovedLiquidity => write!(f, "removed_liquidity"),
            EventType::YieldClaimed => write!(f, "yield_claimed"),
        }
    }
}

/// An event emitted by a committed ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    DepositedLiquidity { account: Address, amount: Amount },
    RemovedLiquidity { account: Address, amount: Amount },
    YieldClaimed { account: Address, amount: Amount },
}

impl LedgerEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            LedgerEvent::DepositedLiquidity { .. } => EventType::DepositedLiquidity,
            LedgerEvent::RemovedLiquidity { .. } => EventType::RemovedLiquidity,
            LedgerEvent::YieldClaimed { .. } => EventType::YieldClaimed,
        }
    }

    pub fn account(&self) -> Address {
        match self {
            LedgerEvent::DepositedLiquidity { account, .. }
            | LedgerEvent::RemovedLiquidity { account, .. }
            | LedgerEvent::YieldClaimed { account, .. } => *account,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            LedgerEvent::DepositedLiquidity { amount, .. }
            | LedgerEvent::RemovedLiquidity { amount, .. }
            | LedgerEvent::YieldClaimed { amount, .. } => *amount,
        }
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.event_type() {
            EventType::DepositedLiquidity => "DepositedLiquidity",
            EventType::RemovedLiquidity => "RemovedLiquidity",
            EventType::YieldClaimed => "YieldClaimed",
        };
        write!(f, "{}({}, {})", name, self.account(), self.amount())
    }
}

/// A ledger event recovered from an EVM log, ready for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedEvent {
    pub log_index: Option<u64>,
    pub block_number: u64,
    pub block_timestamp: DateTime<Utc>,
    /// Address of the contract that emitted the log.
    pub address: String,
    pub event_type: EventType,
    pub decoded_data: serde_json::Value,
}
