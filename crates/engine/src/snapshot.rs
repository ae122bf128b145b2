//! Serializable point-in-time view of the ledger.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use yield_common::types::{Amount, LedgerEntry, LedgerEvent, Timestamp};

/// One account's entry as captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: Address,
    #[serde(flatten)]
    pub entry: LedgerEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Clock reading when the snapshot was taken.
    pub timestamp: Timestamp,
    /// Entries ordered by account address.
    pub accounts: Vec<AccountSnapshot>,
    pub events: Vec<LedgerEvent>,
    pub total_principal: Amount,
    pub total_pending_yield: Amount,
}

impl LedgerSnapshot {
    pub fn new(
        timestamp: Timestamp,
        mut accounts: Vec<AccountSnapshot>,
        events: Vec<LedgerEvent>,
    ) -> Self {
        accounts.sort_by_key(|a| a.account);
        let total_principal = accounts
            .iter()
            .fold(U256::ZERO, |acc, a| acc.saturating_add(a.entry.principal));
        let total_pending_yield = accounts
            .iter()
            .fold(U256::ZERO, |acc, a| acc.saturating_add(a.entry.pending_yield));
        Self {
            timestamp,
            accounts,
            events,
            total_principal,
            total_pending_yield,
        }
    }

    pub fn entry(&self, account: Address) -> Option<&LedgerEntry> {
        self.accounts
            .iter()
            .find(|a| a.account == account)
            .map(|a| &a.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8, principal: u64, pending: u64) -> AccountSnapshot {
        AccountSnapshot {
            account: Address::repeat_byte(byte),
            entry: LedgerEntry {
                principal: U256::from(principal),
                pending_yield: U256::from(pending),
                last_accrual_time: 0,
            },
        }
    }

    #[test]
    fn test_snapshot_sorts_and_totals() {
        let snapshot = LedgerSnapshot::new(
            42,
            vec![account(0xBB, 20, 1), account(0xAA, 10, 2)],
            Vec::new(),
        );
        assert_eq!(snapshot.accounts[0].account, Address::repeat_byte(0xAA));
        assert_eq!(snapshot.total_principal, U256::from(30u64));
        assert_eq!(snapshot.total_pending_yield, U256::from(3u64));
        assert_eq!(
            snapshot.entry(Address::repeat_byte(0xBB)).unwrap().principal,
            U256::from(20u64)
        );
        assert!(snapshot.entry(Address::repeat_byte(0xCC)).is_none());
    }

    #[test]
    fn test_snapshot_json_flattens_entries() {
        let snapshot = LedgerSnapshot::new(1, vec![account(0xAA, 10, 0)], Vec::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["accounts"][0].get("principal").is_some());
        assert!(json["accounts"][0].get("account").is_some());
    }
}
