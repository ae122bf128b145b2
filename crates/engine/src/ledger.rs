//! Accrual ledger: per-account principal and pending yield.
//!
//! Every mutating operation is all-or-nothing. Preconditions and arithmetic
//! are evaluated on a working copy of the account's entry; the copy is
//! written back only after every external asset call has succeeded.
//!
//! # Known accrual gaps
//!
//! Both are deliberate and must be kept:
//! - `remove_liquidity` does not run the accrual step. Yield owed on the
//!   withdrawn principal since the last deposit is never captured; the next
//!   deposit or claim accrues against the reduced principal for the whole
//!   period since that deposit.
//! - The accrual step never moves `last_accrual_time`; only deposits do. A
//!   claim therefore does not reset the accrual window, and a later claim
//!   without an intervening deposit accrues over the same period again.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use yield_assets::{CollateralAsset, MintCapability, RewardAsset};
use yield_common::error::{AssetError, LedgerError};
use yield_common::types::{Amount, LedgerEntry, LedgerEvent};

use crate::accrual;
use crate::clock::Clock;
use crate::snapshot::{AccountSnapshot, LedgerSnapshot};

/// Yield-accrual ledger holding collateral in custody at `address`.
pub struct AccrualLedger<C, R, K> {
    address: Address,
    entries: HashMap<Address, LedgerEntry>,
    collateral: C,
    reward: R,
    mint_capability: MintCapability,
    clock: K,
    events: Vec<LedgerEvent>,
}

impl<C, R, K> AccrualLedger<C, R, K>
where
    C: CollateralAsset,
    R: RewardAsset,
    K: Clock,
{
    /// Create a ledger with custody account `address`.
    ///
    /// `mint_capability` must have been issued by `reward` to `address`.
    pub fn new(
        address: Address,
        collateral: C,
        reward: R,
        mint_capability: MintCapability,
        clock: K,
    ) -> Result<Self, LedgerError> {
        if mint_capability.asset() != reward.address() || mint_capability.holder() != address {
            return Err(LedgerError::Reward(AssetError::Unauthorized {
                caller: mint_capability.holder(),
            }));
        }

        tracing::info!(
            ledger = %address,
            collateral = %collateral.address(),
            reward = %reward.address(),
            "Accrual ledger created"
        );

        Ok(Self {
            address,
            entries: HashMap::new(),
            collateral,
            reward,
            mint_capability,
            clock,
            events: Vec::new(),
        })
    }

    /// Deposit `amount` of collateral from `account` into custody.
    ///
    /// Sets `last_accrual_time` to the current time, or keeps the stored one if
    /// the clock reads earlier than it.
    pub fn deposit_liquidity(
        &mut self,
        account: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let owned = self.collateral.balance_of(account);
        if amount.is_zero() || owned < amount {
            tracing::debug!(
                account = %account,
                amount = %amount,
                owned = %owned,
                "Deposit rejected"
            );
            return Err(LedgerError::InvalidAmount {
                reason: "no tokens deposited or more tokens than owned",
            });
        }

        let approved = self.collateral.allowance(account, self.address);
        if approved < amount {
            tracing::debug!(
                account = %account,
                amount = %amount,
                approved = %approved,
                "Deposit rejected"
            );
            return Err(LedgerError::InsufficientAllowance {
                account,
                requested: amount,
                approved,
            });
        }

        let now = self.clock.now();
        let mut entry = accrual::accrue(&self.entry(account), now)?;
        entry.principal = entry
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                context: "adding deposit to principal",
            })?;
        entry.last_accrual_time = entry.last_accrual_time.max(now);

        self.collateral
            .transfer_from(self.address, account, self.address, amount)
            .map_err(|e| {
                tracing::warn!(account = %account, error = %e, "Collateral pull failed");
                LedgerError::Collateral(e)
            })?;

        self.entries.insert(account, entry);
        self.emit(LedgerEvent::DepositedLiquidity { account, amount });

        tracing::info!(
            account = %account,
            amount = %amount,
            principal = %entry.principal,
            pending_yield = %entry.pending_yield,
            "Liquidity deposited"
        );
        Ok(())
    }

    /// Return `amount` of deposited collateral to `account`.
    ///
    /// Does not accrue; see the module docs.
    pub fn remove_liquidity(
        &mut self,
        account: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount {
                reason: "cannot remove zero liquidity",
            });
        }

        let mut entry = self.entry(account);
        if amount > entry.principal {
            tracing::debug!(
                account = %account,
                amount = %amount,
                deposited = %entry.principal,
                "Removal rejected"
            );
            return Err(LedgerError::InsufficientBalance {
                account,
                requested: amount,
                deposited: entry.principal,
            });
        }
        entry.principal -= amount;

        self.collateral
            .transfer(self.address, account, amount)
            .map_err(|e| {
                tracing::warn!(account = %account, error = %e, "Collateral push failed");
                LedgerError::Collateral(e)
            })?;

        self.entries.insert(account, entry);
        self.emit(LedgerEvent::RemovedLiquidity { account, amount });

        tracing::info!(
            account = %account,
            amount = %amount,
            principal = %entry.principal,
            "Liquidity removed"
        );
        Ok(())
    }

    /// Accrue, then mint all pending yield to `account`. Returns the amount minted.
    pub fn claim_yield(&mut self, account: Address) -> Result<Amount, LedgerError> {
        let mut entry = accrual::accrue(&self.entry(account), self.clock.now())?;
        let amount = entry.pending_yield;
        if amount.is_zero() {
            return Err(LedgerError::NothingToClaim { account });
        }

        self.reward
            .mint(&self.mint_capability, account, amount)
            .map_err(|e| {
                tracing::warn!(account = %account, error = %e, "Reward mint failed");
                LedgerError::Reward(e)
            })?;

        entry.pending_yield = U256::ZERO;
        self.entries.insert(account, entry);
        self.emit(LedgerEvent::YieldClaimed { account, amount });

        tracing::info!(account = %account, amount = %amount, "Yield claimed");
        Ok(amount)
    }

    /// Whether `account` currently has principal deposited.
    pub fn is_earning(&self, account: Address) -> bool {
        !self.entry(account).principal.is_zero()
    }

    /// Principal deposited by `account`.
    pub fn balances(&self, account: Address) -> Amount {
        self.entry(account).principal
    }

    /// Yield accrued for `account` and not yet claimed, as of its last accrual.
    pub fn yield_balances(&self, account: Address) -> Amount {
        self.entry(account).pending_yield
    }

    /// The entry for `account`; all zeroes if it never deposited.
    pub fn entry(&self, account: Address) -> LedgerEntry {
        self.entries.get(&account).copied().unwrap_or_default()
    }

    /// What the next accrual step would add for `account` at the current time.
    pub fn accrued_since_last_deposit(&self, account: Address) -> Result<Amount, LedgerError> {
        let entry = self.entry(account);
        accrual::accrued_yield(
            entry.principal,
            accrual::elapsed(entry.last_accrual_time, self.clock.now()),
        )
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn collateral(&self) -> &C {
        &self.collateral
    }

    /// Mutable access for funding and approvals made outside the ledger.
    pub fn collateral_mut(&mut self) -> &mut C {
        &mut self.collateral
    }

    pub fn reward(&self) -> &R {
        &self.reward
    }

    pub fn reward_mut(&mut self) -> &mut R {
        &mut self.reward
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Events emitted since the ledger was created or last drained.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let accounts = self
            .entries
            .iter()
            .map(|(account, entry)| AccountSnapshot {
                account: *account,
                entry: *entry,
            })
            .collect();
        LedgerSnapshot::new(self.clock.now(), accounts, self.events.clone())
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use yield_assets::{MockCollateral, YieldToken};
    use yield_common::types::SECONDS_PER_YEAR;

    const FARM: Address = Address::repeat_byte(0xF0);
    const DEPLOYER: Address = Address::repeat_byte(0x01);
    const ALICE: Address = Address::repeat_byte(0xA1);

    type TestLedger = AccrualLedger<MockCollateral, YieldToken, ManualClock>;

    fn amount(v: u64) -> Amount {
        U256::from(v)
    }

    fn make_ledger() -> (TestLedger, ManualClock) {
        let clock = ManualClock::new(1_000);
        let mut collateral =
            MockCollateral::new(Address::repeat_byte(0xDA), DEPLOYER, amount(1_000_000));
        collateral.transfer(DEPLOYER, ALICE, amount(1_000)).unwrap();
        let mut reward = YieldToken::new(Address::repeat_byte(0x19), DEPLOYER);
        let cap = reward.transfer_ownership(DEPLOYER, FARM).unwrap();
        let ledger = AccrualLedger::new(FARM, collateral, reward, cap, clock.clone()).unwrap();
        (ledger, clock)
    }

    #[test]
    fn test_rejects_capability_for_another_holder() {
        let collateral = MockCollateral::new(Address::repeat_byte(0xDA), DEPLOYER, amount(1));
        let mut reward = YieldToken::new(Address::repeat_byte(0x19), DEPLOYER);
        let cap = reward.transfer_ownership(DEPLOYER, ALICE).unwrap();
        let result = AccrualLedger::new(FARM, collateral, reward, cap, ManualClock::new(0));
        assert!(matches!(result, Err(LedgerError::Reward(AssetError::Unauthorized { .. }))));
    }

    #[test]
    fn test_deposit_keeps_later_accrual_time_when_clock_reads_earlier() {
        let (mut ledger, clock) = make_ledger();
        ledger.collateral_mut().approve(ALICE, FARM, amount(20));
        clock.set(5_000);
        ledger.deposit_liquidity(ALICE, amount(10)).unwrap();

        clock.set(4_000);
        ledger.deposit_liquidity(ALICE, amount(10)).unwrap();

        let entry = ledger.entry(ALICE);
        assert_eq!(entry.principal, amount(20));
        assert_eq!(entry.pending_yield, U256::ZERO);
        assert_eq!(entry.last_accrual_time, 5_000);
    }

    #[test]
    fn test_deposit_sets_last_accrual_time() {
        let (mut ledger, clock) = make_ledger();
        ledger.collateral_mut().approve(ALICE, FARM, amount(10));
        clock.advance(500);
        ledger.deposit_liquidity(ALICE, amount(10)).unwrap();

        let entry = ledger.entry(ALICE);
        assert_eq!(entry.principal, amount(10));
        assert_eq!(entry.pending_yield, U256::ZERO);
        assert_eq!(entry.last_accrual_time, 1_500);
        assert_eq!(ledger.collateral().balance_of(FARM), amount(10));
    }

    #[test]
    fn test_same_timestamp_deposits_accrue_nothing() {
        let (mut ledger, _clock) = make_ledger();
        ledger.collateral_mut().approve(ALICE, FARM, amount(200));
        ledger.deposit_liquidity(ALICE, amount(100)).unwrap();
        ledger.deposit_liquidity(ALICE, amount(100)).unwrap();
        assert_eq!(ledger.yield_balances(ALICE), U256::ZERO);
        assert_eq!(ledger.balances(ALICE), amount(200));
    }

    #[test]
    fn test_accrued_preview_does_not_mutate() {
        let (mut ledger, clock) = make_ledger();
        ledger.collateral_mut().approve(ALICE, FARM, amount(10));
        ledger.deposit_liquidity(ALICE, amount(10)).unwrap();
        clock.advance(SECONDS_PER_YEAR);

        assert_eq!(ledger.accrued_since_last_deposit(ALICE).unwrap(), amount(10));
        assert_eq!(ledger.yield_balances(ALICE), U256::ZERO);
    }

    #[test]
    fn test_claim_keeps_last_accrual_time() {
        let (mut ledger, clock) = make_ledger();
        ledger.collateral_mut().approve(ALICE, FARM, amount(10));
        ledger.deposit_liquidity(ALICE, amount(10)).unwrap();
        clock.advance(SECONDS_PER_YEAR);

        assert_eq!(ledger.claim_yield(ALICE).unwrap(), amount(10));
        assert_eq!(ledger.entry(ALICE).last_accrual_time, 1_000);
    }

    #[test]
    fn test_drain_events() {
        let (mut ledger, _clock) = make_ledger();
        ledger.collateral_mut().approve(ALICE, FARM, amount(10));
        ledger.deposit_liquidity(ALICE, amount(10)).unwrap();
        assert_eq!(ledger.drain_events().len(), 1);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_snapshot_reflects_entries() {
        let (mut ledger, _clock) = make_ledger();
        ledger.collateral_mut().approve(ALICE, FARM, amount(10));
        ledger.deposit_liquidity(ALICE, amount(10)).unwrap();

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.timestamp, 1_000);
        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.total_principal, amount(10));
        assert_eq!(snapshot.events.len(), 1);
    }
}
