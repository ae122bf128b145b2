//! In-memory collateral token with balances and allowances.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use yield_common::error::AssetError;
use yield_common::types::Amount;

use crate::CollateralAsset;

/// Stand-in collateral token. The whole supply starts with the deployer.
#[derive(Debug, Clone)]
pub struct MockCollateral {
    address: Address,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    /// When set, the next transfer fails without moving funds.
    fail_next_transfer: Option<String>,
}

impl MockCollateral {
    pub fn new(address: Address, deployer: Address, supply: Amount) -> Self {
        let mut balances = HashMap::new();
        if !supply.is_zero() {
            balances.insert(deployer, supply);
        }
        Self {
            address,
            total_supply: supply,
            balances,
            allowances: HashMap::new(),
            fail_next_transfer: None,
        }
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Set the amount `spender` may pull from `owner`, replacing any previous value.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
        tracing::debug!(
            token = %self.address,
            owner = %owner,
            spender = %spender,
            amount = %amount,
            "Approval set"
        );
    }

    /// Make the next `transfer` or `transfer_from` fail with `reason`.
    pub fn fail_next_transfer(&mut self, reason: impl Into<String>) {
        self.fail_next_transfer = Some(reason.into());
    }

    fn take_injected_failure(&mut self) -> Result<(), AssetError> {
        match self.fail_next_transfer.take() {
            Some(reason) => Err(AssetError::Rejected(reason)),
            None => Ok(()),
        }
    }

    /// Validate and apply a balance move. Nothing changes on error.
    fn move_balance(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                account: from,
                requested: amount,
                available,
            });
        }
        if from == to || amount.is_zero() {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(AssetError::Overflow { asset: self.address })?;

        self.set_balance(from, available - amount);
        self.set_balance(to, credited);
        Ok(())
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }
}

impl CollateralAsset for MockCollateral {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(U256::ZERO)
    }

    fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AssetError> {
        self.take_injected_failure()?;
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError> {
        self.take_injected_failure()?;

        let approved = self.allowance(from, spender);
        if approved < amount {
            return Err(AssetError::InsufficientAllowance {
                owner: from,
                spender,
                requested: amount,
                approved,
            });
        }
        self.move_balance(from, to, amount)?;
        self.approve(from, spender, approved - amount);
        Ok(())
    }
}
