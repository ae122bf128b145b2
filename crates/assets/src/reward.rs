//! Mintable reward token with a one-time ownership handshake.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use yield_common::error::AssetError;
use yield_common::types::Amount;

use crate::{MintCapability, RewardAsset};

/// Stand-in reward token. Starts with zero supply, owned by its deployer.
#[derive(Debug, Clone)]
pub struct YieldToken {
    address: Address,
    owner: Address,
    capability_issued: bool,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    fail_next_mint: Option<String>,
}

impl YieldToken {
    pub fn new(address: Address, deployer: Address) -> Self {
        Self {
            address,
            owner: deployer,
            capability_issued: false,
            total_supply: U256::ZERO,
            balances: HashMap::new(),
            fail_next_mint: None,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Hand minting rights to `new_owner`. Can happen exactly once, and only
    /// the current owner may do it.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<MintCapability, AssetError> {
        if self.capability_issued {
            return Err(AssetError::OwnershipTransferred { owner: self.owner });
        }
        if caller != self.owner {
            return Err(AssetError::Unauthorized { caller });
        }
        self.owner = new_owner;
        self.capability_issued = true;

        tracing::info!(
            token = %self.address,
            previous_owner = %caller,
            new_owner = %new_owner,
            "Reward token ownership transferred"
        );

        Ok(MintCapability::new(self.address, new_owner))
    }

    /// Make the next `mint` fail with `reason`.
    pub fn fail_next_mint(&mut self, reason: impl Into<String>) {
        self.fail_next_mint = Some(reason.into());
    }
}

impl RewardAsset for YieldToken {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(U256::ZERO)
    }

    fn mint(
        &mut self,
        capability: &MintCapability,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError> {
        if let Some(reason) = self.fail_next_mint.take() {
            return Err(AssetError::Rejected(reason));
        }
        if capability.asset() != self.address || capability.holder() != self.owner {
            return Err(AssetError::Unauthorized {
                caller: capability.holder(),
            });
        }

        let overflow = AssetError::Overflow {
            asset: self.address,
        };
        let supply = self.total_supply.checked_add(amount).ok_or(overflow.clone())?;
        let balance = self.balance_of(to).checked_add(amount).ok_or(overflow)?;

        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address::repeat_byte(0x19);
    const DEPLOYER: Address = Address::repeat_byte(0x01);
    const FARM: Address = Address::repeat_byte(0xF0);
    const ALICE: Address = Address::repeat_byte(0xA1);

    #[test]
    fn test_ownership_handshake_issues_capability() {
        let mut token = YieldToken::new(TOKEN, DEPLOYER);
        let cap = token.transfer_ownership(DEPLOYER, FARM).unwrap();
        assert_eq!(cap.asset(), TOKEN);
        assert_eq!(cap.holder(), FARM);
        assert_eq!(token.owner(), FARM);
    }

    #[test]
    fn test_ownership_handshake_is_one_time() {
        let mut token = YieldToken::new(TOKEN, DEPLOYER);
        token.transfer_ownership(DEPLOYER, FARM).unwrap();
        let err = token.transfer_ownership(FARM, ALICE).unwrap_err();
        assert_eq!(err, AssetError::OwnershipTransferred { owner: FARM });
    }

    #[test]
    fn test_only_owner_can_transfer_ownership() {
        let mut token = YieldToken::new(TOKEN, DEPLOYER);
        let err = token.transfer_ownership(ALICE, ALICE).unwrap_err();
        assert_eq!(err, AssetError::Unauthorized { caller: ALICE });
        assert_eq!(token.owner(), DEPLOYER);
    }

    #[test]
    fn test_mint_with_capability() {
        let mut token = YieldToken::new(TOKEN, DEPLOYER);
        let cap = token.transfer_ownership(DEPLOYER, FARM).unwrap();
        token.mint(&cap, ALICE, U256::from(10u64)).unwrap();
        assert_eq!(token.balance_of(ALICE), U256::from(10u64));
        assert_eq!(token.total_supply(), U256::from(10u64));
    }

    #[test]
    fn test_foreign_capability_rejected() {
        let mut other = YieldToken::new(Address::repeat_byte(0x77), DEPLOYER);
        let foreign = other.transfer_ownership(DEPLOYER, FARM).unwrap();

        let mut token = YieldToken::new(TOKEN, DEPLOYER);
        let err = token.mint(&foreign, ALICE, U256::from(1u64)).unwrap_err();
        assert!(matches!(err, AssetError::Unauthorized { .. }));
        assert_eq!(token.total_supply(), U256::ZERO);
    }

    #[test]
    fn test_injected_mint_failure() {
        let mut token = YieldToken::new(TOKEN, DEPLOYER);
        let cap = token.transfer_ownership(DEPLOYER, FARM).unwrap();
        token.fail_next_mint("halted");
        assert!(token.mint(&cap, ALICE, U256::from(1u64)).is_err());
        assert_eq!(token.balance_of(ALICE), U256::ZERO);
        token.mint(&cap, ALICE, U256::from(1u64)).unwrap();
        assert_eq!(token.balance_of(ALICE), U256::from(1u64));
    }
}
