//! Asset capabilities consumed by the accrual ledger, plus in-memory stand-ins.
//!
//! The ledger never implements token mechanics itself. It pulls and pushes
//! collateral through [`CollateralAsset`] and mints rewards through
//! [`RewardAsset`], propagating every failure unchanged.

pub mod collateral;
pub mod reward;

use alloy::primitives::Address;
use serde::Serialize;

use yield_common::error::AssetError;
use yield_common::types::Amount;

pub use collateral::MockCollateral;
pub use reward::YieldToken;

/// Fungible collateral token the ledger takes into custody.
pub trait CollateralAsset {
    /// Address of the token contract.
    fn address(&self) -> Address;

    fn balance_of(&self, account: Address) -> Amount;

    /// Amount `spender` may still pull from `owner`.
    fn allowance(&self, owner: Address, spender: Address) -> Amount;

    /// Move `amount` from `from` to `to`, authorized by `from` itself.
    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AssetError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError>;
}

/// Mintable reward token.
pub trait RewardAsset {
    /// Address of the token contract.
    fn address(&self) -> Address;

    fn balance_of(&self, account: Address) -> Amount;

    /// Mint `amount` new units to `to`. Fails unless `capability` was issued by this token.
    fn mint(
        &mut self,
        capability: &MintCapability,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError>;
}

/// Proof that `holder` owns the minting rights of the reward token at `asset`.
///
/// Only a reward token can issue one, through its one-time ownership handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintCapability {
    asset: Address,
    holder: Address,
}

impl MintCapability {
    pub(crate) fn new(asset: Address, holder: Address) -> Self {
        Self { asset, holder }
    }

    /// Reward token this capability is valid for.
    pub fn asset(&self) -> Address {
        self.asset
    }

    /// Account allowed to mint.
    pub fn holder(&self) -> Address {
        self.holder
    }
}
