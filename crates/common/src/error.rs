use alloy::primitives::Address;
use thiserror::Error;

use crate::types::Amount;

/// Failures reported by an external asset (collateral or reward token).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: Address,
        requested: Amount,
        available: Amount,
    },

    #[error(
        "insufficient allowance from {owner} to {spender}: requested {requested}, approved {approved}"
    )]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        requested: Amount,
        approved: Amount,
    },

    #[error("caller {caller} is not authorized to mint")]
    Unauthorized { caller: Address },

    #[error("ownership already transferred to {owner}")]
    OwnershipTransferred { owner: Address },

    #[error("arithmetic overflow in asset {asset}")]
    Overflow { asset: Address },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Errors returned by ledger operations. Every variant means the operation
/// was rolled back without any state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: &'static str },

    #[error("insufficient balance for {account}: requested {requested}, deposited {deposited}")]
    InsufficientBalance {
        account: Address,
        requested: Amount,
        deposited: Amount,
    },

    #[error("insufficient allowance for {account}: requested {requested}, approved {approved}")]
    InsufficientAllowance {
        account: Address,
        requested: Amount,
        approved: Amount,
    },

    #[error("nothing to claim for {account}")]
    NothingToClaim { account: Address },

    #[error("arithmetic overflow while {context}")]
    Overflow { context: &'static str },

    #[error("collateral asset error: {0}")]
    Collateral(AssetError),

    #[error("reward asset error: {0}")]
    Reward(AssetError),
}

impl LedgerError {
    /// Stable short code, used in reports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::InsufficientAllowance { .. } => "insufficient_allowance",
            LedgerError::NothingToClaim { .. } => "nothing_to_claim",
            LedgerError::Overflow { .. } => "overflow",
            LedgerError::Collateral(_) => "collateral_error",
            LedgerError::Reward(_) => "reward_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::InvalidAmount {
            reason: "cannot remove zero liquidity",
        };
        assert_eq!(err.to_string(), "invalid amount: cannot remove zero liquidity");

        let err = LedgerError::Collateral(AssetError::Rejected("paused".to_string()));
        assert_eq!(err.to_string(), "collateral asset error: transfer rejected: paused");
    }

    #[test]
    fn test_error_codes() {
        let account = Address::repeat_byte(0x01);
        assert_eq!(LedgerError::NothingToClaim { account }.code(), "nothing_to_claim");
        assert_eq!(
            LedgerError::InsufficientBalance {
                account,
                requested: U256::from(2u64),
                deposited: U256::from(1u64),
            }
            .code(),
            "insufficient_balance"
        );
    }
}
