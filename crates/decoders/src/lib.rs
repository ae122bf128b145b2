pub mod farm;


use alloy::primitives::B256;
use thiserror::Error;

pub use farm::{YieldFarmDecoder, decode_ledger_event, encode_event, signature_hash};

/// Reasons a log cannot be turned back into a ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("log has no topics")]
    MissingSignature,

    #[error("unknown event signature {0}")]
    UnknownSignature(B256),

    #[error("missing indexed account topic")]
    MissingAccount,

    #[error("data too short for amount: {len} bytes")]
    ShortData { len: usize },
}
