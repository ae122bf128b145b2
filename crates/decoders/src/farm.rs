use alloy::primitives::{Address, B256, Bytes, Log, LogData, U256, keccak256};
use chrono::{DateTime, Utc};
use serde_json::json;
use yield_common::types::{DecodedEvent, EventType, LedgerEvent};

use crate::DecodeError;

const ALL_EVENT_TYPES: [EventType; 3] = [
    EventType::DepositedLiquidity,
    EventType::RemovedLiquidity,
    EventType::YieldClaimed,
];

/// Topic0 for a ledger event type.
pub fn signature_hash(event_type: EventType) -> B256 {
    keccak256(event_type.signature())
}

/// Encode a ledger event as the log the farm contract would emit.
///
/// Layout for all three events: topic0 = signature hash, topic1 = indexed
/// account, data = amount as one big-endian 32-byte word.
pub fn encode_event(event: &LedgerEvent, contract: Address) -> Log {
    let topics = vec![
        signature_hash(event.event_type()),
        event.account().into_word(),
    ];
    let data = Bytes::from(event.amount().to_be_bytes::<32>().to_vec());
    Log {
        address: contract,
        data: LogData::new_unchecked(topics, data),
    }
}

/// Decode a farm log back into a typed ledger event.
pub fn decode_ledger_event(log: &Log) -> Result<LedgerEvent, DecodeError> {
    let topic0 = log.topics().first().ok_or(DecodeError::MissingSignature)?;
    let event_type = ALL_EVENT_TYPES
        .into_iter()
        .find(|t| signature_hash(*t) == *topic0)
        .ok_or(DecodeError::UnknownSignature(*topic0))?;

    let account = log
        .topics()
        .get(1)
        .map(|topic| Address::from_word(*topic))
        .ok_or(DecodeError::MissingAccount)?;
    let amount = decode_u256_from_data(log.data.data.as_ref(), 0)?;

    Ok(match event_type {
        EventType::DepositedLiquidity => LedgerEvent::DepositedLiquidity { account, amount },
        EventType::RemovedLiquidity => LedgerEvent::RemovedLiquidity { account, amount },
        EventType::YieldClaimed => LedgerEvent::YieldClaimed { account, amount },
    })
}

fn decode_u256_from_data(data: &[u8], offset: usize) -> Result<U256, DecodeError> {
    let word: [u8; 32] = data
        .get(offset..offset + 32)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(DecodeError::ShortData { len: data.len() })?;
    Ok(U256::from_be_bytes(word))
}

/// Decoder for the farm's `DepositedLiquidity`, `RemovedLiquidity` and
/// `YieldClaimed` logs.
pub struct YieldFarmDecoder {
    signatures: Vec<B256>,
}

impl YieldFarmDecoder {
    pub fn new() -> Self {
        Self {
            signatures: ALL_EVENT_TYPES.into_iter().map(signature_hash).collect(),
        }
    }

    /// Decode a farm log into a `DecodedEvent`.
    /// Returns `None` for logs with a foreign topic0 and for malformed farm logs.
    pub fn decode(
        &self,
        log: &Log,
        block_number: u64,
        block_timestamp: DateTime<Utc>,
    ) -> Option<DecodedEvent> {
        let topic0 = log.topics().first()?;
        if !self.signatures.contains(topic0) {
            return None;
        }

        let event = match decode_ledger_event(log) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    contract = %log.address,
                    error = %e,
                    "Malformed farm log"
                );
                return None;
            }
        };

        Some(DecodedEvent {
            log_index: None,
            block_number,
            block_timestamp,
            address: format!("{:#x}", log.address),
            event_type: event.event_type(),
            decoded_data: json!({
                "account": format!("{:#x}", event.account()),
                "amount": event.amount().to_string(),
            }),
        })
    }
}

impl Default for YieldFarmDecoder {
    fn default() -> Self {
        Self::new()
    }
}
