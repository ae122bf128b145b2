//! Linear yield accrual.
//!
//! Yield accrues at 100% of principal per year, linearly, without
//! compounding:
//!
//! ```text
//! accrued = floor(principal * elapsed / SECONDS_PER_YEAR)
//! ```
//!
//! The truncated remainder is dropped, never carried into the next period.

use alloy::primitives::U256;

use yield_common::error::LedgerError;
use yield_common::types::{Amount, LedgerEntry, SECONDS_PER_YEAR, Timestamp};

/// Seconds between the last accrual point and `now`.
///
/// A clock reading earlier than `last` counts as zero elapsed time.
pub fn elapsed(last: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(last)
}

/// Yield earned by `principal` over `elapsed` seconds.
pub fn accrued_yield(principal: Amount, elapsed: u64) -> Result<Amount, LedgerError> {
    let scaled = principal
        .checked_mul(U256::from(elapsed))
        .ok_or(LedgerError::Overflow {
            context: "scaling principal by elapsed time",
        })?;
    Ok(scaled / U256::from(SECONDS_PER_YEAR))
}

/// Run the accrual step on a copy of `entry`.
///
/// Only `pending_yield` changes. `last_accrual_time` is left alone; deposits
/// are the only operation that moves it.
pub fn accrue(entry: &LedgerEntry, now: Timestamp) -> Result<LedgerEntry, LedgerError> {
    let accrued = accrued_yield(entry.principal, elapsed(entry.last_accrual_time, now))?;
    let pending_yield = entry
        .pending_yield
        .checked_add(accrued)
        .ok_or(LedgerError::Overflow {
            context: "adding accrued yield",
        })?;

    if !accrued.is_zero() {
        tracing::debug!(
            principal = %entry.principal,
            since = entry.last_accrual_time,
            now,
            accrued = %accrued,
            "Yield accrued"
        );
    }

    Ok(LedgerEntry {
        pending_yield,
        ..*entry
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(v: u64) -> Amount {
        U256::from(v)
    }

    #[test]
    fn test_full_year_earns_principal() {
        assert_eq!(accrued_yield(amount(10), SECONDS_PER_YEAR).unwrap(), amount(10));
    }

    #[test]
    fn test_half_year() {
        assert_eq!(
            accrued_yield(amount(1_000), SECONDS_PER_YEAR / 2).unwrap(),
            amount(500)
        );
    }

    #[test]
    fn test_fraction_is_truncated() {
        // 10 * 1 day / 365 days = 0.027..., floors to zero
        assert_eq!(accrued_yield(amount(10), 86_400).unwrap(), U256::ZERO);
        // 1000 * 1 day / 365 days = 2.739..., floors to 2
        assert_eq!(accrued_yield(amount(1_000), 86_400).unwrap(), amount(2));
    }

    #[test]
    fn test_zero_elapsed_or_principal() {
        assert_eq!(accrued_yield(amount(10), 0).unwrap(), U256::ZERO);
        assert_eq!(accrued_yield(U256::ZERO, SECONDS_PER_YEAR).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = accrued_yield(U256::MAX, 2).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { .. }));
    }

    #[test]
    fn test_clock_going_backwards_counts_as_zero() {
        assert_eq!(elapsed(100, 50), 0);
        assert_eq!(elapsed(50, 100), 50);
    }

    #[test]
    fn test_accrue_keeps_last_accrual_time() {
        let entry = LedgerEntry {
            principal: amount(10),
            pending_yield: amount(3),
            last_accrual_time: 1_000,
        };
        let accrued = accrue(&entry, 1_000 + SECONDS_PER_YEAR).unwrap();
        assert_eq!(accrued.pending_yield, amount(13));
        assert_eq!(accrued.principal, amount(10));
        assert_eq!(accrued.last_accrual_time, 1_000);
    }
}
