use anchor_lang::prelude::*;

use crate::constants::{MIN_LOCK_DURATION, PRECISION_FACTOR};
use crate::error::VaultError;
use crate::math::mul_div;

/// Boost weight for a lock of `duration` seconds, scaled by
/// PRECISION_FACTOR. Linear in duration: a full `duration_factor` lock earns
/// exactly `boost_weight_param`.
pub fn boost_weight(duration: u64, boost_weight_param: u64, duration_factor: u64) -> Result<u64> {
    mul_div(duration, boost_weight_param, duration_factor)
}

/// Extra shares granted on top of the base shares a locked deposit earns.
pub fn boosted_shares(weight: u64, base_shares: u64) -> Result<u64> {
    mul_div(weight, base_shares, PRECISION_FACTOR as u64)
}

/// Token-equivalent debt credited to the pool for a locked deposit. Added to
/// `total_boost_debt` when the lock is taken and removed exactly once at
/// unwind.
pub fn boost_debt(weight: u64, value: u64) -> Result<u64> {
    mul_div(weight, value, PRECISION_FACTOR as u64)
}

/// Total lock duration after a `requested` extension: an unexpired lock
/// contributes its remaining window, an expired or absent one contributes
/// nothing.
pub fn accumulated_lock_duration(
    requested: u64,
    lock_start_time: i64,
    lock_end_time: i64,
    now: i64,
) -> Result<u64> {
    if lock_end_time < now {
        return Ok(requested);
    }

    let carried = lock_end_time
        .checked_sub(lock_start_time)
        .ok_or(VaultError::MathOverflow)? as u64;

    requested
        .checked_add(carried)
        .ok_or_else(|| error!(VaultError::MathOverflow))
}

/// Lock bounds: a nonzero request must land the total inside
/// [MIN_LOCK_DURATION, max_lock_duration]; a zero request (pure top-up) only
/// honors the ceiling.
pub fn validate_lock_duration(requested: u64, total: u64, max_lock_duration: u64) -> Result<()> {
    require!(
        requested == 0 || total >= MIN_LOCK_DURATION,
        VaultError::LockDurationTooShort
    );
    require!(total <= max_lock_duration, VaultError::LockDurationTooLong);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_BOOST_WEIGHT, DURATION_FACTOR, MAX_LOCK_DURATION_LIMIT};

    #[test]
    fn test_full_duration_weight() {
        let weight = boost_weight(DURATION_FACTOR, DEFAULT_BOOST_WEIGHT, DURATION_FACTOR).unwrap();
        assert_eq!(weight, DEFAULT_BOOST_WEIGHT);
    }

    #[test]
    fn test_half_duration_half_weight() {
        let weight =
            boost_weight(DURATION_FACTOR / 2, DEFAULT_BOOST_WEIGHT, DURATION_FACTOR).unwrap();
        assert_eq!(weight, DEFAULT_BOOST_WEIGHT / 2);
    }

    #[test]
    fn test_full_weight_doubles_base_shares() {
        // DEFAULT_BOOST_WEIGHT == PRECISION_FACTOR: boosted == base
        let base = 1_000_000u64;
        let extra = boosted_shares(DEFAULT_BOOST_WEIGHT, base).unwrap();
        assert_eq!(extra, base);
    }

    #[test]
    fn test_boost_debt_matches_share_boost_ratio() {
        let weight = boost_weight(DURATION_FACTOR, DEFAULT_BOOST_WEIGHT, DURATION_FACTOR).unwrap();
        assert_eq!(boost_debt(weight, 100).unwrap(), 100);
        assert_eq!(boost_debt(weight / 2, 100).unwrap(), 50);
    }

    #[test]
    fn test_accumulation_carries_remaining_window() {
        // Lock running [100, 1000], extended by 500 at t=400
        let total = accumulated_lock_duration(500, 100, 1_000, 400).unwrap();
        assert_eq!(total, 500 + 900);
    }

    #[test]
    fn test_accumulation_ignores_expired_lock() {
        let total = accumulated_lock_duration(500, 100, 1_000, 2_000).unwrap();
        assert_eq!(total, 500);
    }

    #[test]
    fn test_lock_bounds() {
        let max = MAX_LOCK_DURATION_LIMIT;
        assert!(validate_lock_duration(MIN_LOCK_DURATION, MIN_LOCK_DURATION, max).is_ok());
        assert!(validate_lock_duration(1, 1, max).is_err());
        assert!(validate_lock_duration(1, MAX_LOCK_DURATION_LIMIT + 1, max).is_err());
        // Pure top-up of a short remaining window is fine
        assert!(validate_lock_duration(0, 1, max).is_ok());
    }
}
