use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, PRECISION_FACTOR};
use crate::error::VaultError;
use crate::math::mul_div;

/// Performance fee on the gain of a flexible position since its last
/// settlement. Gain below the cost basis (possible through rounding) pays
/// nothing.
pub fn performance_fee(value: u64, cost_basis: u64, fee_bps: u64, exempt: bool) -> Result<u64> {
    if exempt || fee_bps == 0 {
        return Ok(0);
    }

    let gain = value.saturating_sub(cost_basis);
    mul_div(gain, fee_bps, BPS_DENOMINATOR)
}

/// Overdue fee on a locked position settled later than
/// `lock_end_time + free_duration`. The rate grows linearly with the overdue
/// duration and saturates at `duration_factor_overdue`; it applies to the
/// gain above locked principal only, never to principal itself.
pub fn overdue_fee(
    value: u64,
    locked_amount: u64,
    lock_end_time: i64,
    now: i64,
    free_duration: u64,
    rate: u64,
    duration_factor_overdue: u64,
    exempt: bool,
) -> Result<u64> {
    if exempt {
        return Ok(0);
    }

    let free_until = lock_end_time
        .checked_add(free_duration as i64)
        .ok_or(VaultError::MathOverflow)?;
    if free_until >= now {
        return Ok(0);
    }

    let overdue_duration = ((now - free_until) as u64).min(duration_factor_overdue);
    let weight = mul_div(overdue_duration, rate, duration_factor_overdue)?;

    let gain = value.saturating_sub(locked_amount);
    mul_div(gain, weight, PRECISION_FACTOR as u64)
}

/// Even treasury/burn split of an overdue fee; the odd unit goes to the
/// treasury.
pub fn split_overdue_fee(fee: u64) -> (u64, u64) {
    let burned = fee / 2;
    (fee - burned, burned)
}

/// Withdraw fee on value leaving the pool within `fee_period` of the
/// position's last deposit.
pub fn withdraw_fee(
    amount: u64,
    fee_bps: u64,
    last_deposited_time: i64,
    now: i64,
    fee_period: u64,
    exempt: bool,
) -> Result<u64> {
    if exempt || fee_bps == 0 {
        return Ok(0);
    }

    let window_end = last_deposited_time
        .checked_add(fee_period as i64)
        .ok_or(VaultError::MathOverflow)?;
    if now >= window_end {
        return Ok(0);
    }

    mul_div(amount, fee_bps, BPS_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u64 = 100 * 10_000_000_000; // 1e12 = 100% at saturation
    const GRACE: u64 = 7 * 86_400;
    const OVERDUE_FACTOR: u64 = 180 * 86_400;

    #[test]
    fn test_performance_fee_is_bps_share_of_gain() {
        // 200 bps of a 500 gain
        assert_eq!(performance_fee(1_500, 1_000, 200, false).unwrap(), 10);
    }

    #[test]
    fn test_performance_fee_no_gain_no_fee() {
        assert_eq!(performance_fee(1_000, 1_000, 200, false).unwrap(), 0);
        // Value below cost basis pays nothing rather than underflowing
        assert_eq!(performance_fee(900, 1_000, 200, false).unwrap(), 0);
    }

    #[test]
    fn test_performance_fee_exempt() {
        assert_eq!(performance_fee(1_500, 1_000, 200, true).unwrap(), 0);
    }

    #[test]
    fn test_overdue_fee_zero_inside_grace() {
        let lock_end = 1_000_000i64;
        // exactly at the grace boundary: still free
        let at_boundary = lock_end + GRACE as i64;
        assert_eq!(
            overdue_fee(2_000, 1_000, lock_end, at_boundary, GRACE, RATE, OVERDUE_FACTOR, false)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_overdue_fee_monotone_until_cap() {
        let lock_end = 0i64;
        let value = 2_000u64;
        let principal = 1_000u64;

        let mut previous = 0u64;
        for days_overdue in [1u64, 30, 90, 180, 360] {
            let now = (GRACE + days_overdue * 86_400) as i64;
            let fee = overdue_fee(
                value, principal, lock_end, now, GRACE, RATE, OVERDUE_FACTOR, false,
            )
            .unwrap();
            assert!(fee >= previous);
            previous = fee;
        }
        // Saturated at the full rate: the entire 1000 gain
        assert_eq!(previous, 1_000);
    }

    #[test]
    fn test_overdue_fee_never_touches_principal() {
        let now = (GRACE + OVERDUE_FACTOR) as i64 + 1;
        // Value at or below principal: nothing to charge
        assert_eq!(
            overdue_fee(1_000, 1_000, 0, now, GRACE, RATE, OVERDUE_FACTOR, false).unwrap(),
            0
        );
        assert_eq!(
            overdue_fee(900, 1_000, 0, now, GRACE, RATE, OVERDUE_FACTOR, false).unwrap(),
            0
        );
    }

    #[test]
    fn test_overdue_fee_exempt() {
        let now = (GRACE + OVERDUE_FACTOR) as i64;
        assert_eq!(
            overdue_fee(2_000, 1_000, 0, now, GRACE, RATE, OVERDUE_FACTOR, true).unwrap(),
            0
        );
    }

    #[test]
    fn test_split_overdue_fee_odd_unit_to_treasury() {
        assert_eq!(split_overdue_fee(100), (50, 50));
        assert_eq!(split_overdue_fee(101), (51, 50));
        assert_eq!(split_overdue_fee(1), (1, 0));
    }

    #[test]
    fn test_withdraw_fee_inside_window() {
        // 10 bps of 10_000 = 10
        assert_eq!(withdraw_fee(10_000, 10, 1_000, 1_500, 3_600, false).unwrap(), 10);
    }

    #[test]
    fn test_withdraw_fee_zero_once_window_elapses() {
        // now == window end: free
        assert_eq!(withdraw_fee(10_000, 10, 1_000, 4_600, 3_600, false).unwrap(), 0);
        assert_eq!(withdraw_fee(10_000, 10, 1_000, 5_000, 3_600, false).unwrap(), 0);
    }

    #[test]
    fn test_withdraw_fee_exempt() {
        assert_eq!(withdraw_fee(10_000, 10, 1_000, 1_500, 3_600, true).unwrap(), 0);
    }
}
