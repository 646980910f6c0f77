use anchor_lang::prelude::*;

use crate::constants::SHARE_PRECISION;
use crate::error::VaultError;

/// Safe multiplication then floor division: (value × numerator) / denominator.
///
/// Uses u128 intermediate to prevent overflow. Truncation toward zero is the
/// protocol-wide rounding rule and always favors the pool.
pub fn mul_div(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, VaultError::DivisionByZero);

    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(VaultError::MathOverflow)?;

    let result = product / (denominator as u128);

    require!(result <= u64::MAX as u128, VaultError::MathOverflow);
    Ok(result as u64)
}

/// Shares minted for a contribution of `value` into a pool currently worth
/// `pool_value` (the contribution already included) holding `total_shares`.
///
/// Formula: value × total_shares / (pool_value − value), i.e. the
/// contribution is priced against the pool before it was added, so existing
/// holders are not diluted. An empty ledger mints 1:1.
pub fn shares_for_value(value: u64, pool_value: u64, total_shares: u64) -> Result<u64> {
    if total_shares == 0 {
        return Ok(value);
    }

    let prior_value = pool_value
        .checked_sub(value)
        .ok_or(VaultError::MathOverflow)?;

    mul_div(value, total_shares, prior_value)
}

/// Value redeemed by burning `shares` out of `total_shares` against
/// `pool_value`: pool_value × shares / total_shares, floored.
pub fn value_for_shares(shares: u64, pool_value: u64, total_shares: u64) -> Result<u64> {
    mul_div(pool_value, shares, total_shares)
}

/// Fraction of a holding, scaled by SHARE_PRECISION. Computed against the
/// pre-settlement share count so the claim survives settlement re-minting.
pub fn share_fraction(part: u64, whole: u64) -> Result<u128> {
    require!(whole > 0, VaultError::DivisionByZero);

    let scaled = (part as u128)
        .checked_mul(SHARE_PRECISION)
        .ok_or(VaultError::MathOverflow)?;

    Ok(scaled / (whole as u128))
}

/// Apply a SHARE_PRECISION-scaled fraction to a share count, flooring.
pub fn apply_fraction(fraction: u128, shares: u64) -> Result<u64> {
    let result = fraction
        .checked_mul(shares as u128)
        .ok_or(VaultError::MathOverflow)?
        / SHARE_PRECISION;

    require!(result <= u64::MAX as u128, VaultError::MathOverflow);
    Ok(result as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_floors() {
        assert_eq!(mul_div(100, 3, 2).unwrap(), 150);
        assert_eq!(mul_div(100, 1, 3).unwrap(), 33);
    }

    #[test]
    fn test_mul_div_division_by_zero() {
        assert!(mul_div(100, 100, 0).is_err());
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // u64::MAX * 2 overflows u64 but not u128
        assert_eq!(mul_div(u64::MAX, 2, 2).unwrap(), u64::MAX);
    }

    #[test]
    fn test_empty_ledger_mints_one_to_one() {
        assert_eq!(shares_for_value(100, 100, 0).unwrap(), 100);
    }

    #[test]
    fn test_mint_priced_against_prior_pool() {
        // Pool worth 100 with 100 shares; a 50 deposit (pool now 150)
        // mints 50 * 100 / (150 - 50) = 50
        assert_eq!(shares_for_value(50, 150, 100).unwrap(), 50);
    }

    #[test]
    fn test_no_dilution_round_trip() {
        // Depositor's immediate redemption returns >= v - 1
        let total_shares = 3_333u64;
        let pool_value = 10_007u64;
        let v = 999u64;

        let minted = shares_for_value(v, pool_value + v, total_shares).unwrap();
        let back = value_for_shares(minted, pool_value + v, total_shares + minted).unwrap();
        assert!(back <= v);
        assert!(back >= v - 1);
    }

    #[test]
    fn test_share_fraction_full_and_half() {
        assert_eq!(share_fraction(100, 100).unwrap(), SHARE_PRECISION);
        assert_eq!(share_fraction(50, 100).unwrap(), SHARE_PRECISION / 2);
    }

    #[test]
    fn test_fraction_survives_remint() {
        // Request half of 100 shares; settlement re-mints the holding as 90
        let fraction = share_fraction(50, 100).unwrap();
        assert_eq!(apply_fraction(fraction, 90).unwrap(), 45);
    }

    #[test]
    fn test_fraction_of_max_shares() {
        let fraction = share_fraction(u64::MAX, u64::MAX).unwrap();
        assert_eq!(apply_fraction(fraction, u64::MAX).unwrap(), u64::MAX);
    }
}
