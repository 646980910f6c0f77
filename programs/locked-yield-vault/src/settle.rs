use anchor_lang::prelude::*;

use crate::boost;
use crate::constants::{MIN_DEPOSIT_AMOUNT, MIN_WITHDRAW_AMOUNT};
use crate::error::VaultError;
use crate::fees;
use crate::math;
use crate::state::{Pool, UserPosition};

/// Token movements owed after a settlement. The ledger has already been
/// debited for every fee; the caller performs the actual transfers, so an
/// aborted transfer aborts the whole transaction and no partial ledger
/// state survives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SettleOutcome {
    pub performance_fee: u64,
    pub overdue_fee_treasury: u64,
    pub overdue_fee_burned: u64,
    /// The lock expired during this settlement and the position returned to
    /// flexible
    pub unlocked: bool,
    /// Value re-minted into fresh shares
    pub settled_amount: u64,
}

impl SettleOutcome {
    /// Performance and overdue fees come from mutually exclusive branches,
    /// so a plain sum cannot overflow.
    pub fn treasury_total(&self) -> u64 {
        self.performance_fee + self.overdue_fee_treasury
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DepositOutcome {
    pub settle: SettleOutcome,
    /// Residual balance swept to the treasury because no shares were
    /// outstanding
    pub stock_amount: u64,
    pub shares_minted: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub settle: SettleOutcome,
    pub withdraw_fee: u64,
    pub payout: u64,
    pub shares_burned: u64,
}

/// Fee and boost policy the settlement engine consults. `Pool` implements
/// it from its stored schedule; an alternate policy can swap in without
/// touching the share arithmetic.
pub trait VaultPolicy {
    fn performance_fee(&self, value: u64, cost_basis: u64, exempt: bool) -> Result<u64>;
    fn overdue_fee(
        &self,
        value: u64,
        locked_amount: u64,
        lock_end_time: i64,
        now: i64,
        exempt: bool,
    ) -> Result<u64>;
    fn withdraw_fee(
        &self,
        amount: u64,
        last_deposited_time: i64,
        now: i64,
        exempt: bool,
    ) -> Result<u64>;
    fn boost_weight_for(&self, lock_window: u64) -> Result<u64>;
}

impl VaultPolicy for Pool {
    fn performance_fee(&self, value: u64, cost_basis: u64, exempt: bool) -> Result<u64> {
        fees::performance_fee(value, cost_basis, self.performance_fee_bps, exempt)
    }

    fn overdue_fee(
        &self,
        value: u64,
        locked_amount: u64,
        lock_end_time: i64,
        now: i64,
        exempt: bool,
    ) -> Result<u64> {
        fees::overdue_fee(
            value,
            locked_amount,
            lock_end_time,
            now,
            self.unlock_free_duration,
            self.overdue_fee_rate,
            self.duration_factor_overdue,
            exempt,
        )
    }

    fn withdraw_fee(
        &self,
        amount: u64,
        last_deposited_time: i64,
        now: i64,
        exempt: bool,
    ) -> Result<u64> {
        fees::withdraw_fee(
            amount,
            self.withdraw_fee_bps,
            last_deposited_time,
            now,
            self.withdraw_fee_period,
            exempt,
        )
    }

    fn boost_weight_for(&self, lock_window: u64) -> Result<u64> {
        boost::boost_weight(lock_window, self.boost_weight, self.duration_factor)
    }
}

/// Settle a position's pending fee/boost/lock state at current pool pricing.
///
/// Locked positions are unwound: the boost debt is removed exactly once, the
/// old shares burned, an overdue fee skimmed when the grace window has
/// lapsed, and the remaining value re-minted into fresh shares. Lock fields
/// clear only when the lock has actually expired; an unexpired lock being
/// settled (early top-up) keeps its window and is re-boosted by the caller.
///
/// Flexible positions pay the performance fee on gain since the last
/// settlement and are re-minted at current pricing. Exempt flexible
/// positions are left untouched.
pub fn settle_position(pool: &mut Pool, user: &mut UserPosition, now: i64) -> Result<SettleOutcome> {
    let mut out = SettleOutcome::default();
    if user.shares == 0 {
        return Ok(out);
    }

    if user.locked {
        // The boost debt is phantom value: the redeemable amount is the
        // share claim minus this position's contribution to it.
        let gross = math::value_for_shares(user.shares, pool.pool_value()?, pool.total_shares)?;
        let mut current = gross
            .checked_sub(user.user_boosted_share)
            .ok_or(VaultError::MathOverflow)?;

        pool.total_boost_debt = pool
            .total_boost_debt
            .checked_sub(user.user_boosted_share)
            .ok_or(VaultError::MathOverflow)?;
        user.user_boosted_share = 0;

        pool.total_shares = pool
            .total_shares
            .checked_sub(user.shares)
            .ok_or(VaultError::MathOverflow)?;
        user.shares = 0;

        let fee = pool.overdue_fee(
            current,
            user.locked_amount,
            user.lock_end_time,
            now,
            user.overdue_fee_exempt,
        )?;
        if fee > 0 {
            let (to_treasury, to_burn) = fees::split_overdue_fee(fee);
            pool.debit(fee)?;
            current = current.checked_sub(fee).ok_or(VaultError::MathOverflow)?;
            out.overdue_fee_treasury = to_treasury;
            out.overdue_fee_burned = to_burn;
        }

        let new_shares = math::shares_for_value(current, pool.pool_value()?, pool.total_shares)?;
        user.shares = new_shares;
        pool.total_shares = pool
            .total_shares
            .checked_add(new_shares)
            .ok_or(VaultError::MathOverflow)?;

        if user.lock_end_time < now {
            user.locked = false;
            user.lock_start_time = 0;
            user.lock_end_time = 0;
            pool.total_locked_amount = pool
                .total_locked_amount
                .checked_sub(user.locked_amount)
                .ok_or(VaultError::MathOverflow)?;
            user.locked_amount = 0;
            out.unlocked = true;
        }

        user.last_user_action_amount = current;
        user.last_user_action_time = now;
        out.settled_amount = current;
    } else if !user.performance_fee_exempt {
        let mut total = math::value_for_shares(user.shares, pool.pool_value()?, pool.total_shares)?;
        pool.total_shares = pool
            .total_shares
            .checked_sub(user.shares)
            .ok_or(VaultError::MathOverflow)?;
        user.shares = 0;

        let fee = pool.performance_fee(total, user.last_user_action_amount, false)?;
        if fee > 0 {
            pool.debit(fee)?;
            total = total.checked_sub(fee).ok_or(VaultError::MathOverflow)?;
            out.performance_fee = fee;
        }

        let new_shares = math::shares_for_value(total, pool.pool_value()?, pool.total_shares)?;
        user.shares = new_shares;
        pool.total_shares = pool
            .total_shares
            .checked_add(new_shares)
            .ok_or(VaultError::MathOverflow)?;

        user.last_user_action_amount = total;
        user.last_user_action_time = now;
        out.settled_amount = total;
    }

    Ok(out)
}

/// Deposit principal and/or extend a lock. Assumes the caller has already
/// harvested; `pool.total_amount` must not yet include `amount` (this
/// function credits it at the pricing point, mirroring a transfer that
/// lands after the snapshot).
pub fn apply_deposit(
    pool: &mut Pool,
    user: &mut UserPosition,
    amount: u64,
    lock_duration: u64,
    now: i64,
) -> Result<DepositOutcome> {
    // A (0, 0) deposit is a pure settlement of an existing position; an
    // empty position has nothing to settle.
    if user.shares == 0 {
        require!(amount > 0 || lock_duration > 0, VaultError::ZeroAmount);
    }
    if user.shares == 0 || amount > 0 {
        require!(amount >= MIN_DEPOSIT_AMOUNT, VaultError::DepositTooSmall);
    }

    // Accumulate remaining lock time; topping up an unexpired lock restarts
    // the window and rebases the locked principal.
    let mut total_lock = lock_duration;
    if user.lock_active(now) {
        if amount > 0 {
            user.lock_start_time = now;
            pool.total_locked_amount = pool
                .total_locked_amount
                .checked_sub(user.locked_amount)
                .ok_or(VaultError::MathOverflow)?;
            user.locked_amount = 0;
        }
        total_lock = boost::accumulated_lock_duration(
            lock_duration,
            user.lock_start_time,
            user.lock_end_time,
            now,
        )?;
    }
    boost::validate_lock_duration(lock_duration, total_lock, pool.max_lock_duration)?;

    // Residual balance held by a shareless pool belongs to the treasury,
    // not to the first depositor.
    let mut stock_amount = 0u64;
    if pool.total_shares == 0 && pool.total_amount > 0 {
        stock_amount = pool.total_amount;
        pool.debit(stock_amount)?;
    }

    let settle = settle_position(pool, user, now)?;

    // Open or extend the lock window.
    if lock_duration > 0 {
        if user.lock_start_time == 0 || user.lock_end_time < now {
            user.lock_start_time = now;
            user.lock_end_time = now
                .checked_add(lock_duration as i64)
                .ok_or(VaultError::MathOverflow)?;
        } else {
            user.lock_end_time = user
                .lock_end_time
                .checked_add(lock_duration as i64)
                .ok_or(VaultError::MathOverflow)?;
        }
        user.locked = true;
    }

    // Price the contribution against the pool before it lands.
    let pool_before = pool.pool_value()?;
    let mut current_amount = amount;
    let mut user_locked_balance = 0u64;

    if user.shares > 0 && user.locked {
        // Re-locking folds the existing balance into the contribution so
        // the whole position carries the new boost.
        user_locked_balance =
            math::value_for_shares(user.shares, pool_before, pool.total_shares)?;
        current_amount = current_amount
            .checked_add(user_locked_balance)
            .ok_or(VaultError::MathOverflow)?;
        pool.total_shares = pool
            .total_shares
            .checked_sub(user.shares)
            .ok_or(VaultError::MathOverflow)?;
        user.shares = 0;

        if user.lock_start_time == now {
            user.locked_amount = user_locked_balance;
            pool.total_locked_amount = pool
                .total_locked_amount
                .checked_add(user.locked_amount)
                .ok_or(VaultError::MathOverflow)?;
        }
    }

    let current_shares = if pool.total_shares > 0 {
        let backing = pool_before
            .checked_sub(user_locked_balance)
            .ok_or(VaultError::MathOverflow)?;
        math::mul_div(current_amount, pool.total_shares, backing)?
    } else {
        current_amount
    };

    pool.credit(amount)?;

    let mut minted = current_shares;
    if user.lock_end_time > user.lock_start_time {
        let lock_window = user
            .lock_end_time
            .checked_sub(user.lock_start_time)
            .ok_or(VaultError::MathOverflow)? as u64;
        let weight = pool.boost_weight_for(lock_window)?;

        let extra = boost::boosted_shares(weight, current_shares)?;
        minted = current_shares
            .checked_add(extra)
            .ok_or(VaultError::MathOverflow)?;
        user.shares = user
            .shares
            .checked_add(minted)
            .ok_or(VaultError::MathOverflow)?;

        let debt = boost::boost_debt(weight, current_amount)?;
        user.user_boosted_share = user
            .user_boosted_share
            .checked_add(debt)
            .ok_or(VaultError::MathOverflow)?;
        pool.total_boost_debt = pool
            .total_boost_debt
            .checked_add(debt)
            .ok_or(VaultError::MathOverflow)?;

        user.locked_amount = user
            .locked_amount
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        pool.total_locked_amount = pool
            .total_locked_amount
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
    } else {
        user.shares = user
            .shares
            .checked_add(minted)
            .ok_or(VaultError::MathOverflow)?;
    }

    if amount > 0 || lock_duration > 0 {
        user.last_deposited_time = now;
    }
    pool.total_shares = pool
        .total_shares
        .checked_add(minted)
        .ok_or(VaultError::MathOverflow)?;

    user.last_user_action_amount =
        math::value_for_shares(user.shares, pool.pool_value()?, pool.total_shares)?
            .checked_sub(user.user_boosted_share)
            .ok_or(VaultError::MathOverflow)?;
    user.last_user_action_time = now;

    Ok(DepositOutcome {
        settle,
        stock_amount,
        shares_minted: minted,
    })
}

/// Withdraw by share count (`shares > 0`) or by token amount (`shares == 0,
/// amount > 0`). Assumes the caller has already harvested. The share claim
/// is converted to a fraction of the holding before settlement so it
/// survives the settlement re-mint.
pub fn apply_withdraw(
    pool: &mut Pool,
    user: &mut UserPosition,
    shares: u64,
    amount: u64,
    now: i64,
) -> Result<WithdrawOutcome> {
    require!(shares > 0 || amount > 0, VaultError::ZeroAmount);
    if shares == 0 {
        require!(amount >= MIN_WITHDRAW_AMOUNT, VaultError::WithdrawTooSmall);
    }
    require!(user.shares > 0, VaultError::InsufficientShares);
    require!(shares <= user.shares, VaultError::InsufficientShares);
    require!(user.lock_end_time < now, VaultError::StillLocked);

    let fraction = math::share_fraction(shares, user.shares)?;

    let settle = settle_position(pool, user, now)?;

    let current_shares = if shares == 0 {
        // By-amount: convert at post-settlement pricing, clamp to balance.
        let equivalent = math::mul_div(amount, pool.total_shares, pool.pool_value()?)?;
        equivalent.min(user.shares)
    } else {
        math::apply_fraction(fraction, user.shares)?
    };

    let current_amount =
        math::value_for_shares(current_shares, pool.pool_value()?, pool.total_shares)?;

    user.shares = user
        .shares
        .checked_sub(current_shares)
        .ok_or(VaultError::MathOverflow)?;
    pool.total_shares = pool
        .total_shares
        .checked_sub(current_shares)
        .ok_or(VaultError::MathOverflow)?;

    let fee = pool.withdraw_fee(
        current_amount,
        user.last_deposited_time,
        now,
        user.withdraw_fee_exempt,
    )?;

    pool.debit(current_amount)?;
    let payout = current_amount
        .checked_sub(fee)
        .ok_or(VaultError::MathOverflow)?;

    user.last_user_action_amount = if user.shares > 0 {
        math::value_for_shares(user.shares, pool.pool_value()?, pool.total_shares)?
    } else {
        0
    };
    user.last_user_action_time = now;

    Ok(WithdrawOutcome {
        settle,
        withdraw_fee: fee,
        payout,
        shares_burned: current_shares,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        DEFAULT_BOOST_WEIGHT, DEFAULT_DURATION_FACTOR_OVERDUE, DEFAULT_MAX_LOCK_DURATION,
        DEFAULT_OVERDUE_FEE_RATE, DEFAULT_PERFORMANCE_FEE_BPS, DEFAULT_UNLOCK_FREE_DURATION,
        DEFAULT_WITHDRAW_FEE_BPS, DEFAULT_WITHDRAW_FEE_PERIOD, DURATION_FACTOR,
        MIN_LOCK_DURATION,
    };

    const T0: i64 = 1_700_000_000;
    const WEEK: i64 = 7 * 86_400;
    const DAY: i64 = 86_400;

    fn test_pool() -> Pool {
        Pool {
            admin: Pubkey::default(),
            operator: Pubkey::default(),
            treasury: Pubkey::default(),
            asset_mint: Pubkey::default(),
            asset_vault: Pubkey::default(),
            reward_vault: Pubkey::default(),
            total_shares: 0,
            total_boost_debt: 0,
            total_locked_amount: 0,
            total_amount: 0,
            performance_fee_bps: DEFAULT_PERFORMANCE_FEE_BPS,
            withdraw_fee_bps: DEFAULT_WITHDRAW_FEE_BPS,
            withdraw_fee_period: DEFAULT_WITHDRAW_FEE_PERIOD,
            overdue_fee_rate: DEFAULT_OVERDUE_FEE_RATE,
            unlock_free_duration: DEFAULT_UNLOCK_FREE_DURATION,
            max_lock_duration: DEFAULT_MAX_LOCK_DURATION,
            duration_factor: DURATION_FACTOR,
            duration_factor_overdue: DEFAULT_DURATION_FACTOR_OVERDUE,
            boost_weight: DEFAULT_BOOST_WEIGHT,
            vault_id: 0,
            bump: 0,
            paused: false,
            _reserved: [0u8; 64],
        }
    }

    fn test_user() -> UserPosition {
        UserPosition {
            pool: Pubkey::default(),
            owner: Pubkey::default(),
            shares: 0,
            last_deposited_time: 0,
            last_user_action_amount: 0,
            last_user_action_time: 0,
            lock_start_time: 0,
            lock_end_time: 0,
            user_boosted_share: 0,
            locked_amount: 0,
            locked: false,
            performance_fee_exempt: false,
            withdraw_fee_exempt: false,
            overdue_fee_exempt: false,
            bump: 0,
            _reserved: [0u8; 32],
        }
    }

    fn assert_conserved(pool: &Pool, users: &[&UserPosition]) {
        let share_sum: u64 = users.iter().map(|u| u.shares).sum();
        let debt_sum: u64 = users.iter().map(|u| u.user_boosted_share).sum();
        assert_eq!(pool.total_shares, share_sum);
        assert_eq!(pool.total_boost_debt, debt_sum);
    }

    // --- deposit / withdraw pricing ---

    #[test]
    fn test_first_deposit_mints_one_to_one() {
        let mut pool = test_pool();
        let mut a = test_user();

        let out = apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        assert_eq!(out.shares_minted, 100_000);
        assert_eq!(a.shares, 100_000);
        assert_eq!(pool.total_shares, 100_000);
        assert_eq!(pool.total_amount, 100_000);
        assert_eq!(a.last_user_action_amount, 100_000);
    }

    #[test]
    fn test_second_depositor_priced_against_prior_pool() {
        let mut pool = test_pool();
        let mut a = test_user();
        let mut b = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        let out = apply_deposit(&mut pool, &mut b, 50_000, 0, T0).unwrap();

        // 50_000 * 100_000 / 100_000 = 50_000: B owns 50/150 of the pool
        assert_eq!(out.shares_minted, 50_000);
        assert_eq!(pool.total_shares, 150_000);
        assert_conserved(&pool, &[&a, &b]);
    }

    #[test]
    fn test_withdraw_all_inside_fee_window_pays_withdraw_fee() {
        let mut pool = test_pool();
        let mut a = test_user();
        let mut b = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        apply_deposit(&mut pool, &mut b, 50_000, 0, T0).unwrap();

        let shares = a.shares;
        let out = apply_withdraw(&mut pool, &mut a, shares, 0, T0 + 3600).unwrap();

        // A realizes 100_000 and pays 10 bps on it
        assert_eq!(out.shares_burned, 100_000);
        assert_eq!(out.withdraw_fee, 100);
        assert_eq!(out.payout, 99_900);
        assert_eq!(a.shares, 0);
        assert_eq!(pool.total_shares, 50_000);
        assert_conserved(&pool, &[&a, &b]);
    }

    #[test]
    fn test_withdraw_fee_free_after_window() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        let shares = a.shares;
        let out = apply_withdraw(
            &mut pool,
            &mut a,
            shares,
            0,
            T0 + DEFAULT_WITHDRAW_FEE_PERIOD as i64,
        )
        .unwrap();

        assert_eq!(out.withdraw_fee, 0);
        assert_eq!(out.payout, 100_000);
    }

    #[test]
    fn test_withdraw_by_amount_clamps_and_converts() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        let out = apply_withdraw(&mut pool, &mut a, 0, 40_000, T0 + WEEK).unwrap();

        assert_eq!(out.shares_burned, 40_000);
        assert_eq!(out.payout, 40_000);
        assert_eq!(a.shares, 60_000);
        assert_eq!(pool.total_amount, 60_000);
    }

    #[test]
    fn test_withdraw_more_than_held_rejected() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        let err = apply_withdraw(&mut pool, &mut a, 100_001, 0, T0 + WEEK);
        assert!(err.is_err());
    }

    // --- zero-op deposits ---

    #[test]
    fn test_zero_deposit_on_empty_position_rejected() {
        let mut pool = test_pool();
        let mut a = test_user();
        assert!(apply_deposit(&mut pool, &mut a, 0, 0, T0).is_err());
    }

    #[test]
    fn test_zero_deposit_settles_without_touching_principal() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        let out = apply_deposit(&mut pool, &mut a, 0, 0, T0 + DAY).unwrap();

        // No yield accrued: no fee, value unchanged
        assert_eq!(out.settle.performance_fee, 0);
        assert_eq!(a.last_user_action_amount, 100_000);
        assert_eq!(pool.total_amount, 100_000);
        assert_conserved(&pool, &[&a]);
    }

    #[test]
    fn test_deposit_below_floor_rejected() {
        let mut pool = test_pool();
        let mut a = test_user();
        assert!(apply_deposit(&mut pool, &mut a, MIN_DEPOSIT_AMOUNT - 1, 0, T0).is_err());
    }

    // --- performance fee ---

    #[test]
    fn test_performance_fee_skimmed_on_settlement() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        // Harvested yield lands in the pool
        pool.credit(10_000).unwrap();

        let out = apply_deposit(&mut pool, &mut a, 0, 0, T0 + DAY).unwrap();

        // 200 bps of the 10_000 gain
        assert_eq!(out.settle.performance_fee, 200);
        assert_eq!(a.last_user_action_amount, 109_800);
        assert_eq!(pool.total_amount, 109_800);

        // Cost basis moved: settling again charges nothing
        let again = apply_deposit(&mut pool, &mut a, 0, 0, T0 + 2 * DAY).unwrap();
        assert_eq!(again.settle.performance_fee, 0);
        assert_conserved(&pool, &[&a]);
    }

    #[test]
    fn test_performance_fee_exempt_position_not_settled() {
        let mut pool = test_pool();
        let mut a = test_user();
        a.performance_fee_exempt = true;

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        pool.credit(10_000).unwrap();

        let before = a.shares;
        let out = apply_deposit(&mut pool, &mut a, 0, 0, T0 + DAY).unwrap();
        assert_eq!(out.settle.performance_fee, 0);
        assert_eq!(a.shares, before);
    }

    // --- locking and boost ---

    #[test]
    fn test_full_duration_lock_doubles_shares_and_books_debt() {
        let mut pool = test_pool();
        let mut a = test_user();

        let out = apply_deposit(&mut pool, &mut a, 100_000, DURATION_FACTOR, T0).unwrap();

        // boost_weight == PRECISION_FACTOR at full duration: base 100_000
        // shares doubled, and an equal token-value debt booked
        assert_eq!(out.shares_minted, 200_000);
        assert_eq!(a.shares, 200_000);
        assert_eq!(a.user_boosted_share, 100_000);
        assert_eq!(pool.total_boost_debt, 100_000);
        assert_eq!(pool.total_locked_amount, 100_000);
        assert_eq!(pool.pool_value().unwrap(), 200_000);
        assert!(a.locked);
        assert_eq!(a.lock_end_time, T0 + DURATION_FACTOR as i64);
        // Cost basis excludes the phantom boost
        assert_eq!(a.last_user_action_amount, 100_000);
        assert_conserved(&pool, &[&a]);
    }

    #[test]
    fn test_lock_duration_bounds() {
        let mut pool = test_pool();
        let mut a = test_user();
        let too_long = pool.max_lock_duration + 1;

        assert!(apply_deposit(&mut pool, &mut a, 100_000, MIN_LOCK_DURATION - 1, T0).is_err());
        assert!(apply_deposit(&mut pool, &mut a, 100_000, too_long, T0).is_err());
        assert!(apply_deposit(&mut pool, &mut a, 100_000, MIN_LOCK_DURATION, T0).is_ok());
    }

    #[test]
    fn test_extension_accumulates_remaining_time() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 10 * WEEK as u64, T0).unwrap();
        let original_end = a.lock_end_time;

        // Pure extension one week in: window grows by exactly the request
        apply_deposit(&mut pool, &mut a, 0, WEEK as u64, T0 + WEEK).unwrap();
        assert_eq!(a.lock_end_time, original_end + WEEK);
        assert_eq!(a.lock_start_time, T0);
        assert_conserved(&pool, &[&a]);
    }

    #[test]
    fn test_extension_beyond_max_rejected() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 300 * DAY as u64, T0).unwrap();
        // 300 days remain; 100 more would exceed the 365-day ceiling
        assert!(apply_deposit(&mut pool, &mut a, 0, 100 * DAY as u64, T0).is_err());
    }

    #[test]
    fn test_topup_restarts_window_and_rebases_principal() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 10 * WEEK as u64, T0).unwrap();

        // Top up with fresh funds two weeks in
        apply_deposit(&mut pool, &mut a, 50_000, 0, T0 + 2 * WEEK).unwrap();

        assert_eq!(a.lock_start_time, T0 + 2 * WEEK);
        // Window end unchanged by a zero-duration top-up
        assert_eq!(a.lock_end_time, T0 + 10 * WEEK);
        // Principal rebased to current locked balance plus the new funds
        assert_eq!(a.locked_amount, 150_000);
        assert_eq!(pool.total_locked_amount, 150_000);
        assert!(a.locked);
        assert_conserved(&pool, &[&a]);
    }

    #[test]
    fn test_withdraw_rejected_while_locked() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, MIN_LOCK_DURATION, T0).unwrap();
        let shares = a.shares;

        assert!(apply_withdraw(&mut pool, &mut a, shares, 0, T0 + DAY).is_err());
        // Boundary: still locked at the exact expiry instant
        assert!(
            apply_withdraw(&mut pool, &mut a, shares, 0, T0 + MIN_LOCK_DURATION as i64).is_err()
        );
    }

    // --- unlock / overdue ---

    #[test]
    fn test_settlement_after_expiry_unwinds_boost_within_grace() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, DURATION_FACTOR, T0).unwrap();

        let expiry = T0 + DURATION_FACTOR as i64;
        let out = apply_deposit(&mut pool, &mut a, 0, 0, expiry + 1).unwrap();

        assert!(out.settle.unlocked);
        assert_eq!(out.settle.overdue_fee_treasury, 0);
        assert_eq!(out.settle.overdue_fee_burned, 0);
        assert!(!a.locked);
        assert_eq!(a.lock_start_time, 0);
        assert_eq!(a.lock_end_time, 0);
        assert_eq!(a.locked_amount, 0);
        assert_eq!(a.user_boosted_share, 0);
        assert_eq!(pool.total_boost_debt, 0);
        assert_eq!(pool.total_locked_amount, 0);
        // Phantom value gone: the position is worth its real principal again
        assert_eq!(a.shares, 100_000);
        assert_eq!(pool.pool_value().unwrap(), 100_000);
        assert_conserved(&pool, &[&a]);
    }

    #[test]
    fn test_overdue_fee_on_late_settlement_splits_treasury_and_burn() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, DURATION_FACTOR, T0).unwrap();
        // Yield accrues while locked
        pool.credit(20_000).unwrap();

        let expiry = T0 + DURATION_FACTOR as i64;
        let grace = DEFAULT_UNLOCK_FREE_DURATION as i64;
        // Half the overdue saturation window past the grace period
        let now = expiry + grace + (DEFAULT_DURATION_FACTOR_OVERDUE / 2) as i64;

        let out = apply_deposit(&mut pool, &mut a, 0, 0, now).unwrap();

        // Redeemable 120_000, principal 100_000: gain 20_000 at half rate
        assert_eq!(out.settle.overdue_fee_treasury, 5_000);
        assert_eq!(out.settle.overdue_fee_burned, 5_000);
        assert!(out.settle.unlocked);
        assert_eq!(a.last_user_action_amount, 110_000);
        assert_eq!(pool.total_amount, 110_000);
        assert_eq!(pool.total_boost_debt, 0);
        assert_conserved(&pool, &[&a]);
    }

    #[test]
    fn test_overdue_exempt_pays_nothing() {
        let mut pool = test_pool();
        let mut a = test_user();
        a.overdue_fee_exempt = true;

        apply_deposit(&mut pool, &mut a, 100_000, DURATION_FACTOR, T0).unwrap();
        pool.credit(20_000).unwrap();

        let now = T0 + (DURATION_FACTOR + DEFAULT_UNLOCK_FREE_DURATION) as i64 + 30 * DAY;
        let out = apply_deposit(&mut pool, &mut a, 0, 0, now).unwrap();

        assert_eq!(out.settle.overdue_fee_treasury, 0);
        assert_eq!(out.settle.overdue_fee_burned, 0);
        assert_eq!(a.last_user_action_amount, 120_000);
    }

    #[test]
    fn test_no_withdraw_fee_on_freshly_unlocked_value() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, MIN_LOCK_DURATION, T0).unwrap();

        // Withdraw right after expiry: settlement releases the lock and the
        // fee window (72h < 1 week lock) lapsed long ago
        let now = T0 + MIN_LOCK_DURATION as i64 + 1;
        let shares = a.shares;
        let out = apply_withdraw(&mut pool, &mut a, shares, 0, now).unwrap();

        assert!(out.settle.unlocked);
        assert_eq!(out.withdraw_fee, 0);
        assert_eq!(out.payout, 100_000);
        assert_eq!(pool.total_shares, 0);
        assert_eq!(pool.total_boost_debt, 0);
    }

    // --- mixed-population conservation ---

    #[test]
    fn test_conservation_across_mixed_sequence() {
        let mut pool = test_pool();
        let mut a = test_user();
        let mut b = test_user();
        let mut c = test_user();

        apply_deposit(&mut pool, &mut a, 500_000, 0, T0).unwrap();
        apply_deposit(&mut pool, &mut b, 250_000, DURATION_FACTOR / 2, T0).unwrap();
        assert_conserved(&pool, &[&a, &b, &c]);

        pool.credit(75_000).unwrap();
        apply_deposit(&mut pool, &mut c, 125_000, 0, T0 + DAY).unwrap();
        assert_conserved(&pool, &[&a, &b, &c]);

        let half = a.shares / 2;
        apply_withdraw(&mut pool, &mut a, half, 0, T0 + 2 * DAY).unwrap();
        assert_conserved(&pool, &[&a, &b, &c]);

        // B's lock expires and is settled late
        let late = T0 + (DURATION_FACTOR / 2 + DEFAULT_UNLOCK_FREE_DURATION) as i64 + 10 * DAY;
        apply_deposit(&mut pool, &mut b, 0, 0, late).unwrap();
        assert_conserved(&pool, &[&a, &b, &c]);
        assert_eq!(pool.total_boost_debt, 0);

        let rest = a.shares;
        apply_withdraw(&mut pool, &mut a, rest, 0, late + DAY).unwrap();
        assert_conserved(&pool, &[&a, &b, &c]);
    }

    #[test]
    fn test_stock_funds_swept_when_no_shares_outstanding() {
        let mut pool = test_pool();
        let mut a = test_user();

        // Residual dust from a fully-drained pool
        pool.credit(777).unwrap();

        let out = apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        assert_eq!(out.stock_amount, 777);
        assert_eq!(pool.total_amount, 100_000);
        assert_eq!(a.shares, 100_000);
    }

    #[test]
    fn test_flexible_position_converts_to_locked() {
        let mut pool = test_pool();
        let mut a = test_user();

        apply_deposit(&mut pool, &mut a, 100_000, 0, T0).unwrap();
        // Locking an existing flexible balance folds it into the lock
        apply_deposit(&mut pool, &mut a, 0, MIN_LOCK_DURATION, T0 + DAY).unwrap();

        assert!(a.locked);
        assert_eq!(a.locked_amount, 100_000);
        assert_eq!(pool.total_locked_amount, 100_000);
        assert!(a.user_boosted_share > 0);
        assert_conserved(&pool, &[&a]);
    }
}
