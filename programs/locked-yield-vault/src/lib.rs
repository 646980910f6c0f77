use anchor_lang::prelude::*;

pub mod boost;
pub mod constants;
pub mod error;
pub mod events;
pub mod fees;
pub mod instructions;
pub mod math;
pub mod settle;
pub mod state;

use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod locked_yield_vault {
    use super::*;

    /// Initialize a new pool for the given asset
    pub fn initialize(ctx: Context<Initialize>, vault_id: u64) -> Result<()> {
        instructions::initialize::handler(ctx, vault_id)
    }

    /// Deposit principal and/or take out or extend a lock.
    /// Harvests, settles pending fee/boost/lock state, then applies the new
    /// principal at current pool pricing.
    pub fn deposit(ctx: Context<Deposit>, amount: u64, lock_duration: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount, lock_duration)
    }

    /// Withdraw by share count (rejected while a lock is unexpired)
    pub fn withdraw(ctx: Context<Withdraw>, shares: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, shares, 0)
    }

    /// Withdraw by token amount, converted at post-settlement pricing
    pub fn withdraw_by_amount(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, 0, amount)
    }

    /// Withdraw the position's full share balance
    pub fn withdraw_all(ctx: Context<Withdraw>) -> Result<()> {
        let shares = ctx.accounts.position.shares;
        instructions::withdraw::handler(ctx, shares, 0)
    }

    /// Settle an expired lock back to flexible. Callable by the position
    /// owner or the pool operator; expiry must be strictly past.
    pub fn unlock(ctx: Context<Unlock>) -> Result<()> {
        instructions::unlock::handler(ctx)
    }

    /// Pull accrued farm yield into the pool (permissionless)
    pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
        instructions::harvest::handler(ctx)
    }

    // ============ View Functions (CPI composable) ============

    /// Pool value per share, scaled by 1e12 (u128 LE return data)
    pub fn get_price_per_full_share(ctx: Context<PoolView>) -> Result<()> {
        instructions::view::get_price_per_full_share(ctx)
    }

    /// Total underlying value: real balance plus boost debt
    pub fn balance_of(ctx: Context<PoolView>) -> Result<()> {
        instructions::view::balance_of(ctx)
    }

    /// Free token balance held by the vault
    pub fn available(ctx: Context<PoolBalanceView>) -> Result<()> {
        instructions::view::available(ctx)
    }

    /// Farm yield accrued and not yet harvested
    pub fn calculate_total_pending_rewards(ctx: Context<PoolPendingView>) -> Result<()> {
        instructions::view::calculate_total_pending_rewards(ctx)
    }

    /// Performance fee a settlement would charge right now
    pub fn calculate_performance_fee(ctx: Context<PositionView>) -> Result<()> {
        instructions::view::calculate_performance_fee(ctx)
    }

    /// Overdue fee a settlement would charge right now
    pub fn calculate_overdue_fee(ctx: Context<PositionView>) -> Result<()> {
        instructions::view::calculate_overdue_fee(ctx)
    }

    /// Withdraw fee that burning `shares` right now would incur
    pub fn calculate_withdraw_fee(ctx: Context<PositionView>, shares: u64) -> Result<()> {
        instructions::view::calculate_withdraw_fee(ctx, shares)
    }

    /// Unrealized gain net of the pending performance fee
    pub fn get_profit(ctx: Context<PositionView>) -> Result<()> {
        instructions::view::get_profit(ctx)
    }

    // ============ Admin ============

    pub fn set_performance_fee(ctx: Context<Admin>, fee_bps: u64) -> Result<()> {
        instructions::admin::set_performance_fee(ctx, fee_bps)
    }

    pub fn set_withdraw_fee(ctx: Context<Admin>, fee_bps: u64) -> Result<()> {
        instructions::admin::set_withdraw_fee(ctx, fee_bps)
    }

    pub fn set_withdraw_fee_period(ctx: Context<Admin>, period: u64) -> Result<()> {
        instructions::admin::set_withdraw_fee_period(ctx, period)
    }

    pub fn set_overdue_fee_rate(ctx: Context<Admin>, rate: u64) -> Result<()> {
        instructions::admin::set_overdue_fee_rate(ctx, rate)
    }

    pub fn set_unlock_free_duration(ctx: Context<Admin>, duration: u64) -> Result<()> {
        instructions::admin::set_unlock_free_duration(ctx, duration)
    }

    pub fn set_max_lock_duration(ctx: Context<Admin>, duration: u64) -> Result<()> {
        instructions::admin::set_max_lock_duration(ctx, duration)
    }

    pub fn set_duration_factor_overdue(ctx: Context<Admin>, duration: u64) -> Result<()> {
        instructions::admin::set_duration_factor_overdue(ctx, duration)
    }

    pub fn set_boost_weight(ctx: Context<Admin>, weight: u64) -> Result<()> {
        instructions::admin::set_boost_weight(ctx, weight)
    }

    pub fn set_operator(ctx: Context<Admin>, new_operator: Pubkey) -> Result<()> {
        instructions::admin::set_operator(ctx, new_operator)
    }

    pub fn set_treasury(ctx: Context<SetTreasury>) -> Result<()> {
        instructions::admin::set_treasury(ctx)
    }

    pub fn transfer_admin(ctx: Context<Admin>, new_admin: Pubkey) -> Result<()> {
        instructions::admin::transfer_admin(ctx, new_admin)
    }

    /// Reconcile the cached balance with the actual vault balance
    pub fn sync(ctx: Context<Sync>) -> Result<()> {
        instructions::admin::sync(ctx)
    }

    /// Pause all user operations (emergency)
    pub fn pause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    /// Unpause user operations
    pub fn unpause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }

    /// Set per-account fee exemption flags
    pub fn configure_position(
        ctx: Context<ConfigurePosition>,
        performance_fee_exempt: bool,
        withdraw_fee_exempt: bool,
        overdue_fee_exempt: bool,
    ) -> Result<()> {
        instructions::configure_position::handler(
            ctx,
            performance_fee_exempt,
            withdraw_fee_exempt,
            overdue_fee_exempt,
        )
    }

    /// Sweep non-principal tokens mistakenly sent to the pool
    pub fn rescue_tokens(ctx: Context<RescueTokens>) -> Result<()> {
        instructions::rescue::handler(ctx)
    }
}
