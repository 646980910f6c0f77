use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::set_return_data;
use anchor_spl::token_interface::TokenAccount;

use crate::{
    constants::PRECISION_FACTOR,
    math,
    settle::VaultPolicy,
    state::{Pool, UserPosition},
};

#[derive(Accounts)]
pub struct PoolView<'info> {
    pub pool: Account<'info, Pool>,
}

#[derive(Accounts)]
pub struct PoolPendingView<'info> {
    pub pool: Account<'info, Pool>,

    #[account(constraint = reward_vault.key() == pool.reward_vault)]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,
}

#[derive(Accounts)]
pub struct PoolBalanceView<'info> {
    pub pool: Account<'info, Pool>,

    #[account(constraint = asset_vault.key() == pool.asset_vault)]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,
}

#[derive(Accounts)]
pub struct PositionView<'info> {
    pub pool: Account<'info, Pool>,

    #[account(constraint = position.pool == pool.key())]
    pub position: Account<'info, UserPosition>,
}

/// Pool value per share, scaled by PRECISION_FACTOR (returned as u128 LE).
/// An empty ledger prices at exactly one.
pub fn get_price_per_full_share(ctx: Context<PoolView>) -> Result<()> {
    let pool = &ctx.accounts.pool;

    let price = if pool.total_shares == 0 {
        PRECISION_FACTOR
    } else {
        (pool.pool_value()? as u128) * PRECISION_FACTOR / (pool.total_shares as u128)
    };

    set_return_data(&price.to_le_bytes());
    Ok(())
}

/// Total underlying value: real balance plus boost debt.
pub fn balance_of(ctx: Context<PoolView>) -> Result<()> {
    set_return_data(&ctx.accounts.pool.pool_value()?.to_le_bytes());
    Ok(())
}

/// Free token balance actually held by the vault.
pub fn available(ctx: Context<PoolBalanceView>) -> Result<()> {
    set_return_data(&ctx.accounts.asset_vault.amount.to_le_bytes());
    Ok(())
}

/// Yield accrued in the farm and not yet harvested.
pub fn calculate_total_pending_rewards(ctx: Context<PoolPendingView>) -> Result<()> {
    set_return_data(&ctx.accounts.reward_vault.amount.to_le_bytes());
    Ok(())
}

/// Performance fee the position would pay if settled now. Locked and exempt
/// positions pay none.
pub fn calculate_performance_fee(ctx: Context<PositionView>) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;

    let fee = if position.shares == 0 || position.locked || position.performance_fee_exempt {
        0
    } else {
        let value =
            math::value_for_shares(position.shares, pool.pool_value()?, pool.total_shares)?;
        pool.performance_fee(value, position.last_user_action_amount, false)?
    };

    set_return_data(&fee.to_le_bytes());
    Ok(())
}

/// Overdue fee the position would pay if settled now.
pub fn calculate_overdue_fee(ctx: Context<PositionView>) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;
    let now = Clock::get()?.unix_timestamp;

    let fee = if !position.locked || position.shares == 0 {
        0
    } else {
        let value =
            math::value_for_shares(position.shares, pool.pool_value()?, pool.total_shares)?
                .saturating_sub(position.user_boosted_share);
        pool.overdue_fee(
            value,
            position.locked_amount,
            position.lock_end_time,
            now,
            position.overdue_fee_exempt,
        )?
    };

    set_return_data(&fee.to_le_bytes());
    Ok(())
}

/// Withdraw fee that burning `shares` right now would incur.
pub fn calculate_withdraw_fee(ctx: Context<PositionView>, shares: u64) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;
    let now = Clock::get()?.unix_timestamp;

    let shares = shares.min(position.shares);
    let fee = if shares == 0 || pool.total_shares == 0 {
        0
    } else {
        let amount = math::value_for_shares(shares, pool.pool_value()?, pool.total_shares)?;
        pool.withdraw_fee(
            amount,
            position.last_deposited_time,
            now,
            position.withdraw_fee_exempt,
        )?
    };

    set_return_data(&fee.to_le_bytes());
    Ok(())
}

/// Unrealized gain since the last settlement, net of the performance fee a
/// flexible position would owe on it.
pub fn get_profit(ctx: Context<PositionView>) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;

    let profit = if position.shares == 0 {
        0
    } else {
        let value =
            math::value_for_shares(position.shares, pool.pool_value()?, pool.total_shares)?
                .saturating_sub(position.user_boosted_share);
        let gain = value.saturating_sub(position.last_user_action_amount);

        if !position.locked && !position.performance_fee_exempt {
            let fee = pool.performance_fee(value, position.last_user_action_amount, false)?;
            gain.saturating_sub(fee)
        } else {
            gain
        }
    };

    set_return_data(&profit.to_le_bytes());
    Ok(())
}
