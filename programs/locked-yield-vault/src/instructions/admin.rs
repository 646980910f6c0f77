use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::{
    constants::{
        BOOST_WEIGHT_LIMIT, MAX_LOCK_DURATION_LIMIT, MAX_OVERDUE_FEE_RATE,
        MAX_PERFORMANCE_FEE_BPS, MAX_UNLOCK_FREE_DURATION, MAX_WITHDRAW_FEE_BPS,
        MAX_WITHDRAW_FEE_PERIOD, MIN_LOCK_DURATION,
    },
    error::VaultError,
    events::{
        AdminTransferred, FeeScheduleUpdated, OperatorUpdated, PoolStatusChanged, PoolSynced,
        TreasuryUpdated,
    },
    state::Pool,
};

#[derive(Accounts)]
pub struct Admin<'info> {
    #[account(
        constraint = admin.key() == pool.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub pool: Account<'info, Pool>,
}

#[derive(Accounts)]
pub struct Sync<'info> {
    #[account(
        constraint = admin.key() == pool.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub pool: Account<'info, Pool>,

    #[account(
        constraint = asset_vault.key() == pool.asset_vault,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,
}

#[derive(Accounts)]
pub struct SetTreasury<'info> {
    #[account(
        constraint = admin.key() == pool.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub pool: Account<'info, Pool>,

    #[account(
        constraint = new_treasury.mint == pool.asset_mint,
    )]
    pub new_treasury: InterfaceAccount<'info, TokenAccount>,
}

fn emit_schedule(pool: &Account<Pool>) {
    emit!(FeeScheduleUpdated {
        pool: pool.key(),
        performance_fee_bps: pool.performance_fee_bps,
        withdraw_fee_bps: pool.withdraw_fee_bps,
        withdraw_fee_period: pool.withdraw_fee_period,
        overdue_fee_rate: pool.overdue_fee_rate,
        unlock_free_duration: pool.unlock_free_duration,
        max_lock_duration: pool.max_lock_duration,
        duration_factor_overdue: pool.duration_factor_overdue,
        boost_weight: pool.boost_weight,
    });
}

pub fn set_performance_fee(ctx: Context<Admin>, fee_bps: u64) -> Result<()> {
    require!(fee_bps <= MAX_PERFORMANCE_FEE_BPS, VaultError::ParameterTooHigh);
    ctx.accounts.pool.performance_fee_bps = fee_bps;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_withdraw_fee(ctx: Context<Admin>, fee_bps: u64) -> Result<()> {
    require!(fee_bps <= MAX_WITHDRAW_FEE_BPS, VaultError::ParameterTooHigh);
    ctx.accounts.pool.withdraw_fee_bps = fee_bps;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_withdraw_fee_period(ctx: Context<Admin>, period: u64) -> Result<()> {
    require!(period <= MAX_WITHDRAW_FEE_PERIOD, VaultError::ParameterTooHigh);
    ctx.accounts.pool.withdraw_fee_period = period;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_overdue_fee_rate(ctx: Context<Admin>, rate: u64) -> Result<()> {
    require!(rate <= MAX_OVERDUE_FEE_RATE, VaultError::ParameterTooHigh);
    ctx.accounts.pool.overdue_fee_rate = rate;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_unlock_free_duration(ctx: Context<Admin>, duration: u64) -> Result<()> {
    require!(
        duration <= MAX_UNLOCK_FREE_DURATION,
        VaultError::ParameterTooHigh
    );
    ctx.accounts.pool.unlock_free_duration = duration;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_max_lock_duration(ctx: Context<Admin>, duration: u64) -> Result<()> {
    require!(duration >= MIN_LOCK_DURATION, VaultError::LockDurationTooShort);
    require!(
        duration <= MAX_LOCK_DURATION_LIMIT,
        VaultError::ParameterTooHigh
    );
    ctx.accounts.pool.max_lock_duration = duration;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_duration_factor_overdue(ctx: Context<Admin>, duration: u64) -> Result<()> {
    require!(duration > 0, VaultError::ZeroAmount);
    require!(
        duration <= MAX_LOCK_DURATION_LIMIT,
        VaultError::ParameterTooHigh
    );
    ctx.accounts.pool.duration_factor_overdue = duration;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_boost_weight(ctx: Context<Admin>, weight: u64) -> Result<()> {
    require!(weight <= BOOST_WEIGHT_LIMIT, VaultError::ParameterTooHigh);
    ctx.accounts.pool.boost_weight = weight;
    emit_schedule(&ctx.accounts.pool);
    Ok(())
}

pub fn set_operator(ctx: Context<Admin>, new_operator: Pubkey) -> Result<()> {
    require!(new_operator != Pubkey::default(), VaultError::ZeroAddress);

    let pool = &mut ctx.accounts.pool;
    let previous_operator = pool.operator;
    pool.operator = new_operator;

    emit!(OperatorUpdated {
        pool: pool.key(),
        previous_operator,
        new_operator,
    });

    Ok(())
}

pub fn set_treasury(ctx: Context<SetTreasury>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let previous_treasury = pool.treasury;
    pool.treasury = ctx.accounts.new_treasury.key();

    emit!(TreasuryUpdated {
        pool: pool.key(),
        previous_treasury,
        new_treasury: pool.treasury,
    });

    Ok(())
}

pub fn transfer_admin(ctx: Context<Admin>, new_admin: Pubkey) -> Result<()> {
    require!(new_admin != Pubkey::default(), VaultError::ZeroAddress);

    let pool = &mut ctx.accounts.pool;
    let previous_admin = pool.admin;
    pool.admin = new_admin;

    emit!(AdminTransferred {
        pool: pool.key(),
        previous_admin,
        new_admin,
    });

    Ok(())
}

/// Reconcile the cached balance with the asset vault.
/// Used when tokens are donated directly to the vault account.
pub fn sync(ctx: Context<Sync>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let previous_total = pool.total_amount;
    let actual_balance = ctx.accounts.asset_vault.amount;

    pool.total_amount = actual_balance;

    emit!(PoolSynced {
        pool: pool.key(),
        previous_total,
        new_total: actual_balance,
    });

    Ok(())
}

/// Pause all user operations (emergency circuit breaker)
pub fn pause(ctx: Context<Admin>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;

    require!(!pool.paused, VaultError::PoolPaused);
    pool.paused = true;

    emit!(PoolStatusChanged {
        pool: pool.key(),
        paused: true,
    });

    Ok(())
}

/// Unpause user operations
pub fn unpause(ctx: Context<Admin>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;

    require!(pool.paused, VaultError::PoolPaused);
    pool.paused = false;

    emit!(PoolStatusChanged {
        pool: pool.key(),
        paused: false,
    });

    Ok(())
}
