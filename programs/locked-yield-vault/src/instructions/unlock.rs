use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    constants::POSITION_SEED,
    error::VaultError,
    events::{OverdueFeeCharged, Unlock as UnlockEvent},
    instructions::common,
    settle,
    state::{Pool, UserPosition},
};

#[derive(Accounts)]
pub struct Unlock<'info> {
    /// The position owner, or the pool operator acting on their behalf
    pub caller: Signer<'info>,

    /// CHECK: identifies the position; validated through the PDA seeds
    pub position_owner: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = !pool.paused @ VaultError::PoolPaused,
        constraint = caller.key() == position_owner.key()
            || caller.key() == pool.operator @ VaultError::UnauthorizedOperator,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [POSITION_SEED, pool.key().as_ref(), position_owner.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, UserPosition>,

    #[account(
        mut,
        constraint = asset_mint.key() == pool.asset_mint,
    )]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = asset_vault.key() == pool.asset_vault,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        constraint = reward_vault.key() == pool.reward_vault,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        constraint = treasury.key() == pool.treasury,
    )]
    pub treasury: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Force settlement of an expired lock. Expiry must be strictly past;
/// settlement releases the position back to flexible, charging the overdue
/// fee when the grace window has lapsed.
pub fn handler(ctx: Context<Unlock>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let position = &mut ctx.accounts.position;
    require!(position.locked, VaultError::NotLocked);
    require!(position.lock_end_time < now, VaultError::LockNotExpired);

    let pool = &mut ctx.accounts.pool;
    common::harvest_pending(
        pool,
        &ctx.accounts.reward_vault,
        &ctx.accounts.asset_vault,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        ctx.accounts.caller.key(),
    )?;

    // Same settlement path as a zero deposit
    let out = settle::apply_deposit(pool, position, 0, 0, now)?;

    let pool = &ctx.accounts.pool;
    common::transfer_from_pool(
        pool,
        &ctx.accounts.asset_vault,
        &ctx.accounts.treasury,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        out.settle.treasury_total(),
    )?;
    common::burn_from_pool(
        pool,
        &ctx.accounts.asset_vault,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        out.settle.overdue_fee_burned,
    )?;

    let pool_key = pool.key();
    let owner_key = ctx.accounts.position_owner.key();

    if out.settle.overdue_fee_treasury > 0 || out.settle.overdue_fee_burned > 0 {
        emit!(OverdueFeeCharged {
            pool: pool_key,
            owner: owner_key,
            fee_to_treasury: out.settle.overdue_fee_treasury,
            fee_burned: out.settle.overdue_fee_burned,
        });
    }
    emit!(UnlockEvent {
        pool: pool_key,
        owner: owner_key,
        amount: out.settle.settled_amount,
        timestamp: now,
    });

    Ok(())
}
