use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::{
    constants::POSITION_SEED,
    error::VaultError,
    events::{Deposit as DepositEvent, Lock, OverdueFeeCharged, PerformanceFeeCharged, Unlock},
    instructions::common,
    settle,
    state::{Pool, UserPosition},
};

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        constraint = !pool.paused @ VaultError::PoolPaused,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = owner,
        space = UserPosition::LEN,
        seeds = [POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub position: Account<'info, UserPosition>,

    #[account(
        mut,
        constraint = asset_mint.key() == pool.asset_mint,
    )]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = owner_token_account.mint == pool.asset_mint,
        constraint = owner_token_account.owner == owner.key(),
    )]
    pub owner_token_account: InterfaceAccount<'info, TokenAccount>,

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
    pub system_program: Program<'info, System>,
}

/// Deposit principal and/or take out (or extend) a lock.
///
/// Ordering is fixed: harvest, settle the position's pending fee/boost/lock
/// state, apply the new principal and lock, then move fees. A `(0, 0)` call
/// on a live position is a pure settlement.
pub fn handler(ctx: Context<Deposit>, amount: u64, lock_duration: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.pool = ctx.accounts.pool.key();
        position.owner = ctx.accounts.owner.key();
        position.bump = ctx.bumps.position;
    }

    let pool = &mut ctx.accounts.pool;
    common::harvest_pending(
        pool,
        &ctx.accounts.reward_vault,
        &ctx.accounts.asset_vault,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        ctx.accounts.owner.key(),
    )?;

    let out = settle::apply_deposit(pool, position, amount, lock_duration, now)?;

    // Principal in
    if amount > 0 {
        transfer_checked(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.owner_token_account.to_account_info(),
                    to: ctx.accounts.asset_vault.to_account_info(),
                    mint: ctx.accounts.asset_mint.to_account_info(),
                    authority: ctx.accounts.owner.to_account_info(),
                },
            ),
            amount,
            ctx.accounts.asset_mint.decimals,
        )?;
    }

    // Fees and swept stock out
    let pool = &ctx.accounts.pool;
    let treasury_total = out
        .stock_amount
        .checked_add(out.settle.treasury_total())
        .ok_or(VaultError::MathOverflow)?;
    common::transfer_from_pool(
        pool,
        &ctx.accounts.asset_vault,
        &ctx.accounts.treasury,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        treasury_total,
    )?;
    common::burn_from_pool(
        pool,
        &ctx.accounts.asset_vault,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        out.settle.overdue_fee_burned,
    )?;

    let pool_key = pool.key();
    let owner_key = ctx.accounts.owner.key();
    let position = &ctx.accounts.position;

    if out.settle.performance_fee > 0 {
        emit!(PerformanceFeeCharged {
            pool: pool_key,
            owner: owner_key,
            fee: out.settle.performance_fee,
        });
    }
    if out.settle.overdue_fee_treasury > 0 || out.settle.overdue_fee_burned > 0 {
        emit!(OverdueFeeCharged {
            pool: pool_key,
            owner: owner_key,
            fee_to_treasury: out.settle.overdue_fee_treasury,
            fee_burned: out.settle.overdue_fee_burned,
        });
    }
    if out.settle.unlocked {
        emit!(Unlock {
            pool: pool_key,
            owner: owner_key,
            amount: out.settle.settled_amount,
            timestamp: now,
        });
    }
    if position.locked {
        emit!(Lock {
            pool: pool_key,
            owner: owner_key,
            locked_amount: position.locked_amount,
            shares: position.shares,
            lock_end_time: position.lock_end_time,
            timestamp: now,
        });
    }
    emit!(DepositEvent {
        pool: pool_key,
        owner: owner_key,
        amount,
        shares: out.shares_minted,
        lock_duration,
        timestamp: now,
    });

    Ok(())
}
