use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    constants::POSITION_SEED,
    error::VaultError,
    events::{OverdueFeeCharged, PerformanceFeeCharged, Unlock, Withdraw as WithdrawEvent},
    instructions::common,
    settle,
    state::{Pool, UserPosition},
};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        constraint = !pool.paused @ VaultError::PoolPaused,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key(),
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
}

/// Withdraw by share count. `withdraw_all` passes the full balance;
/// `withdraw_by_amount` passes `shares == 0` and a token amount instead.
pub fn handler(ctx: Context<Withdraw>, shares: u64, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let pool = &mut ctx.accounts.pool;
    let position = &mut ctx.accounts.position;

    common::harvest_pending(
        pool,
        &ctx.accounts.reward_vault,
        &ctx.accounts.asset_vault,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        ctx.accounts.owner.key(),
    )?;

    let out = settle::apply_withdraw(pool, position, shares, amount, now)?;

    let pool = &ctx.accounts.pool;
    let settle_treasury = out.settle.treasury_total();
    let treasury_total = out
        .withdraw_fee
        .checked_add(settle_treasury)
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
    common::transfer_from_pool(
        pool,
        &ctx.accounts.asset_vault,
        &ctx.accounts.owner_token_account,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        out.payout,
    )?;

    let pool_key = pool.key();
    let owner_key = ctx.accounts.owner.key();

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
    emit!(WithdrawEvent {
        pool: pool_key,
        owner: owner_key,
        amount: out.payout,
        shares: out.shares_burned,
        withdraw_fee: out.withdraw_fee,
    });

    Ok(())
}
