use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    constants::{
        ASSET_VAULT_SEED, DEFAULT_BOOST_WEIGHT, DEFAULT_DURATION_FACTOR_OVERDUE,
        DEFAULT_MAX_LOCK_DURATION, DEFAULT_OVERDUE_FEE_RATE, DEFAULT_PERFORMANCE_FEE_BPS,
        DEFAULT_UNLOCK_FREE_DURATION, DEFAULT_WITHDRAW_FEE_BPS, DEFAULT_WITHDRAW_FEE_PERIOD,
        DURATION_FACTOR, POOL_SEED, REWARD_VAULT_SEED,
    },
    error::VaultError,
    events::PoolInitialized,
    state::Pool,
};

#[derive(Accounts)]
#[instruction(vault_id: u64)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = Pool::LEN,
        seeds = [POOL_SEED, asset_mint.key().as_ref(), &vault_id.to_le_bytes()],
        bump
    )]
    pub pool: Account<'info, Pool>,

    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = admin,
        seeds = [ASSET_VAULT_SEED, pool.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,

    /// The external farm accrues this pool's yield here
    #[account(
        init,
        payer = admin,
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        constraint = treasury.mint == asset_mint.key(),
    )]
    pub treasury: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: any address; stored and later compared against unlock callers
    pub operator: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, vault_id: u64) -> Result<()> {
    require!(
        ctx.accounts.operator.key() != Pubkey::default(),
        VaultError::ZeroAddress
    );

    let pool = &mut ctx.accounts.pool;
    pool.admin = ctx.accounts.admin.key();
    pool.operator = ctx.accounts.operator.key();
    pool.treasury = ctx.accounts.treasury.key();
    pool.asset_mint = ctx.accounts.asset_mint.key();
    pool.asset_vault = ctx.accounts.asset_vault.key();
    pool.reward_vault = ctx.accounts.reward_vault.key();
    pool.total_shares = 0;
    pool.total_boost_debt = 0;
    pool.total_locked_amount = 0;
    pool.total_amount = 0;
    pool.performance_fee_bps = DEFAULT_PERFORMANCE_FEE_BPS;
    pool.withdraw_fee_bps = DEFAULT_WITHDRAW_FEE_BPS;
    pool.withdraw_fee_period = DEFAULT_WITHDRAW_FEE_PERIOD;
    pool.overdue_fee_rate = DEFAULT_OVERDUE_FEE_RATE;
    pool.unlock_free_duration = DEFAULT_UNLOCK_FREE_DURATION;
    pool.max_lock_duration = DEFAULT_MAX_LOCK_DURATION;
    pool.duration_factor = DURATION_FACTOR;
    pool.duration_factor_overdue = DEFAULT_DURATION_FACTOR_OVERDUE;
    pool.boost_weight = DEFAULT_BOOST_WEIGHT;
    pool.vault_id = vault_id;
    pool.bump = ctx.bumps.pool;
    pool.paused = false;
    pool._reserved = [0u8; 64];

    emit!(PoolInitialized {
        pool: pool.key(),
        admin: pool.admin,
        asset_mint: pool.asset_mint,
        treasury: pool.treasury,
        vault_id,
    });

    Ok(())
}
