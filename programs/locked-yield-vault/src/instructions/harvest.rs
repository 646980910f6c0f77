use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{error::VaultError, instructions::common, state::Pool};

#[derive(Accounts)]
pub struct Harvest<'info> {
    /// Permissionless: any keeper may realize pending yield
    pub caller: Signer<'info>,

    #[account(
        mut,
        constraint = !pool.paused @ VaultError::PoolPaused,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
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

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Harvest>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    common::harvest_pending(
        pool,
        &ctx.accounts.reward_vault,
        &ctx.accounts.asset_vault,
        &ctx.accounts.asset_mint,
        &ctx.accounts.token_program,
        ctx.accounts.caller.key(),
    )?;

    Ok(())
}
