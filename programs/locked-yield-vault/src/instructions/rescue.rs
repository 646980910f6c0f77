use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{error::VaultError, events::TokensRescued, instructions::common, state::Pool};

#[derive(Accounts)]
pub struct RescueTokens<'info> {
    #[account(
        constraint = admin.key() == pool.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    pub pool: Account<'info, Pool>,

    /// Any mint except the pool's principal
    #[account(
        constraint = stuck_mint.key() != pool.asset_mint @ VaultError::CannotRescuePrincipal,
    )]
    pub stuck_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = stuck_vault.mint == stuck_mint.key(),
        constraint = stuck_vault.owner == pool.key(),
    )]
    pub stuck_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        constraint = recipient.mint == stuck_mint.key(),
    )]
    pub recipient: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Sweep tokens mistakenly sent to a pool-owned account. The principal mint
/// is rejected outright, so user funds can never leave through this path.
pub fn handler(ctx: Context<RescueTokens>) -> Result<()> {
    let amount = ctx.accounts.stuck_vault.amount;
    require!(amount > 0, VaultError::ZeroAmount);

    common::transfer_from_pool(
        &ctx.accounts.pool,
        &ctx.accounts.stuck_vault,
        &ctx.accounts.recipient,
        &ctx.accounts.stuck_mint,
        &ctx.accounts.token_program,
        amount,
    )?;

    emit!(TokensRescued {
        pool: ctx.accounts.pool.key(),
        mint: ctx.accounts.stuck_mint.key(),
        amount,
    });

    Ok(())
}
