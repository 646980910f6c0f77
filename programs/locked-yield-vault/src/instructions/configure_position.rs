use anchor_lang::prelude::*;

use crate::{
    constants::POSITION_SEED,
    error::VaultError,
    events::FeeExemptionsUpdated,
    state::{Pool, UserPosition},
};

#[derive(Accounts)]
pub struct ConfigurePosition<'info> {
    #[account(
        mut,
        constraint = admin.key() == pool.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    pub pool: Account<'info, Pool>,

    /// CHECK: the account whose position is being configured; flags may be
    /// set before the first deposit
    pub position_owner: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = admin,
        space = UserPosition::LEN,
        seeds = [POSITION_SEED, pool.key().as_ref(), position_owner.key().as_ref()],
        bump
    )]
    pub position: Account<'info, UserPosition>,

    pub system_program: Program<'info, System>,
}

/// Set the per-fee-type exemption flags for one account.
pub fn handler(
    ctx: Context<ConfigurePosition>,
    performance_fee_exempt: bool,
    withdraw_fee_exempt: bool,
    overdue_fee_exempt: bool,
) -> Result<()> {
    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.pool = ctx.accounts.pool.key();
        position.owner = ctx.accounts.position_owner.key();
        position.bump = ctx.bumps.position;
    }

    position.performance_fee_exempt = performance_fee_exempt;
    position.withdraw_fee_exempt = withdraw_fee_exempt;
    position.overdue_fee_exempt = overdue_fee_exempt;

    emit!(FeeExemptionsUpdated {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.position_owner.key(),
        performance_fee_exempt,
        withdraw_fee_exempt,
        overdue_fee_exempt,
    });

    Ok(())
}
