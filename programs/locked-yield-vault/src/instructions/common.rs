use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::POOL_SEED;
use crate::events::Harvest as HarvestEvent;
use crate::state::Pool;

/// Transfer out of a pool-owned token account, signed by the pool PDA.
/// Zero amounts are a no-op so callers can pass fee totals unconditionally.
pub fn transfer_from_pool<'info>(
    pool: &Account<'info, Pool>,
    from: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let asset_mint_key = pool.asset_mint;
    let vault_id_bytes = pool.vault_id.to_le_bytes();
    let bump = [pool.bump];
    let seeds: &[&[u8]] = &[
        POOL_SEED,
        asset_mint_key.as_ref(),
        vault_id_bytes.as_ref(),
        &bump,
    ];

    transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                to: to.to_account_info(),
                mint: mint.to_account_info(),
                authority: pool.to_account_info(),
            },
            &[seeds],
        ),
        amount,
        mint.decimals,
    )
}

/// Burn tokens held by the pool's asset vault (pool PDA is the account
/// owner, so no mint authority is involved).
pub fn burn_from_pool<'info>(
    pool: &Account<'info, Pool>,
    vault: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let asset_mint_key = pool.asset_mint;
    let vault_id_bytes = pool.vault_id.to_le_bytes();
    let bump = [pool.bump];
    let seeds: &[&[u8]] = &[
        POOL_SEED,
        asset_mint_key.as_ref(),
        vault_id_bytes.as_ref(),
        &bump,
    ];

    burn(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Burn {
                mint: mint.to_account_info(),
                from: vault.to_account_info(),
                authority: pool.to_account_info(),
            },
            &[seeds],
        ),
        amount,
    )
}

/// Pull all accrued farm yield into the asset vault. Runs before every
/// share-affecting operation so conversions see an up-to-date pool value.
pub fn harvest_pending<'info>(
    pool: &mut Account<'info, Pool>,
    reward_vault: &InterfaceAccount<'info, TokenAccount>,
    asset_vault: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    token_program: &Interface<'info, TokenInterface>,
    caller: Pubkey,
) -> Result<u64> {
    let pending = reward_vault.amount;
    if pending == 0 {
        return Ok(0);
    }

    transfer_from_pool(pool, reward_vault, asset_vault, mint, token_program, pending)?;
    pool.credit(pending)?;

    emit!(HarvestEvent {
        pool: pool.key(),
        caller,
        amount: pending,
    });

    Ok(pending)
}
