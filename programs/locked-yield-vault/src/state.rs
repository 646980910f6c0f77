use anchor_lang::prelude::*;

use crate::constants::POOL_SEED;
use crate::error::VaultError;

#[account]
pub struct Pool {
    /// Pool admin who can pause/unpause and tune the fee schedule
    pub admin: Pubkey,
    /// Operator allowed to unlock expired positions on behalf of owners
    pub operator: Pubkey,
    /// Token account receiving all treasury fees
    pub treasury: Pubkey,
    /// Underlying asset mint
    pub asset_mint: Pubkey,
    /// Token account holding principal (authority = pool PDA)
    pub asset_vault: Pubkey,
    /// Token account the external farm accrues yield into (authority = pool PDA)
    pub reward_vault: Pubkey,
    /// Total shares outstanding across all positions
    pub total_shares: u64,
    /// Phantom value credited to locked positions, not backed by real balance
    pub total_boost_debt: u64,
    /// Sum of locked principal across positions (informational)
    pub total_locked_amount: u64,
    /// Cached real token balance (kept in sync on every transfer in/out)
    pub total_amount: u64,
    /// Performance fee on flexible gains, in basis points
    pub performance_fee_bps: u64,
    /// Withdraw fee inside the fee window, in basis points
    pub withdraw_fee_bps: u64,
    /// Seconds after a deposit during which the withdraw fee applies
    pub withdraw_fee_period: u64,
    /// Overdue fee rate, scaled by PRECISION_FACTOR
    pub overdue_fee_rate: u64,
    /// Grace period after lock expiry before the overdue fee accrues
    pub unlock_free_duration: u64,
    /// Admin-tunable ceiling on total lock duration
    pub max_lock_duration: u64,
    /// Lock duration at which the boost weight reaches `boost_weight`
    pub duration_factor: u64,
    /// Overdue duration at which the overdue rate saturates
    pub duration_factor_overdue: u64,
    /// Boost weight per full `duration_factor` of lock, scaled by PRECISION_FACTOR
    pub boost_weight: u64,
    /// Unique pool identifier (allows multiple pools per asset)
    pub vault_id: u64,
    /// PDA bump seed
    pub bump: u8,
    /// Emergency pause flag
    pub paused: bool,
    /// Reserved for future upgrades
    pub _reserved: [u8; 64],
}

impl Pool {
    pub const LEN: usize = 8 +  // discriminator
        32 +  // admin
        32 +  // operator
        32 +  // treasury
        32 +  // asset_mint
        32 +  // asset_vault
        32 +  // reward_vault
        8 +   // total_shares
        8 +   // total_boost_debt
        8 +   // total_locked_amount
        8 +   // total_amount
        8 +   // performance_fee_bps
        8 +   // withdraw_fee_bps
        8 +   // withdraw_fee_period
        8 +   // overdue_fee_rate
        8 +   // unlock_free_duration
        8 +   // max_lock_duration
        8 +   // duration_factor
        8 +   // duration_factor_overdue
        8 +   // boost_weight
        8 +   // vault_id
        1 +   // bump
        1 +   // paused
        64; // _reserved

    pub const SEED_PREFIX: &'static [u8] = POOL_SEED;

    /// Pool value: real balance plus the boost debt credited to locked users.
    pub fn pool_value(&self) -> Result<u64> {
        self.total_amount
            .checked_add(self.total_boost_debt)
            .ok_or_else(|| error!(VaultError::MathOverflow))
    }

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.total_amount = self
            .total_amount
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<()> {
        self.total_amount = self
            .total_amount
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientAssets)?;
        Ok(())
    }
}

#[account]
pub struct UserPosition {
    /// The pool this position belongs to
    pub pool: Pubkey,
    /// The position owner's wallet address
    pub owner: Pubkey,
    /// Claim on pool value, in share units
    pub shares: u64,
    /// When the owner last added principal or extended a lock
    pub last_deposited_time: i64,
    /// Token-equivalent value at last settlement (performance fee cost basis)
    pub last_user_action_amount: u64,
    /// When the position was last settled
    pub last_user_action_time: i64,
    pub lock_start_time: i64,
    pub lock_end_time: i64,
    /// This position's contribution to the pool's boost debt
    pub user_boosted_share: u64,
    /// Locked principal, the overdue fee cost basis
    pub locked_amount: u64,
    pub locked: bool,
    pub performance_fee_exempt: bool,
    pub withdraw_fee_exempt: bool,
    pub overdue_fee_exempt: bool,
    /// PDA bump seed
    pub bump: u8,
    /// Reserved for future upgrades
    pub _reserved: [u8; 32],
}

impl UserPosition {
    pub const LEN: usize = 8 +  // discriminator
        32 +  // pool
        32 +  // owner
        8 +   // shares
        8 +   // last_deposited_time
        8 +   // last_user_action_amount
        8 +   // last_user_action_time
        8 +   // lock_start_time
        8 +   // lock_end_time
        8 +   // user_boosted_share
        8 +   // locked_amount
        1 +   // locked
        1 +   // performance_fee_exempt
        1 +   // withdraw_fee_exempt
        1 +   // overdue_fee_exempt
        1 +   // bump
        32; // _reserved

    /// Whether the position holds an unexpired lock.
    pub fn lock_active(&self, now: i64) -> bool {
        self.locked && self.lock_end_time >= now
    }

    /// Whether the lock exists but has already expired.
    pub fn lock_expired(&self, now: i64) -> bool {
        self.locked && self.lock_end_time < now
    }
}
