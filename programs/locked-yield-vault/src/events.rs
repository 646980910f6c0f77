use anchor_lang::prelude::*;

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub admin: Pubkey,
    pub asset_mint: Pubkey,
    pub treasury: Pubkey,
    pub vault_id: u64,
}

#[event]
pub struct Deposit {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub shares: u64,
    pub lock_duration: u64,
    pub timestamp: i64,
}

#[event]
pub struct Withdraw {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub shares: u64,
    pub withdraw_fee: u64,
}

#[event]
pub struct Lock {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub locked_amount: u64,
    pub shares: u64,
    pub lock_end_time: i64,
    pub timestamp: i64,
}

#[event]
pub struct Unlock {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct Harvest {
    pub pool: Pubkey,
    pub caller: Pubkey,
    pub amount: u64,
}

#[event]
pub struct PerformanceFeeCharged {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub fee: u64,
}

#[event]
pub struct OverdueFeeCharged {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub fee_to_treasury: u64,
    pub fee_burned: u64,
}

/// Emitted on every fee/lock parameter setter with the resulting schedule.
#[event]
pub struct FeeScheduleUpdated {
    pub pool: Pubkey,
    pub performance_fee_bps: u64,
    pub withdraw_fee_bps: u64,
    pub withdraw_fee_period: u64,
    pub overdue_fee_rate: u64,
    pub unlock_free_duration: u64,
    pub max_lock_duration: u64,
    pub duration_factor_overdue: u64,
    pub boost_weight: u64,
}

#[event]
pub struct FeeExemptionsUpdated {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub performance_fee_exempt: bool,
    pub withdraw_fee_exempt: bool,
    pub overdue_fee_exempt: bool,
}

#[event]
pub struct PoolSynced {
    pub pool: Pubkey,
    pub previous_total: u64,
    pub new_total: u64,
}

#[event]
pub struct PoolStatusChanged {
    pub pool: Pubkey,
    pub paused: bool,
}

#[event]
pub struct AdminTransferred {
    pub pool: Pubkey,
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}

#[event]
pub struct OperatorUpdated {
    pub pool: Pubkey,
    pub previous_operator: Pubkey,
    pub new_operator: Pubkey,
}

#[event]
pub struct TreasuryUpdated {
    pub pool: Pubkey,
    pub previous_treasury: Pubkey,
    pub new_treasury: Pubkey,
}

#[event]
pub struct TokensRescued {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}
