pub const POOL_SEED: &[u8] = b"pool";
pub const POSITION_SEED: &[u8] = b"position";
pub const ASSET_VAULT_SEED: &[u8] = b"assets";
pub const REWARD_VAULT_SEED: &[u8] = b"rewards";

const DAY: u64 = 86_400;
const HOUR: u64 = 3_600;

/// Scale for boost weights, the overdue fee rate and share pricing.
pub const PRECISION_FACTOR: u128 = 1_000_000_000_000;

/// Scale for the withdraw share fraction. Keeps every intermediate product
/// within u128 for u64 share counts.
pub const SHARE_PRECISION: u128 = 1_000_000_000_000;

pub const BPS_DENOMINATOR: u64 = 10_000;

pub const MIN_DEPOSIT_AMOUNT: u64 = 1_000;
pub const MIN_WITHDRAW_AMOUNT: u64 = 1_000;

pub const MIN_LOCK_DURATION: u64 = 7 * DAY;
pub const MAX_LOCK_DURATION_LIMIT: u64 = 1_000 * DAY;
pub const DEFAULT_MAX_LOCK_DURATION: u64 = 365 * DAY;

/// Lock duration at which the boost weight reaches `boost_weight` exactly.
pub const DURATION_FACTOR: u64 = 365 * DAY;
pub const DEFAULT_DURATION_FACTOR_OVERDUE: u64 = 180 * DAY;

pub const DEFAULT_UNLOCK_FREE_DURATION: u64 = 7 * DAY;
pub const MAX_UNLOCK_FREE_DURATION: u64 = 14 * DAY;

/// 100e10 = PRECISION_FACTOR: a full-duration lock doubles base shares.
pub const DEFAULT_BOOST_WEIGHT: u64 = 100 * 10_000_000_000;
pub const BOOST_WEIGHT_LIMIT: u64 = 5_000 * 10_000_000_000;

pub const DEFAULT_PERFORMANCE_FEE_BPS: u64 = 200;
pub const MAX_PERFORMANCE_FEE_BPS: u64 = 2_000;

pub const DEFAULT_WITHDRAW_FEE_BPS: u64 = 10;
pub const MAX_WITHDRAW_FEE_BPS: u64 = 500;

pub const DEFAULT_WITHDRAW_FEE_PERIOD: u64 = 72 * HOUR;
/// Must never exceed MIN_LOCK_DURATION, so value released from an expired
/// lock is always outside the withdraw fee window.
pub const MAX_WITHDRAW_FEE_PERIOD: u64 = MIN_LOCK_DURATION;

pub const DEFAULT_OVERDUE_FEE_RATE: u64 = 100 * 10_000_000_000;
pub const MAX_OVERDUE_FEE_RATE: u64 = 100 * 10_000_000_000;
