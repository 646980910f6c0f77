use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Nothing to deposit or withdraw")]
    ZeroAmount,

    #[msg("Pool is paused")]
    PoolPaused,

    #[msg("Arithmetic overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Insufficient shares balance")]
    InsufficientShares,

    #[msg("Insufficient assets in pool")]
    InsufficientAssets,

    #[msg("Unauthorized - caller is not pool admin")]
    Unauthorized,

    #[msg("Unauthorized - caller is neither position owner nor operator")]
    UnauthorizedOperator,

    #[msg("Deposit amount below minimum threshold")]
    DepositTooSmall,

    #[msg("Withdraw amount below minimum threshold")]
    WithdrawTooSmall,

    #[msg("Total lock duration below minimum")]
    LockDurationTooShort,

    #[msg("Total lock duration above maximum")]
    LockDurationTooLong,

    #[msg("Position is still locked")]
    StillLocked,

    #[msg("Position is not locked")]
    NotLocked,

    #[msg("Lock has not expired yet")]
    LockNotExpired,

    #[msg("Parameter exceeds its fixed ceiling")]
    ParameterTooHigh,

    #[msg("Cannot rescue the principal token")]
    CannotRescuePrincipal,

    #[msg("Address cannot be the default pubkey")]
    ZeroAddress,
}
