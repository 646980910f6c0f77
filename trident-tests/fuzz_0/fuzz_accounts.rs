use trident_fuzz::fuzzing::*;

/// Storage for all account addresses used in fuzz testing.
///
/// This struct serves as a centralized repository for account addresses,
/// enabling their reuse across different instruction flows and test scenarios.
///
/// Docs: https://ackee.xyz/trident/docs/latest/trident-api-macro/trident-types/fuzz-accounts/
#[derive(Default)]
pub struct AccountAddresses {
    pub pool: AddressStorage,

    pub position: AddressStorage,

    pub owner: AddressStorage,

    pub asset_mint: AddressStorage,

    pub owner_token_account: AddressStorage,

    pub asset_vault: AddressStorage,

    pub reward_vault: AddressStorage,

    pub treasury: AddressStorage,

    pub operator: AddressStorage,

    pub admin: AddressStorage,

    pub token_program: AddressStorage,

    pub system_program: AddressStorage,
}
