use fuzz_accounts::*;
use trident_fuzz::fuzzing::*;
mod fuzz_accounts;

const PRECISION_FACTOR: u128 = 1_000_000_000_000;
const MIN_DEPOSIT: u64 = 1_000;
const WEEK: u64 = 7 * 86_400;
const DURATION_FACTOR: u64 = 365 * 86_400;
const BOOST_WEIGHT: u64 = 100 * 10_000_000_000;
const USERS: usize = 3;

/// Per-position state mirrored from the ledger
#[derive(Default, Clone, Copy)]
struct PositionTracker {
    shares: u64,
    boosted_share: u64,
    locked: bool,
}

/// Pool state tracking for invariant checks
#[derive(Default, Clone)]
struct PoolTracker {
    initialized: bool,
    total_amount: u64,
    total_shares: u64,
    total_boost_debt: u64,
    positions: [PositionTracker; USERS],
}

impl PoolTracker {
    fn pool_value(&self) -> u64 {
        self.total_amount.saturating_add(self.total_boost_debt)
    }

    fn shares_for_value(&self, value: u64) -> u64 {
        if self.total_shares == 0 {
            return value;
        }
        let prior = self.pool_value() as u128;
        ((value as u128).saturating_mul(self.total_shares as u128) / prior.max(1)) as u64
    }

    fn value_for_shares(&self, shares: u64) -> u64 {
        if self.total_shares == 0 {
            return 0;
        }
        ((self.pool_value() as u128).saturating_mul(shares as u128)
            / self.total_shares as u128) as u64
    }
}

#[derive(FuzzTestMethods)]
struct FuzzTest {
    trident: Trident,
    fuzz_accounts: AccountAddresses,
    pool_tracker: PoolTracker,
}

#[flow_executor]
impl FuzzTest {
    fn new() -> Self {
        Self {
            trident: Trident::default(),
            fuzz_accounts: AccountAddresses::default(),
            pool_tracker: PoolTracker::default(),
        }
    }

    #[init]
    fn start(&mut self) {
        self.pool_tracker = PoolTracker::default();
        self.pool_tracker.initialized = true;
    }

    /// Flexible deposit: mint priced against the pool before the
    /// contribution lands
    #[flow]
    fn flow_deposit(&mut self) {
        if !self.pool_tracker.initialized {
            return;
        }

        let who = rand::random::<usize>() % USERS;
        if self.pool_tracker.positions[who].locked {
            return;
        }
        let fuzz_amount: u64 = rand::random::<u64>() % 1_000_000_000_000;
        let amount = fuzz_amount.max(MIN_DEPOSIT);

        let minted = self.pool_tracker.shares_for_value(amount);
        self.pool_tracker.total_amount = self.pool_tracker.total_amount.saturating_add(amount);
        self.pool_tracker.total_shares = self.pool_tracker.total_shares.saturating_add(minted);
        self.pool_tracker.positions[who].shares =
            self.pool_tracker.positions[who].shares.saturating_add(minted);

        self.check_conservation();
    }

    /// Locked deposit: base shares plus boost, with matching boost debt
    #[flow]
    fn flow_deposit_locked(&mut self) {
        if !self.pool_tracker.initialized {
            return;
        }

        let who = rand::random::<usize>() % USERS;
        let position = self.pool_tracker.positions[who];
        if position.locked || position.shares > 0 {
            return;
        }

        let fuzz_amount: u64 = rand::random::<u64>() % 1_000_000_000;
        let amount = fuzz_amount.max(MIN_DEPOSIT);
        let fuzz_duration: u64 = rand::random::<u64>() % DURATION_FACTOR;
        let duration = fuzz_duration.max(WEEK);

        let base = self.pool_tracker.shares_for_value(amount);
        let weight =
            (duration as u128).saturating_mul(BOOST_WEIGHT as u128) / DURATION_FACTOR as u128;
        let extra = (weight.saturating_mul(base as u128) / PRECISION_FACTOR) as u64;
        let debt = (weight.saturating_mul(amount as u128) / PRECISION_FACTOR) as u64;
        let minted = base.saturating_add(extra);

        self.pool_tracker.total_amount = self.pool_tracker.total_amount.saturating_add(amount);
        self.pool_tracker.total_shares = self.pool_tracker.total_shares.saturating_add(minted);
        self.pool_tracker.total_boost_debt =
            self.pool_tracker.total_boost_debt.saturating_add(debt);
        let position = &mut self.pool_tracker.positions[who];
        position.shares = minted;
        position.boosted_share = debt;
        position.locked = true;

        // Invariant: boost never exceeds the configured weight ceiling
        assert!(
            extra as u128
                <= (base as u128).saturating_mul(BOOST_WEIGHT as u128) / PRECISION_FACTOR + 1,
            "Invariant: boost shares exceed the weight ceiling"
        );

        self.check_conservation();
    }

    /// Yield lands in the pool: share count untouched, pool value
    /// non-decreasing
    #[flow]
    fn flow_harvest(&mut self) {
        if !self.pool_tracker.initialized {
            return;
        }

        let yield_amount: u64 = rand::random::<u64>() % 1_000_000_000;
        let shares_before = self.pool_tracker.total_shares;
        let value_before = self.pool_tracker.pool_value();

        self.pool_tracker.total_amount =
            self.pool_tracker.total_amount.saturating_add(yield_amount);

        assert_eq!(
            self.pool_tracker.total_shares, shares_before,
            "Invariant: harvest must not mint shares"
        );
        assert!(
            self.pool_tracker.pool_value() >= value_before,
            "Invariant: harvest must not shrink pool value"
        );
    }

    /// Lock expiry settlement: debt removed exactly once, value re-minted
    #[flow]
    fn flow_unlock(&mut self) {
        if !self.pool_tracker.initialized {
            return;
        }

        let who = rand::random::<usize>() % USERS;
        let position = self.pool_tracker.positions[who];
        if !position.locked {
            return;
        }

        let value = self
            .pool_tracker
            .value_for_shares(position.shares)
            .saturating_sub(position.boosted_share);
        self.pool_tracker.total_boost_debt = self
            .pool_tracker
            .total_boost_debt
            .saturating_sub(position.boosted_share);
        self.pool_tracker.total_shares = self
            .pool_tracker
            .total_shares
            .saturating_sub(position.shares);

        let reminted = self.pool_tracker.shares_for_value(value);
        self.pool_tracker.total_shares = self.pool_tracker.total_shares.saturating_add(reminted);
        let position = &mut self.pool_tracker.positions[who];
        position.shares = reminted;
        position.boosted_share = 0;
        position.locked = false;

        self.check_conservation();
    }

    /// Redeem a random slice of a flexible position
    #[flow]
    fn flow_withdraw(&mut self) {
        if !self.pool_tracker.initialized {
            return;
        }

        let who = rand::random::<usize>() % USERS;
        let position = self.pool_tracker.positions[who];
        if position.locked || position.shares == 0 {
            return;
        }

        let fuzz_shares: u64 = rand::random::<u64>() % position.shares;
        let shares = fuzz_shares.max(1);
        let payout = self.pool_tracker.value_for_shares(shares);

        assert!(
            payout <= self.pool_tracker.pool_value(),
            "Invariant: cannot redeem more than the pool holds"
        );

        self.pool_tracker.total_shares = self.pool_tracker.total_shares.saturating_sub(shares);
        self.pool_tracker.total_amount = self.pool_tracker.total_amount.saturating_sub(payout);
        self.pool_tracker.positions[who].shares =
            self.pool_tracker.positions[who].shares.saturating_sub(shares);

        self.check_conservation();
    }

    /// Mint-then-redeem must never create value (floor rounding favors the
    /// pool)
    #[flow]
    fn flow_round_trip_check(&mut self) {
        if !self.pool_tracker.initialized || self.pool_tracker.total_shares == 0 {
            return;
        }

        let test_amount: u64 = (rand::random::<u64>() % 1_000_000_000).max(1);

        let minted = self.pool_tracker.shares_for_value(test_amount);
        if minted == 0 {
            return;
        }

        let mut after = self.pool_tracker.clone();
        after.total_amount = after.total_amount.saturating_add(test_amount);
        after.total_shares = after.total_shares.saturating_add(minted);
        let back = after.value_for_shares(minted);

        assert!(back <= test_amount, "Invariant: round-trip created free value");
    }

    #[end]
    fn end(&mut self) {
        if self.pool_tracker.initialized {
            self.check_conservation();
        }
    }

    // Helper: ledger totals must equal the per-position sums
    fn check_conservation(&self) {
        let share_sum: u64 = self.pool_tracker.positions.iter().map(|p| p.shares).sum();
        let debt_sum: u64 = self
            .pool_tracker
            .positions
            .iter()
            .map(|p| p.boosted_share)
            .sum();
        assert_eq!(
            self.pool_tracker.total_shares, share_sum,
            "Invariant: total_shares != sum of position shares"
        );
        assert_eq!(
            self.pool_tracker.total_boost_debt, debt_sum,
            "Invariant: total_boost_debt != sum of boosted shares"
        );
    }
}

fn main() {
    // Run 1000 iterations with up to 100 flows per iteration
    FuzzTest::fuzz(1000, 100);
}
