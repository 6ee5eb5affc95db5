//! Static and queryable metadata of a single registered pool.

use {
    crate::{
        error::{Error, Result},
        eth::{Address, MAX_COINS, MAX_GAUGES, RATE_PRECISION, TokenPair, U256},
    },
    chrono::{DateTime, Utc},
    indexmap::IndexSet,
    itertools::Itertools,
};

/// A coin held by a pool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Coin {
    pub address: Address,
    /// Decimals of the coin. Underlying coins that are only priced through a
    /// rate oracle, without a decimal-bearing wrapper, report 0.
    pub decimals: u8,
    /// Balance in the coin's smallest unit.
    pub balance: U256,
}

impl Coin {
    pub fn new(address: Address, decimals: u8) -> Self {
        Self {
            address,
            decimals,
            balance: U256::ZERO,
        }
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }
}

/// Amplification coefficient of a stable swap pool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Amplification {
    pub current: U256,
    pub future: U256,
    /// `None` for pools registered before ramps were tracked.
    pub ramp: Option<Ramp>,
}

/// An amplification ramp from `initial` towards [`Amplification::future`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Ramp {
    pub initial: U256,
    /// Unix timestamp in seconds.
    pub initial_time: u64,
    /// Unix timestamp in seconds.
    pub future_time: u64,
}

/// Fee parameters, scaled by [`crate::eth::FEE_DENOMINATOR`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Fees {
    pub fee: U256,
    pub admin_fee: U256,
    pub future_fee: U256,
    pub future_admin_fee: U256,
}

/// Incentive gauge attached to a pool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Gauge {
    pub address: Address,
    pub kind: u64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolRecord {
    pub address: Address,
    pub lp_token: Address,
    pub name: String,
    pub asset_type: u64,
    pub is_meta: bool,
    pub coins: Vec<Coin>,
    /// Empty when the pool does not wrap its coins, in which case the
    /// underlying coins are the direct ones.
    pub underlying_coins: Vec<Coin>,
    /// Per direct coin, scaled by [`RATE_PRECISION`]. Empty means every rate
    /// is `1e18`.
    pub rates: Vec<U256>,
    pub amplification: Amplification,
    pub fees: Fees,
    pub owner: Address,
    pub future_owner: Address,
    pub gauges: Vec<Gauge>,
    /// Per direct coin. Empty means no admin fees were accrued.
    pub admin_balances: Vec<U256>,
    pub virtual_price: U256,
    pub gas_estimate: U256,
    /// Set by the registry when the pool gets registered.
    pub registered_at: DateTime<Utc>,
}

impl PoolRecord {
    pub fn new(address: Address, lp_token: Address, coins: Vec<Coin>) -> Self {
        Self {
            address,
            lp_token,
            coins,
            ..Default::default()
        }
    }

    /// The coins swaps ultimately settle in.
    pub fn underlying(&self) -> &[Coin] {
        if self.underlying_coins.is_empty() {
            &self.coins
        } else {
            &self.underlying_coins
        }
    }

    pub fn rate(&self, index: usize) -> U256 {
        match self.rates.get(index) {
            Some(rate) => *rate,
            None if self.rates.is_empty() && index < self.coins.len() => RATE_PRECISION,
            None => U256::ZERO,
        }
    }

    /// Position of `coin` in the direct coin list.
    pub fn coin_index(&self, coin: Address) -> Option<usize> {
        self.coins.iter().position(|c| c.address == coin)
    }

    /// Position of `coin` in the underlying coin list.
    pub fn underlying_index(&self, coin: Address) -> Option<usize> {
        self.underlying().iter().position(|c| c.address == coin)
    }

    /// Every distinct coin in either list, direct coins first.
    pub fn distinct_coins(&self) -> IndexSet<Address> {
        self.coins
            .iter()
            .chain(&self.underlying_coins)
            .map(|coin| coin.address)
            .collect()
    }

    /// Every pair swappable in this pool, within the direct list or within
    /// the underlying list.
    pub fn pairs(&self) -> IndexSet<TokenPair> {
        [&self.coins, &self.underlying_coins]
            .into_iter()
            .flat_map(|coins| {
                coins
                    .iter()
                    .tuple_combinations()
                    .filter_map(|(a, b)| TokenPair::new(a.address, b.address))
            })
            .collect()
    }

    /// Checks the record against the capacity of the query arrays and the
    /// structural invariants the indices rely on.
    pub fn validate(&self) -> Result<()> {
        if self.address.is_zero() || self.lp_token.is_zero() {
            return Err(Error::ZeroAddress);
        }
        if self.coins.is_empty() {
            return Err(self.invalid("pool has no coins"));
        }
        for coins in [&self.coins, &self.underlying_coins] {
            if coins.len() > MAX_COINS {
                return Err(Error::TooManyCoins {
                    pool: self.address,
                    count: coins.len(),
                });
            }
            if coins.iter().any(|coin| coin.address.is_zero()) {
                return Err(self.invalid("coin list contains the zero address"));
            }
            if !coins.iter().map(|coin| coin.address).all_unique() {
                return Err(self.invalid("coin list contains duplicates"));
            }
        }
        if self.gauges.len() > MAX_GAUGES {
            return Err(Error::TooManyGauges {
                pool: self.address,
                count: self.gauges.len(),
            });
        }
        if !self.rates.is_empty() && self.rates.len() != self.coins.len() {
            return Err(self.invalid("expected one rate per coin"));
        }
        if !self.admin_balances.is_empty() && self.admin_balances.len() != self.coins.len() {
            return Err(self.invalid("expected one admin balance per coin"));
        }
        Ok(())
    }

    pub(crate) fn invalid(&self, reason: &str) -> Error {
        Error::InvalidPool {
            pool: self.address,
            reason: reason.to_string(),
        }
    }
}
