//! Ethereum primitives and fixed-point conventions shared by the registry.

use std::cmp::Ordering;

pub use alloy_primitives::{Address, U256, address};

/// Number of coin slots returned by every per-pool coin query.
pub const MAX_COINS: usize = 8;

/// Number of gauge slots returned by [`crate::PoolRegistry::get_gauges`].
pub const MAX_GAUGES: usize = 10;

/// Scale of coin rates, `1e18`.
pub const RATE_PRECISION: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Denominator of pool fees and admin fee shares, `1e10`.
pub const FEE_DENOMINATOR: U256 = U256::from_limbs([10_000_000_000, 0, 0, 0]);

/// Unordered pair of two distinct coins.
///
/// The lower address is always stored first so that `(a, b)` and `(b, a)`
/// resolve to the same key.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TokenPair(Address, Address);

impl TokenPair {
    /// Returns a token pair for the given coins, or `None` if `a` and `b` are
    /// equal.
    pub fn new(a: Address, b: Address) -> Option<Self> {
        match a.cmp(&b) {
            Ordering::Less => Some(Self(a, b)),
            Ordering::Equal => None,
            Ordering::Greater => Some(Self(b, a)),
        }
    }

    /// Used to determine if `coin` is among the pair.
    pub fn contains(&self, coin: &Address) -> bool {
        self.0 == *coin || self.1 == *coin
    }

    /// The first address is always the lower one.
    pub fn get(&self) -> (Address, Address) {
        (self.0, self.1)
    }
}

/// Copies `items` into a fixed-size array, filling unused slots with the
/// default (zero) value. Items past `N` are dropped.
pub fn pad<T, const N: usize>(items: impl IntoIterator<Item = T>) -> [T; N]
where
    T: Copy + Default,
{
    let mut slots = [T::default(); N];
    for (slot, item) in slots.iter_mut().zip(items) {
        *slot = item;
    }
    slots
}
