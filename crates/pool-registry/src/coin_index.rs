//! Deduplicated index of every coin traded by a registered pool.
//!
//! Coins are kept in a dense ordinal space `[0, coin_count)`. When the last
//! pool referencing a coin goes away the coin with the highest ordinal moves
//! into the vacated slot, so ordinals are positions, not identities.
//!
//! For every coin the index also keeps the coins it can be swapped against
//! and, per partner, the pools offering that swap. Both lists keep insertion
//! order and only shift when an entry is removed from that same list.
//!
//! The index holds pool addresses only. It is owned and kept consistent by
//! [`crate::PoolRegistry`].

use {
    crate::eth::{Address, TokenPair},
    indexmap::{IndexMap, IndexSet},
};

#[derive(Clone, Debug, Default)]
pub struct CoinIndex {
    coins: IndexMap<Address, CoinEntry>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct CoinEntry {
    /// Pools listing this coin in any of their coin lists.
    pools: IndexSet<Address>,
    /// Swap partners and the pools providing each swap.
    swaps: IndexMap<Address, IndexSet<Address>>,
}

impl CoinIndex {
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Coin at ordinal `index`, or the zero address past the end.
    pub fn get_coin(&self, index: usize) -> Address {
        self.coins
            .get_index(index)
            .map(|(coin, _)| *coin)
            .unwrap_or_default()
    }

    pub fn index_of(&self, coin: Address) -> Option<usize> {
        self.coins.get_index_of(&coin)
    }

    pub fn contains(&self, coin: Address) -> bool {
        self.coins.contains_key(&coin)
    }

    /// Number of distinct coins `coin` can be swapped against.
    pub fn get_coin_swap_count(&self, coin: Address) -> usize {
        self.coins.get(&coin).map_or(0, |entry| entry.swaps.len())
    }

    /// The `index`-th coin `coin` can be swapped against, or the zero address
    /// if there is none.
    pub fn get_coin_swap_complement(&self, coin: Address, index: usize) -> Address {
        self.coins
            .get(&coin)
            .and_then(|entry| entry.swaps.get_index(index))
            .map(|(partner, _)| *partner)
            .unwrap_or_default()
    }

    /// Pools offering a swap between the two coins of `pair`, in
    /// registration order.
    pub fn pools_for_pair(&self, pair: TokenPair) -> impl Iterator<Item = Address> + '_ {
        self.pair_pools(pair).into_iter().flatten().copied()
    }

    /// The `index`-th pool offering a swap for `pair`.
    pub fn pool_for_pair(&self, pair: TokenPair, index: usize) -> Option<Address> {
        self.pair_pools(pair)?.get_index(index).copied()
    }

    /// Number of pools offering a swap for `pair`.
    pub fn pair_pool_count(&self, pair: TokenPair) -> usize {
        self.pair_pools(pair).map_or(0, IndexSet::len)
    }

    fn pair_pools(&self, pair: TokenPair) -> Option<&IndexSet<Address>> {
        let (a, b) = pair.get();
        self.coins.get(&a)?.swaps.get(&b)
    }

    /// Records `pool` as referencing `coins` and as a provider of every pair
    /// in `pairs`.
    pub(crate) fn insert_pool(
        &mut self,
        pool: Address,
        coins: &IndexSet<Address>,
        pairs: &IndexSet<TokenPair>,
    ) {
        for coin in coins {
            self.coins.entry(*coin).or_default().pools.insert(pool);
        }
        for pair in pairs {
            let (a, b) = pair.get();
            for (coin, partner) in [(a, b), (b, a)] {
                self.coins
                    .entry(coin)
                    .or_default()
                    .swaps
                    .entry(partner)
                    .or_default()
                    .insert(pool);
            }
        }
    }

    /// Reverts [`Self::insert_pool`] for the same arguments. Partners are
    /// pruned once no pool offers the swap anymore, coins once no pool
    /// references them.
    pub(crate) fn remove_pool(
        &mut self,
        pool: Address,
        coins: &IndexSet<Address>,
        pairs: &IndexSet<TokenPair>,
    ) {
        for pair in pairs {
            let (a, b) = pair.get();
            for (coin, partner) in [(a, b), (b, a)] {
                let Some(entry) = self.coins.get_mut(&coin) else {
                    continue;
                };
                let Some(pools) = entry.swaps.get_mut(&partner) else {
                    continue;
                };
                pools.shift_remove(&pool);
                if pools.is_empty() {
                    entry.swaps.shift_remove(&partner);
                }
            }
        }
        for coin in coins {
            let Some(entry) = self.coins.get_mut(coin) else {
                continue;
            };
            entry.pools.shift_remove(&pool);
            if entry.pools.is_empty() {
                debug_assert!(entry.swaps.is_empty());
                self.coins.swap_remove(coin);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, indexmap::indexset};

    fn coin(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn pool(byte: u8) -> Address {
        Address::repeat_byte(0xf0 | byte)
    }

    fn pairs(coins: &[u8]) -> (IndexSet<Address>, IndexSet<TokenPair>) {
        let addresses: IndexSet<_> = coins.iter().copied().map(coin).collect();
        let mut pairs = IndexSet::new();
        for (i, a) in addresses.iter().enumerate() {
            for b in addresses.iter().skip(i + 1) {
                pairs.insert(TokenPair::new(*a, *b).unwrap());
            }
        }
        (addresses, pairs)
    }

    fn insert(index: &mut CoinIndex, pool: Address, coins: &[u8]) {
        let (coins, pairs) = pairs(coins);
        index.insert_pool(pool, &coins, &pairs);
    }

    fn remove(index: &mut CoinIndex, pool: Address, coins: &[u8]) {
        let (coins, pairs) = pairs(coins);
        index.remove_pool(pool, &coins, &pairs);
    }

    #[test]
    fn deduplicates_coins_across_pools() {
        let mut index = CoinIndex::default();
        insert(&mut index, pool(1), &[1, 2]);
        insert(&mut index, pool(2), &[2, 3]);

        assert_eq!(index.coin_count(), 3);
        assert_eq!(index.get_coin(0), coin(1));
        assert_eq!(index.get_coin(1), coin(2));
        assert_eq!(index.get_coin(2), coin(3));
        assert_eq!(index.get_coin(3), Address::ZERO);

        assert_eq!(index.get_coin_swap_count(coin(2)), 2);
        assert_eq!(index.get_coin_swap_complement(coin(2), 0), coin(1));
        assert_eq!(index.get_coin_swap_complement(coin(2), 1), coin(3));
        assert_eq!(index.get_coin_swap_complement(coin(2), 2), Address::ZERO);
        assert_eq!(index.get_coin_swap_count(coin(9)), 0);
    }

    #[test]
    fn pair_keeps_registration_order() {
        let mut index = CoinIndex::default();
        insert(&mut index, pool(1), &[1, 2]);
        insert(&mut index, pool(2), &[2, 1, 3]);
        insert(&mut index, pool(3), &[1, 2]);

        let pair = TokenPair::new(coin(1), coin(2)).unwrap();
        assert_eq!(
            index.pools_for_pair(pair).collect::<Vec<_>>(),
            vec![pool(1), pool(2), pool(3)]
        );

        remove(&mut index, pool(1), &[1, 2]);
        assert_eq!(
            index.pools_for_pair(pair).collect::<Vec<_>>(),
            vec![pool(2), pool(3)]
        );
        assert_eq!(index.pool_for_pair(pair, 1), Some(pool(3)));
        assert_eq!(index.pool_for_pair(pair, 2), None);
        assert_eq!(index.pair_pool_count(pair), 2);
    }

    #[test]
    fn prunes_partner_only_when_last_provider_leaves() {
        let mut index = CoinIndex::default();
        insert(&mut index, pool(1), &[1, 2]);
        insert(&mut index, pool(2), &[1, 2]);

        remove(&mut index, pool(1), &[1, 2]);
        assert_eq!(index.get_coin_swap_count(coin(1)), 1);
        assert_eq!(index.coin_count(), 2);

        remove(&mut index, pool(2), &[1, 2]);
        assert_eq!(index.get_coin_swap_count(coin(1)), 0);
        assert_eq!(index.coin_count(), 0);
        assert_eq!(
            index.pool_for_pair(TokenPair::new(coin(1), coin(2)).unwrap(), 0),
            None
        );
    }

    #[test]
    fn compacts_ordinals_by_moving_the_last_coin() {
        let mut index = CoinIndex::default();
        insert(&mut index, pool(1), &[1, 2]);
        insert(&mut index, pool(2), &[3, 4]);

        remove(&mut index, pool(1), &[1, 2]);

        assert_eq!(index.coin_count(), 2);
        assert_eq!(index.index_of(coin(4)), Some(0));
        assert_eq!(index.index_of(coin(3)), Some(1));
        assert!(!index.contains(coin(1)));
    }

    #[test]
    fn unrelated_removal_keeps_partner_order() {
        let mut index = CoinIndex::default();
        insert(&mut index, pool(1), &[1, 2]);
        insert(&mut index, pool(2), &[1, 3]);
        insert(&mut index, pool(3), &[1, 4]);
        insert(&mut index, pool(4), &[5, 6]);

        remove(&mut index, pool(4), &[5, 6]);

        assert_eq!(
            (0..3)
                .map(|i| index.get_coin_swap_complement(coin(1), i))
                .collect::<IndexSet<_>>(),
            indexset![coin(2), coin(3), coin(4)]
        );
    }

    #[test]
    fn single_coin_pool_is_listed_without_partners() {
        let mut index = CoinIndex::default();
        insert(&mut index, pool(1), &[7]);

        assert_eq!(index.coin_count(), 1);
        assert_eq!(index.get_coin_swap_count(coin(7)), 0);

        remove(&mut index, pool(1), &[7]);
        assert_eq!(index.coin_count(), 0);
    }
}
