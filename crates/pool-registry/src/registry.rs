//! The pool registry: master pool list, LP token bijection and pair lookup.
//!
//! Every accessor taking a pool address returns zero values for pools that
//! are not registered. Accessors returning per-coin data always return
//! [`MAX_COINS`] slots (gauges: [`MAX_GAUGES`]) with unused slots zeroed.

use {
    crate::{
        coin_index::CoinIndex,
        error::{Error, Result},
        eth::{self, Address, MAX_COINS, MAX_GAUGES, TokenPair, U256},
        pool::{Coin, Gauge, PoolRecord},
    },
    chrono::{DateTime, Utc},
    indexmap::IndexMap,
    std::collections::HashMap,
};

#[derive(Clone, Debug, Default)]
pub struct PoolRegistry {
    /// Dense pool list; a pool's position is its ordinal.
    pools: IndexMap<Address, PoolRecord>,
    /// LP token -> pool.
    lp_tokens: HashMap<Address, Address>,
    coins: CoinIndex,
    last_updated: DateTime<Utc>,
}

/// Amplification and fee parameters of a pool as reported by
/// [`PoolRegistry::get_parameters`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PoolParameters {
    pub a: U256,
    pub future_a: U256,
    pub fee: U256,
    pub admin_fee: U256,
    pub future_fee: U256,
    pub future_admin_fee: U256,
    pub future_owner: Address,
    pub initial_a: U256,
    pub initial_a_time: u64,
    pub future_a_time: u64,
}

/// Positions of two coins within a pool's coin lists.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CoinIndices {
    pub from: usize,
    pub to: usize,
    /// Whether the positions refer to the underlying coin list.
    pub underlying: bool,
}

impl PoolRegistry {
    /// Registers `record` and indexes its coins and pairs. Returns the ordinal
    /// assigned to the pool.
    pub fn register_pool(&mut self, mut record: PoolRecord, now: DateTime<Utc>) -> Result<usize> {
        record.validate()?;
        if self.pools.contains_key(&record.address) {
            return Err(Error::DuplicatePool(record.address));
        }
        if let Some(pool) = self.lp_tokens.get(&record.lp_token) {
            return Err(Error::DuplicateLPToken {
                lp_token: record.lp_token,
                pool: *pool,
            });
        }

        self.coins
            .insert_pool(record.address, &record.distinct_coins(), &record.pairs());
        self.lp_tokens.insert(record.lp_token, record.address);
        record.registered_at = now;
        let (index, _) = self.pools.insert_full(record.address, record);
        self.last_updated = now;
        Ok(index)
    }

    /// Removes `pool` from every index. The last pool takes over the removed
    /// pool's ordinal.
    pub fn remove_pool(&mut self, pool: Address, now: DateTime<Utc>) -> Result<PoolRecord> {
        let record = self.pools.swap_remove(&pool).ok_or(Error::NotFound(pool))?;
        self.coins
            .remove_pool(pool, &record.distinct_coins(), &record.pairs());
        self.lp_tokens.remove(&record.lp_token);
        self.last_updated = now;
        Ok(record)
    }

    pub fn set_liquidity_gauges(
        &mut self,
        pool: Address,
        gauges: Vec<Gauge>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if gauges.len() > MAX_GAUGES {
            return Err(Error::TooManyGauges {
                pool,
                count: gauges.len(),
            });
        }
        self.record_mut(pool)?.gauges = gauges;
        self.last_updated = now;
        Ok(())
    }

    pub fn set_gas_estimate(&mut self, pool: Address, gas: U256, now: DateTime<Utc>) -> Result<()> {
        self.record_mut(pool)?.gas_estimate = gas;
        self.last_updated = now;
        Ok(())
    }

    pub fn set_virtual_price(
        &mut self,
        pool: Address,
        virtual_price: U256,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.record_mut(pool)?.virtual_price = virtual_price;
        self.last_updated = now;
        Ok(())
    }

    /// Replaces the balances of a pool. `underlying` must be empty for pools
    /// without an underlying coin list, `admin` may be empty to clear admin
    /// balances.
    pub fn update_balances(
        &mut self,
        pool: Address,
        balances: &[U256],
        underlying: &[U256],
        admin: &[U256],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let record = self.record_mut(pool)?;
        if balances.len() != record.coins.len() {
            return Err(record.invalid("expected one balance per coin"));
        }
        if underlying.len() != record.underlying_coins.len() {
            return Err(record.invalid("expected one balance per underlying coin"));
        }
        if !admin.is_empty() && admin.len() != record.coins.len() {
            return Err(record.invalid("expected one admin balance per coin"));
        }

        for (coin, balance) in record.coins.iter_mut().zip(balances) {
            coin.balance = *balance;
        }
        for (coin, balance) in record.underlying_coins.iter_mut().zip(underlying) {
            coin.balance = *balance;
        }
        record.admin_balances = admin.to_vec();
        self.last_updated = now;
        Ok(())
    }

    fn record_mut(&mut self, pool: Address) -> Result<&mut PoolRecord> {
        self.pools.get_mut(&pool).ok_or(Error::NotFound(pool))
    }

    pub fn pool(&self, pool: Address) -> Option<&PoolRecord> {
        self.pools.get(&pool)
    }

    pub fn pools(&self) -> impl Iterator<Item = &PoolRecord> {
        self.pools.values()
    }

    pub fn coin_index(&self) -> &CoinIndex {
        &self.coins
    }

    /// Time of the last committed mutation.
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Pool at ordinal `index`, or the zero address past the end.
    pub fn pool_list(&self, index: usize) -> Address {
        self.pools
            .get_index(index)
            .map(|(pool, _)| *pool)
            .unwrap_or_default()
    }

    /// The `index`-th pool offering a swap between `from` and `to`, in either
    /// direction. Zero if there is no such pool.
    pub fn find_pool_for_coins(&self, from: Address, to: Address, index: usize) -> Address {
        TokenPair::new(from, to)
            .and_then(|pair| self.coins.pool_for_pair(pair, index))
            .unwrap_or_default()
    }

    pub fn coin_count(&self) -> usize {
        self.coins.coin_count()
    }

    pub fn get_coin(&self, index: usize) -> Address {
        self.coins.get_coin(index)
    }

    pub fn get_coin_swap_count(&self, coin: Address) -> usize {
        self.coins.get_coin_swap_count(coin)
    }

    pub fn get_coin_swap_complement(&self, coin: Address, index: usize) -> Address {
        self.coins.get_coin_swap_complement(coin, index)
    }

    /// Positions of `from` and `to` in the pool. The direct coin list is
    /// searched first, the underlying list only if either coin is missing
    /// from it.
    pub fn get_coin_indices(&self, pool: Address, from: Address, to: Address) -> Result<CoinIndices> {
        let record = self.pools.get(&pool).ok_or(Error::NotFound(pool))?;
        if let (Some(from), Some(to)) = (record.coin_index(from), record.coin_index(to)) {
            return Ok(CoinIndices {
                from,
                to,
                underlying: false,
            });
        }
        let position = |coin| {
            record
                .underlying_index(coin)
                .ok_or(Error::CoinNotInPool { pool, coin })
        };
        Ok(CoinIndices {
            from: position(from)?,
            to: position(to)?,
            underlying: true,
        })
    }

    pub fn get_lp_token(&self, pool: Address) -> Address {
        self.pool(pool).map(|record| record.lp_token).unwrap_or_default()
    }

    pub fn get_pool_from_lp_token(&self, lp_token: Address) -> Address {
        self.lp_tokens.get(&lp_token).copied().unwrap_or_default()
    }

    /// Number of direct and underlying coins.
    pub fn get_n_coins(&self, pool: Address) -> [usize; 2] {
        self.pool(pool)
            .map(|record| [record.coins.len(), record.underlying().len()])
            .unwrap_or_default()
    }

    pub fn get_coins(&self, pool: Address) -> [Address; MAX_COINS] {
        self.pad_coins(pool, |record| record.coins.as_slice(), |coin| coin.address)
    }

    pub fn get_underlying_coins(&self, pool: Address) -> [Address; MAX_COINS] {
        self.pad_coins(pool, PoolRecord::underlying, |coin| coin.address)
    }

    pub fn get_decimals(&self, pool: Address) -> [u8; MAX_COINS] {
        self.pad_coins(pool, |record| record.coins.as_slice(), |coin| coin.decimals)
    }

    pub fn get_underlying_decimals(&self, pool: Address) -> [u8; MAX_COINS] {
        self.pad_coins(pool, PoolRecord::underlying, |coin| coin.decimals)
    }

    pub fn get_balances(&self, pool: Address) -> [U256; MAX_COINS] {
        self.pad_coins(pool, |record| record.coins.as_slice(), |coin| coin.balance)
    }

    pub fn get_underlying_balances(&self, pool: Address) -> [U256; MAX_COINS] {
        self.pad_coins(pool, PoolRecord::underlying, |coin| coin.balance)
    }

    /// Rates of the direct coins, scaled by [`eth::RATE_PRECISION`].
    pub fn get_rates(&self, pool: Address) -> [U256; MAX_COINS] {
        self.pool(pool)
            .map(|record| eth::pad((0..record.coins.len()).map(|i| record.rate(i))))
            .unwrap_or_default()
    }

    pub fn get_admin_balances(&self, pool: Address) -> [U256; MAX_COINS] {
        self.pool(pool)
            .map(|record| eth::pad(record.admin_balances.iter().copied()))
            .unwrap_or_default()
    }

    pub fn get_gauges(&self, pool: Address) -> ([Address; MAX_GAUGES], [u64; MAX_GAUGES]) {
        self.pool(pool)
            .map(|record| {
                (
                    eth::pad(record.gauges.iter().map(|gauge| gauge.address)),
                    eth::pad(record.gauges.iter().map(|gauge| gauge.kind)),
                )
            })
            .unwrap_or_default()
    }

    /// Pools registered before amplification ramps were tracked report zero
    /// for the initial A and both ramp times.
    pub fn get_parameters(&self, pool: Address) -> PoolParameters {
        let Some(record) = self.pool(pool) else {
            return PoolParameters::default();
        };
        let ramp = record.amplification.ramp.unwrap_or_default();
        PoolParameters {
            a: record.amplification.current,
            future_a: record.amplification.future,
            fee: record.fees.fee,
            admin_fee: record.fees.admin_fee,
            future_fee: record.fees.future_fee,
            future_admin_fee: record.fees.future_admin_fee,
            future_owner: record.future_owner,
            initial_a: ramp.initial,
            initial_a_time: ramp.initial_time,
            future_a_time: ramp.future_time,
        }
    }

    #[allow(non_snake_case)]
    pub fn get_A(&self, pool: Address) -> U256 {
        self.pool(pool)
            .map(|record| record.amplification.current)
            .unwrap_or_default()
    }

    /// `[fee, admin_fee]`, scaled by [`eth::FEE_DENOMINATOR`].
    pub fn get_fees(&self, pool: Address) -> [U256; 2] {
        self.pool(pool)
            .map(|record| [record.fees.fee, record.fees.admin_fee])
            .unwrap_or_default()
    }

    pub fn get_virtual_price_from_lp_token(&self, lp_token: Address) -> U256 {
        self.pool(self.get_pool_from_lp_token(lp_token))
            .map(|record| record.virtual_price)
            .unwrap_or_default()
    }

    pub fn estimate_gas_used(&self, pool: Address) -> U256 {
        self.pool(pool)
            .map(|record| record.gas_estimate)
            .unwrap_or_default()
    }

    /// Empty for unknown pools.
    pub fn get_pool_name(&self, pool: Address) -> &str {
        self.pool(pool).map_or("", |record| record.name.as_str())
    }

    pub fn get_pool_asset_type(&self, pool: Address) -> u64 {
        self.pool(pool).map_or(0, |record| record.asset_type)
    }

    pub fn is_meta(&self, pool: Address) -> bool {
        self.pool(pool).is_some_and(|record| record.is_meta)
    }

    fn pad_coins<T, C, F>(&self, pool: Address, coins: C, field: F) -> [T; MAX_COINS]
    where
        T: Copy + Default,
        C: Fn(&PoolRecord) -> &[Coin],
        F: Fn(&Coin) -> T,
    {
        self.pool(pool)
            .map(|record| eth::pad(coins(record).iter().map(&field)))
            .unwrap_or_else(|| [T::default(); MAX_COINS])
    }
}
