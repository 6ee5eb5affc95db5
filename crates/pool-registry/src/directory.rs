//! Thread-safe entry point combining the pool registry and address provider.

use {
    crate::{
        address_provider::AddressProvider,
        error::Result,
        eth::{Address, U256},
        metrics::Metrics,
        pool::{Gauge, PoolRecord},
        registry::PoolRegistry,
        shared::Shared,
    },
    chrono::{DateTime, Utc},
    std::sync::Arc,
};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Publishes a [`PoolRegistry`] and an [`AddressProvider`] to concurrent
/// readers.
///
/// Every mutation is applied atomically and stamped with the directory's
/// clock. Queries go through [`Directory::pools`] and
/// [`Directory::addresses`], which return snapshots that stay unchanged while
/// they are held.
pub struct Directory {
    pools: Shared<PoolRegistry>,
    addresses: Shared<AddressProvider>,
    clock: Clock,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new(PoolRegistry::default(), AddressProvider::default())
    }
}

impl Directory {
    pub fn new(pools: PoolRegistry, addresses: AddressProvider) -> Self {
        Metrics::get().registry_size(&pools);
        Self {
            pools: Shared::new(pools),
            addresses: Shared::new(addresses),
            clock: Box::new(Utc::now),
        }
    }

    /// Replaces the wall clock used to timestamp mutations.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn pools(&self) -> Arc<PoolRegistry> {
        self.pools.snapshot()
    }

    pub fn addresses(&self) -> Arc<AddressProvider> {
        self.addresses.snapshot()
    }

    pub fn register_pool(&self, record: PoolRecord) -> Result<usize> {
        let pool = record.address;
        let index = self.mutate_pools("register_pool", |registry, now| {
            registry.register_pool(record, now)
        })?;
        tracing::debug!(?pool, index, "registered pool");
        Ok(index)
    }

    pub fn remove_pool(&self, pool: Address) -> Result<PoolRecord> {
        let record = self.mutate_pools("remove_pool", |registry, now| {
            registry.remove_pool(pool, now)
        })?;
        tracing::debug!(?pool, lp_token = ?record.lp_token, "removed pool");
        Ok(record)
    }

    pub fn set_liquidity_gauges(&self, pool: Address, gauges: Vec<Gauge>) -> Result<()> {
        let count = gauges.len();
        self.mutate_pools("set_liquidity_gauges", |registry, now| {
            registry.set_liquidity_gauges(pool, gauges, now)
        })?;
        tracing::debug!(?pool, count, "updated gauges");
        Ok(())
    }

    pub fn set_gas_estimate(&self, pool: Address, gas: U256) -> Result<()> {
        self.mutate_pools("set_gas_estimate", |registry, now| {
            registry.set_gas_estimate(pool, gas, now)
        })?;
        tracing::debug!(?pool, %gas, "updated gas estimate");
        Ok(())
    }

    pub fn set_virtual_price(&self, pool: Address, virtual_price: U256) -> Result<()> {
        self.mutate_pools("set_virtual_price", |registry, now| {
            registry.set_virtual_price(pool, virtual_price, now)
        })?;
        tracing::debug!(?pool, %virtual_price, "updated virtual price");
        Ok(())
    }

    pub fn update_balances(
        &self,
        pool: Address,
        balances: &[U256],
        underlying: &[U256],
        admin: &[U256],
    ) -> Result<()> {
        self.mutate_pools("update_balances", |registry, now| {
            registry.update_balances(pool, balances, underlying, admin, now)
        })?;
        tracing::debug!(?pool, "updated balances");
        Ok(())
    }

    pub fn set_address(&self, id: u64, addr: Address, description: &str) -> Result<u64> {
        let version = self.mutate(&self.addresses, "set_address", |provider, now| {
            provider.set_address(id, addr, description, now)
        })?;
        tracing::debug!(id, ?addr, version, "set address");
        Ok(version)
    }

    pub fn unset_address(&self, id: u64) -> Result<u64> {
        let version = self.mutate(&self.addresses, "unset_address", |provider, now| {
            provider.unset_address(id, now)
        })?;
        tracing::debug!(id, version, "unset address");
        Ok(version)
    }

    pub fn add_new_id(&self, addr: Address, description: &str) -> Result<u64> {
        let id = self.mutate(&self.addresses, "add_new_id", |provider, now| {
            provider.add_new_id(addr, description, now)
        })?;
        tracing::debug!(id, ?addr, "added address id");
        Ok(id)
    }

    fn mutate_pools<R>(
        &self,
        operation: &'static str,
        mutation: impl FnOnce(&mut PoolRegistry, DateTime<Utc>) -> Result<R>,
    ) -> Result<R> {
        // Set while holding the writer lock.
        self.mutate(&self.pools, operation, |registry, now| {
            let result = mutation(registry, now)?;
            Metrics::get().registry_size(registry);
            Ok(result)
        })
    }

    fn mutate<T: Clone, R>(
        &self,
        shared: &Shared<T>,
        operation: &'static str,
        mutation: impl FnOnce(&mut T, DateTime<Utc>) -> Result<R>,
    ) -> Result<R> {
        let now = (self.clock)();
        let result = shared.update(|state| mutation(state, now));
        Metrics::get().mutation(operation, &result);
        if let Err(err) = &result {
            tracing::warn!(operation, ?err, "rejected directory mutation");
        }
        result
    }
}
