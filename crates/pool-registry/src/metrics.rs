use {
    crate::registry::PoolRegistry,
    prometheus::{IntCounterVec, IntGauge},
};

#[derive(prometheus_metric_storage::MetricStorage)]
#[metric(subsystem = "pool_registry")]
pub(crate) struct Metrics {
    /// Number of registered pools.
    pools: IntGauge,

    /// Number of distinct coins traded by registered pools.
    coins: IntGauge,

    /// Directory mutations by operation and result.
    #[metric(labels("operation", "result"))]
    mutations: IntCounterVec,
}

impl Metrics {
    pub(crate) fn get() -> &'static Self {
        Metrics::instance(observe::metrics::get_storage_registry()).unwrap()
    }

    pub(crate) fn mutation<T, E>(&self, operation: &str, result: &Result<T, E>) {
        let label = if result.is_ok() { "ok" } else { "rejected" };
        self.mutations.with_label_values(&[operation, label]).inc();
    }

    pub(crate) fn registry_size(&self, registry: &PoolRegistry) {
        self.pools
            .set(i64::try_from(registry.pool_count()).unwrap_or(i64::MAX));
        self.coins
            .set(i64::try_from(registry.coin_count()).unwrap_or(i64::MAX));
    }
}
