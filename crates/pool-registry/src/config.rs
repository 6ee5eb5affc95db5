//! TOML seed file describing the pools and addresses a directory starts with.
//!
//! ```toml
//! [[pool]]
//! address = "0xbEbc44782C7dB0a1A60Cb6fe97d0b483032FF1C7"
//! lp-token = "0x6c3F90f043a72FA612cbac8115EE7e52BDe6E490"
//! name = "3pool"
//! coins = [
//!     { address = "0x6B175474E89094C44Da98b954EedeAC495271d0F", decimals = 18 },
//!     { address = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", decimals = 6 },
//! ]
//! a = "2000"
//! fee = "1000000"
//! admin-fee = "5000000000"
//!
//! [[address]]
//! id = 0
//! address = "0x90E00ACe148ca3b23Ac1bC8C240C2a7Dd9c2d7f5"
//! description = "Main Registry"
//! ```
//!
//! Integers that may exceed 64 bits (balances, rates, fees, A) are written as
//! decimal or `0x`-prefixed hex strings.

use {
    crate::{
        address_provider::AddressProvider,
        directory::Directory,
        eth::{Address, U256},
        pool::{Amplification, Coin, Fees, Gauge, PoolRecord, Ramp},
        registry::PoolRegistry,
    },
    anyhow::{Context, Result},
    chrono::Utc,
    serde::Deserialize,
    serde_with::{DisplayFromStr, serde_as},
    std::path::Path,
    tokio::fs,
    tracing::instrument,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default, rename = "pool")]
    pub pools: Vec<PoolConfig>,
    #[serde(default, rename = "address")]
    pub addresses: Vec<AddressConfig>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PoolConfig {
    pub address: Address,
    pub lp_token: Address,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub asset_type: u64,
    #[serde(default)]
    pub is_meta: bool,
    pub coins: Vec<CoinConfig>,
    #[serde(default)]
    pub underlying_coins: Vec<CoinConfig>,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[serde(default)]
    pub rates: Vec<U256>,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub a: U256,
    /// Defaults to `a`.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub future_a: Option<U256>,
    pub ramp: Option<RampConfig>,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub fee: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub admin_fee: U256,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub future_fee: Option<U256>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub future_admin_fee: Option<U256>,
    #[serde(default)]
    pub owner: Address,
    pub future_owner: Option<Address>,
    #[serde(default)]
    pub gauges: Vec<GaugeConfig>,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[serde(default)]
    pub admin_balances: Vec<U256>,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub virtual_price: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub gas_estimate: U256,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CoinConfig {
    pub address: Address,
    #[serde(default)]
    pub decimals: u8,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub balance: U256,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RampConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub initial_a: U256,
    pub initial_a_time: u64,
    pub future_a_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GaugeConfig {
    pub address: Address,
    #[serde(default)]
    pub kind: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AddressConfig {
    pub id: u64,
    pub address: Address,
    #[serde(default)]
    pub description: String,
    /// Inactive entries are written and then unset, preserving their history.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Load the seed configuration from a TOML file.
pub async fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    load_str(&data).with_context(|| format!("invalid configuration in {path:?}"))
}

/// Load the seed configuration from a TOML string.
pub fn load_str(data: &str) -> Result<Config> {
    toml::de::from_str(data).context("TOML syntax error")
}

impl Config {
    /// Builds the registry and address provider described by this
    /// configuration. Fails on the first pool or address the registry
    /// rejects.
    #[instrument(skip_all)]
    pub fn into_directory(self) -> Result<Directory> {
        let now = Utc::now();

        let mut registry = PoolRegistry::default();
        for pool in self.pools {
            let address = pool.address;
            registry
                .register_pool(pool.into(), now)
                .with_context(|| format!("cannot register pool {address}"))?;
        }

        let mut provider = AddressProvider::default();
        for entry in self.addresses {
            provider
                .set_address(entry.id, entry.address, entry.description, now)
                .with_context(|| format!("cannot set address id {}", entry.id))?;
            if !entry.active {
                provider
                    .unset_address(entry.id, now)
                    .with_context(|| format!("cannot set address id {}", entry.id))?;
            }
        }

        tracing::info!(
            pools = registry.pool_count(),
            coins = registry.coin_count(),
            addresses = provider.len(),
            "loaded directory"
        );
        Ok(Directory::new(registry, provider))
    }
}

impl From<PoolConfig> for PoolRecord {
    fn from(config: PoolConfig) -> Self {
        let coins = |coins: Vec<CoinConfig>| -> Vec<Coin> {
            coins
                .into_iter()
                .map(|coin| Coin::new(coin.address, coin.decimals).with_balance(coin.balance))
                .collect()
        };
        Self {
            address: config.address,
            lp_token: config.lp_token,
            name: config.name,
            asset_type: config.asset_type,
            is_meta: config.is_meta,
            coins: coins(config.coins),
            underlying_coins: coins(config.underlying_coins),
            rates: config.rates,
            amplification: Amplification {
                current: config.a,
                future: config.future_a.unwrap_or(config.a),
                ramp: config.ramp.map(|ramp| Ramp {
                    initial: ramp.initial_a,
                    initial_time: ramp.initial_a_time,
                    future_time: ramp.future_a_time,
                }),
            },
            fees: Fees {
                fee: config.fee,
                admin_fee: config.admin_fee,
                future_fee: config.future_fee.unwrap_or(config.fee),
                future_admin_fee: config.future_admin_fee.unwrap_or(config.admin_fee),
            },
            owner: config.owner,
            future_owner: config.future_owner.unwrap_or(config.owner),
            gauges: config
                .gauges
                .into_iter()
                .map(|gauge| Gauge {
                    address: gauge.address,
                    kind: gauge.kind,
                })
                .collect(),
            admin_balances: config.admin_balances,
            virtual_price: config.virtual_price,
            gas_estimate: config.gas_estimate,
            registered_at: Default::default(),
        }
    }
}
