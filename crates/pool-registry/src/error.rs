use {crate::eth::Address, thiserror::Error};

/// Failures of registry and address provider mutations.
///
/// Lookups never produce these: a missing result is reported as a zero
/// value instead.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("pool {0} is already registered")]
    DuplicatePool(Address),
    #[error("LP token {lp_token} is already bound to pool {pool}")]
    DuplicateLPToken { lp_token: Address, pool: Address },
    #[error("pool {0} is not registered")]
    NotFound(Address),
    #[error("coin {coin} is not traded in pool {pool}")]
    CoinNotInPool { pool: Address, coin: Address },
    #[error("pool {pool} lists {count} coins, at most 8 are supported")]
    TooManyCoins { pool: Address, count: usize },
    #[error("pool {pool} lists {count} gauges, at most 10 are supported")]
    TooManyGauges { pool: Address, count: usize },
    #[error("invalid pool {pool}: {reason}")]
    InvalidPool { pool: Address, reason: String },
    #[error("address id {0} is not active")]
    InactiveId(u64),
    #[error("no address id left after {0}")]
    IdSpaceExhausted(u64),
    #[error("the zero address cannot be registered")]
    ZeroAddress,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
