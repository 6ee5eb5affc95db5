//! In-memory directory of liquidity pools and versioned contract addresses.
//!
//! The [`registry::PoolRegistry`] answers the fixed query shapes callers use
//! to discover pools, the coins they trade and their routing metadata. The
//! [`address_provider::AddressProvider`] maps small integer IDs to contract
//! addresses and keeps a mutation count per ID.
//!
//! Both are plain values. [`directory::Directory`] publishes them behind
//! copy-on-write snapshots so that readers always observe either the state
//! before or after a mutation, never a mix of the two.

pub mod address_provider;
mod cli;
pub mod coin_index;
pub mod config;
pub mod directory;
pub mod error;
pub mod eth;
mod metrics;
pub mod pool;
pub mod registry;
mod run;
pub mod shared;

pub use {
    self::{
        cli::{Args, Command},
        run::{run, start},
    },
    address_provider::AddressProvider,
    directory::Directory,
    error::{Error, Result},
    pool::PoolRecord,
    registry::PoolRegistry,
};
