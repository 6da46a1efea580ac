//! farmscope - yield-farming analytics over five EVM networks
//!
//! Fetch prices, reserves, epoch swap volume, bribes and vote weights for a
//! fixed pool registry, derive TVL/APR/return metrics, and render one table
//! per pool. Read-only and stateless: nothing is persisted, nothing is
//! written on-chain.

pub mod abi;
pub mod blocks;
pub mod chains;
pub mod config;
pub mod epoch;
pub mod metrics;
pub mod onchain;
pub mod pipeline;
pub mod pools;
pub mod prices;
pub mod report;
pub mod rpc;
pub mod snapshot;
pub mod tokens;
