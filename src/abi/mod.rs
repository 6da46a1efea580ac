//! Contract interfaces and event definitions
//!
//! Split by AMM flavor so the two `Swap` event shapes can coexist: classic
//! Solidly-style pairs emit unsigned in/out legs, concentrated-liquidity
//! pools emit one signed amount per token.

pub mod concentrated;
pub mod pool;
pub mod solidly;
