//! On-chain reads: reserves, fee tiers, gauges, swap volume and the
//! voting/bribe stack
//!
//! Every function here goes through the chain's endpoint failover and
//! returns `Result`; callers decide whether a failure degrades the row or
//! skips a dependent metric.

pub mod reserves;
pub mod volume;
pub mod voting;

pub use reserves::{FeeSource, GaugeKind};
pub use volume::SwapEventKind;
pub use voting::BribeEventKind;
