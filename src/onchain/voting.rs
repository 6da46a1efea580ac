//! The voting stack: bribes, vote weights and veNFT balances
//!
//! Vote weights are read with historical calls pinned ten blocks before the
//! epoch-end block, so the snapshot sits safely behind any reorg at the
//! boundary. Bribe totals come from an event scan over the same epoch range,
//! filtered down to the configured reward token.

use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types::Filter;
use alloy_sol_types::{SolCall, SolEvent};
use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use tracing::debug;

use crate::abi::pool::{IVoter, IVotingEscrow};
use crate::abi::solidly::{DepositBribe, NotifyReward, RewardAdded};
use crate::blocks::BlockRange;
use crate::chains::Chain;
use crate::epoch::EpochWindow;
use crate::metrics::to_units;
use crate::rpc;

/// Blocks held back from the epoch boundary when snapshotting vote weights
pub const CONFIRMATION_BUFFER_BLOCKS: u64 = 10;

/// Which event shape the bribe contract emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BribeEventKind {
    /// `DepositBribe(token indexed, briber indexed, amount)`
    DepositBribe,
    /// `NotifyReward(from indexed, reward indexed, epoch, amount)`
    NotifyReward,
    /// `RewardAdded(rewardToken indexed, reward, startTimestamp)`
    RewardAdded,
}

fn parse_addr(raw: &str) -> Result<Address> {
    raw.parse()
        .map_err(|e| eyre!("Bad address {}: {}", raw, e))
}

/// Block at which vote weights are snapshotted for a resolved epoch range
pub fn vote_snapshot_block(range: &BlockRange) -> u64 {
    range.to_block().saturating_sub(CONFIRMATION_BUFFER_BLOCKS)
}

/// Total bribes deposited for the pool over the epoch, in bribe-token units
pub async fn epoch_bribes(
    chain: Chain,
    bribe_contract: &str,
    kind: BribeEventKind,
    bribe_token: &str,
    range: &BlockRange,
) -> Result<f64> {
    let contract = parse_addr(bribe_contract)?;
    let token = parse_addr(bribe_token)?;
    let token_topic: B256 = token.into_word();

    let filter = match kind {
        BribeEventKind::DepositBribe => Filter::new()
            .address(contract)
            .event_signature(DepositBribe::SIGNATURE_HASH)
            .topic1(token_topic),
        BribeEventKind::NotifyReward => Filter::new()
            .address(contract)
            .event_signature(NotifyReward::SIGNATURE_HASH)
            .topic2(token_topic),
        BribeEventKind::RewardAdded => Filter::new()
            .address(contract)
            .event_signature(RewardAdded::SIGNATURE_HASH)
            .topic1(token_topic),
    };
    let filter = filter
        .from_block(range.from_block())
        .to_block(range.to_block());

    let logs = rpc::with_failover(chain, |url| {
        let filter = filter.clone();
        async move { rpc::get_logs(&url, &filter).await }
    })
    .await?;

    let mut total = 0.0;
    for log in &logs {
        let amount = match kind {
            BribeEventKind::DepositBribe => DepositBribe::decode_log_data(&log.inner.data)
                .map_err(|e| eyre!("DepositBribe decode failed: {}", e))?
                .amount,
            BribeEventKind::NotifyReward => NotifyReward::decode_log_data(&log.inner.data)
                .map_err(|e| eyre!("NotifyReward decode failed: {}", e))?
                .amount,
            BribeEventKind::RewardAdded => RewardAdded::decode_log_data(&log.inner.data)
                .map_err(|e| eyre!("RewardAdded decode failed: {}", e))?
                .reward,
        };
        total += to_units(amount, 18);
    }

    debug!(
        "🎁 {} bribe events over {} → {:.4} tokens",
        logs.len(),
        range,
        total
    );
    Ok(total)
}

/// Votes this NFT cast on the pool, snapshotted at `block`
pub async fn nft_votes(
    chain: Chain,
    voter: &str,
    nft_id: u64,
    pool_vote_address: &str,
    block: u64,
) -> Result<f64> {
    let voter = parse_addr(voter)?;
    let pool = parse_addr(pool_vote_address)?;

    let data = rpc::with_failover(chain, |url| {
        let calldata = IVoter::votesCall {
            tokenId: U256::from(nft_id),
            pool,
        }
        .abi_encode();
        async move { rpc::eth_call(&url, voter, calldata, Some(block)).await }
    })
    .await?;

    let raw = IVoter::votesCall::abi_decode_returns(&data)
        .map_err(|e| eyre!("votes decode failed: {}", e))?;
    Ok(to_units(raw, 18))
}

/// All votes cast on the pool, snapshotted at `block`
pub async fn total_pool_votes(
    chain: Chain,
    voter: &str,
    pool_vote_address: &str,
    block: u64,
) -> Result<f64> {
    let voter = parse_addr(voter)?;
    let pool = parse_addr(pool_vote_address)?;

    let data = rpc::with_failover(chain, |url| {
        let calldata = IVoter::weightsCall { pool }.abi_encode();
        async move { rpc::eth_call(&url, voter, calldata, Some(block)).await }
    })
    .await?;

    let raw = IVoter::weightsCall::abi_decode_returns(&data)
        .map_err(|e| eyre!("weights decode failed: {}", e))?;
    Ok(to_units(raw, 18))
}

/// Locked balance behind the NFT, human units
pub async fn venft_balance(chain: Chain, escrow: &str, nft_id: u64) -> Result<f64> {
    let escrow = parse_addr(escrow)?;

    let data = rpc::with_failover(chain, |url| {
        let calldata = IVotingEscrow::balanceOfNFTCall {
            tokenId: U256::from(nft_id),
        }
        .abi_encode();
        async move { rpc::eth_call(&url, escrow, calldata, None).await }
    })
    .await?;

    let raw = IVotingEscrow::balanceOfNFTCall::abi_decode_returns(&data)
        .map_err(|e| eyre!("balanceOfNFT decode failed: {}", e))?;
    Ok(to_units(raw, 18))
}

/// Epoch bounds as the voter contract reports them for `probe`. Preferred
/// over date arithmetic when the pool has a voter; the caller falls back to
/// `EpochWindow::completed` if this errors.
pub async fn voter_epoch_window(
    chain: Chain,
    voter: &str,
    probe: DateTime<Utc>,
) -> Result<EpochWindow> {
    let voter = parse_addr(voter)?;
    let probe_ts = U256::from(probe.timestamp().max(0) as u64);

    let start_data = rpc::with_failover(chain, |url| {
        let calldata = IVoter::epochVoteStartCall {
            timestamp: probe_ts,
        }
        .abi_encode();
        async move { rpc::eth_call(&url, voter, calldata, None).await }
    })
    .await?;
    let start = IVoter::epochVoteStartCall::abi_decode_returns(&start_data)
        .map_err(|e| eyre!("epochVoteStart decode failed: {}", e))?;

    let end_data = rpc::with_failover(chain, |url| {
        let calldata = IVoter::epochVoteEndCall {
            timestamp: probe_ts,
        }
        .abi_encode();
        async move { rpc::eth_call(&url, voter, calldata, None).await }
    })
    .await?;
    let end = IVoter::epochVoteEndCall::abi_decode_returns(&end_data)
        .map_err(|e| eyre!("epochVoteEnd decode failed: {}", e))?;

    EpochWindow::from_timestamps(start.to::<u64>() as i64, end.to::<u64>() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_block_sits_behind_the_boundary() {
        let range = BlockRange::new(1_000, 2_000).unwrap();
        assert_eq!(vote_snapshot_block(&range), 1_990);
    }

    #[test]
    fn test_snapshot_block_saturates_near_genesis() {
        let range = BlockRange::new(0, 5).unwrap();
        assert_eq!(vote_snapshot_block(&range), 0);
    }
}
