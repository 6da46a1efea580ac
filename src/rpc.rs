//! RPC transport helpers: endpoint failover and fixed-delay retry
//!
//! Each chain carries an ordered endpoint list; `with_failover` walks it,
//! advancing on any error. `retry` re-runs one operation a fixed number of
//! times with a fixed delay. Neither does backoff or jitter. Every call is
//! bounded by a fixed transport timeout.

use alloy_eips::BlockId;
use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::{Filter, Log, TransactionRequest};
use eyre::{eyre, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::chains::{Chain, HTTP_TIMEOUT_SECS};

/// Fixed delay between retry attempts
pub const RETRY_DELAY_MS: u64 = 2_000;

/// Default attempt count for `retry`
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Run `op` against each of the chain's endpoints in order until one
/// succeeds. The last error is returned if all endpoints fail.
pub async fn with_failover<T, F, Fut>(chain: Chain, op: F) -> Result<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let endpoints = chain.rpc_endpoints();
    if endpoints.is_empty() {
        return Err(eyre!("No RPC endpoints configured for {}", chain));
    }

    let mut last_err = eyre!("No RPC endpoints configured for {}", chain);
    for url in endpoints {
        match op(url.clone()).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("RPC endpoint failed on {} ({}): {}", chain, redact(&url), e);
                last_err = e;
            }
        }
    }
    Err(last_err)
}

/// Retry `op` up to `max_attempts` times with a fixed delay in between
pub async fn retry<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// One `eth_call` against a single endpoint, optionally pinned to a
/// historical block
pub async fn eth_call(
    rpc_url: &str,
    to: Address,
    calldata: Vec<u8>,
    block: Option<u64>,
) -> Result<Bytes> {
    let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
    let tx = TransactionRequest::default().to(to).input(calldata.into());

    let call = provider.call(tx);
    let call = match block {
        Some(number) => call.block(BlockId::number(number)),
        None => call,
    };

    let result = timeout(Duration::from_secs(HTTP_TIMEOUT_SECS), async move {
        call.await
    })
    .await
    .map_err(|_| eyre!("eth_call timed out after {}s", HTTP_TIMEOUT_SECS))??;
    Ok(result)
}

/// One `eth_getLogs` against a single endpoint
pub async fn get_logs(rpc_url: &str, filter: &Filter) -> Result<Vec<Log>> {
    let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);

    let logs = timeout(
        Duration::from_secs(HTTP_TIMEOUT_SECS),
        provider.get_logs(filter),
    )
    .await
    .map_err(|_| eyre!("eth_getLogs timed out after {}s", HTTP_TIMEOUT_SECS))??;
    Ok(logs)
}

/// Keep provider keys out of the logs
fn redact(url: &str) -> String {
    match url.rfind('/') {
        Some(idx) if idx + 1 < url.len() && url[idx + 1..].len() >= 16 => {
            format!("{}/…", &url[..idx])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32> = retry(3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Err(eyre!("transient"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_exhausts_and_returns_last_error() {
        let result: Result<u32> = retry(2, || async { Err(eyre!("still down")) }).await;
        assert!(result.unwrap_err().to_string().contains("still down"));
    }

    #[test]
    fn test_redact_strips_key_suffix() {
        let url = "https://rpc.ankr.com/fantom/0123456789abcdef0123456789abcdef";
        assert_eq!(redact(url), "https://rpc.ankr.com/fantom/…");
        // short path segments (no key) stay intact
        assert_eq!(redact("https://rpc.ftm.tools"), "https://rpc.ftm.tools");
    }
}
