use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::BlockNumberOrTag;
use alloy::sol;
use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

// ERC-20 ABI, just the two read calls the report needs
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

/// Retry policy for the native-balance query. Token reads and the liveness
/// probe are never retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// EVM chain access over JSON-RPC.
pub struct EthereumProvider {
    rpc_url: String,
    retry: RetryPolicy,
}

impl EthereumProvider {
    pub fn new(rpc_url: String, retry: RetryPolicy) -> Self {
        Self { rpc_url, retry }
    }

    /// Liveness probe: fetch the current block height.
    pub async fn block_number(&self) -> Result<u64> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.parse()?);
        Ok(provider.get_block_number().await?)
    }

    /// Native balance with a fixed backoff between attempts.
    pub async fn native_balance(&self, address: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.parse()?);
        let attempts = self.retry.attempts.max(1);

        let mut attempt = 1;
        loop {
            match provider
                .get_balance(address)
                .block_id(BlockNumberOrTag::Latest.into())
                .await
            {
                Ok(balance) => return Ok(balance),
                Err(err) if attempt < attempts => {
                    warn!(%address, attempt, "balance query failed: {err}");
                    attempt += 1;
                    sleep(self.retry.backoff).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Raw token balance and decimals, fetched concurrently.
    pub async fn token_balance(&self, account: Address, token: Address) -> Result<(U256, u8)> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.parse()?);
        let contract = IERC20::new(token, provider);

        let balance_call = contract.balanceOf(account);
        let decimals_call = contract.decimals();
        let (balance, decimals) = tokio::try_join!(balance_call.call(), decimals_call.call())?;

        Ok((balance._0, decimals._0))
    }
}
