use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::{Config, NetworkEndpoint, TokenContract};
use crate::ethereum::{EthereumProvider, RetryPolicy};
use crate::types::{display_units, BalanceRow, NATIVE_DECIMALS};

/// The finished report pass: one row per configured key, one token column per
/// contract that survived filtering.
#[derive(Debug)]
pub struct Report {
    pub network: String,
    pub columns: Vec<TokenContract>,
    pub rows: Vec<BalanceRow>,
}

/// Derive the public address for a raw private-key string.
pub fn derive_address(key: &str) -> Result<Address> {
    let signer: PrivateKeySigner = key.parse()?;
    Ok(signer.address())
}

/// Run the full report pass against one endpoint. Fails only on the liveness
/// probe; every per-account problem degrades that row or cell instead.
pub async fn build_report(config: &Config, endpoint: &NetworkEndpoint) -> Result<Report> {
    let retry = RetryPolicy {
        attempts: config.options.retry_attempts,
        backoff: config.options.retry_backoff,
    };
    let provider = EthereumProvider::new(endpoint.url.clone(), retry);

    let height = provider
        .block_number()
        .await
        .with_context(|| format!("failed to reach {} at {}", endpoint.name, endpoint.url))?;
    info!(network = %endpoint.name, height, "endpoint is live");

    let columns = if config.options.show_empty_tokens {
        config.contracts.clone()
    } else {
        let active = scan_active_tokens(config, &provider).await;
        select_columns(&config.contracts, &active)
    };

    let mut rows = Vec::with_capacity(config.keys.len());
    for (index, key) in config.keys.iter().enumerate() {
        rows.push(account_row(&provider, index, key, &columns).await);
    }

    Ok(Report {
        network: endpoint.name.clone(),
        columns,
        rows,
    })
}

/// Pre-scan every account against every contract and collect the indices of
/// tokens with a nonzero balance somewhere. Read failures count as zero.
async fn scan_active_tokens(config: &Config, provider: &EthereumProvider) -> BTreeSet<usize> {
    let mut active = BTreeSet::new();
    if config.contracts.is_empty() {
        return active;
    }

    for key in &config.keys {
        let Ok(address) = derive_address(key) else {
            continue;
        };
        for (i, contract) in config.contracts.iter().enumerate() {
            if active.contains(&i) {
                continue;
            }
            if let Some(amount) = token_cell(provider, address, contract).await {
                if amount > 0.0 {
                    active.insert(i);
                }
            }
        }
    }
    active
}

/// Keep the contracts whose index is in the active set, preserving order.
fn select_columns(contracts: &[TokenContract], active: &BTreeSet<usize>) -> Vec<TokenContract> {
    contracts
        .iter()
        .enumerate()
        .filter(|(i, _)| active.contains(i))
        .map(|(_, c)| c.clone())
        .collect()
}

async fn account_row(
    provider: &EthereumProvider,
    index: usize,
    key: &str,
    columns: &[TokenContract],
) -> BalanceRow {
    let address = match derive_address(key) {
        Ok(address) => address,
        Err(err) => {
            warn!(row = index + 1, "could not derive address: {err}");
            return BalanceRow::InvalidKey { index };
        }
    };

    let native = match provider.native_balance(address).await {
        Ok(raw) => display_units(raw, NATIVE_DECIMALS).ok(),
        Err(err) => {
            warn!(%address, "native balance query failed: {err}");
            None
        }
    };

    let mut tokens = Vec::with_capacity(columns.len());
    for contract in columns {
        tokens.push(token_cell(provider, address, contract).await);
    }

    BalanceRow::Account {
        index,
        address: address.to_string(),
        native,
        tokens,
    }
}

/// One token cell; `None` when the contract address is unusable or either
/// read fails.
async fn token_cell(
    provider: &EthereumProvider,
    account: Address,
    contract: &TokenContract,
) -> Option<f64> {
    let token: Address = contract.address.parse().ok()?;
    match provider.token_balance(account, token).await {
        Ok((raw, decimals)) => display_units(raw, decimals).ok(),
        Err(err) => {
            debug!(token = %contract.name, %account, "token read failed: {err}");
            None
        }
    }
}
