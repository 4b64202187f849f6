use alloy::primitives::{utils::format_units, U256};
use anyhow::Result;
use serde::Serialize;

/// Decimals of the chain's base currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// One table row, built during the report pass and discarded after printing.
#[derive(Debug, Clone, Serialize)]
pub enum BalanceRow {
    /// A key that produced a usable address. `native` is `None` when the
    /// balance query failed after all attempts; a `None` token cell means
    /// that token read failed.
    Account {
        index: usize,
        address: String,
        native: Option<f64>,
        tokens: Vec<Option<f64>>,
    },
    /// A key the signer refused.
    InvalidKey { index: usize },
}

/// Convert a raw integer amount to a human-readable value.
pub fn display_units(value: U256, decimals: u8) -> Result<f64> {
    let formatted = format_units(value, decimals)?;
    Ok(formatted.parse::<f64>()?)
}
