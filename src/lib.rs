//! Report native and ERC-20 balances for a list of private keys against a
//! user-selected JSON-RPC endpoint.

mod config;
mod ethereum;
mod menu;
mod report;
mod table;
mod types;

pub use config::{
    load_contracts, load_keys, parse_contract_line, parse_endpoints, Config, NetworkEndpoint,
    ReportOptions, TokenContract, RPCS_ENV,
};
pub use ethereum::{EthereumProvider, RetryPolicy};
pub use menu::parse_selection;
pub use report::{build_report, derive_address, Report};
pub use table::{network_style, render};
pub use types::{display_units, BalanceRow, NATIVE_DECIMALS};
