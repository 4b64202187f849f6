use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use alloy::primitives::Address;

/// Name of the environment variable holding the endpoint list.
pub const RPCS_ENV: &str = "RPCS";

/// A named JSON-RPC endpoint. Menu order follows list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEndpoint {
    pub name: String,
    pub url: String,
}

/// An ERC-20 contract to query, from a `name:address` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenContract {
    pub name: String,
    pub address: String,
}

/// Knobs that used to be split across two copies of the original tool.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Attempts per native-balance query; 1 disables retrying.
    pub retry_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_backoff: Duration,
    /// Keep token columns even when every account balance is zero.
    pub show_empty_tokens: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            show_empty_tokens: false,
        }
    }
}

/// Immutable program configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: Vec<NetworkEndpoint>,
    pub keys: Vec<String>,
    pub contracts: Vec<TokenContract>,
    pub options: ReportOptions,
}

impl Config {
    /// Load configuration from the environment and the given files.
    ///
    /// The key file is mandatory; a missing contracts file yields an empty
    /// contract list.
    pub fn load(keys_path: &Path, contracts_path: &Path, options: ReportOptions) -> Result<Self> {
        let raw = std::env::var(RPCS_ENV)
            .with_context(|| format!("{RPCS_ENV} environment variable is not set"))?;
        let endpoints = parse_endpoints(&raw);
        if endpoints.is_empty() {
            bail!("no usable endpoints in {RPCS_ENV} (expected name1=url1,name2=url2,...)");
        }

        let keys = load_keys(keys_path)?;
        let contracts = load_contracts(contracts_path)?;

        Ok(Self {
            endpoints,
            keys,
            contracts,
            options,
        })
    }
}

/// Parse a `name1=url1,name2=url2,...` list, preserving order and trimming
/// whitespace. Entries without both a name and a url are skipped.
pub fn parse_endpoints(raw: &str) -> Vec<NetworkEndpoint> {
    raw.split(',')
        .filter_map(|entry| {
            let (name, url) = entry.split_once('=')?;
            let (name, url) = (name.trim(), url.trim());
            if name.is_empty() || url.is_empty() {
                debug!(entry, "skipping malformed endpoint entry");
                return None;
            }
            Some(NetworkEndpoint {
                name: name.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

/// A key line is kept iff, after stripping an optional `0x` prefix, it is
/// exactly 64 ASCII hex characters. The original tool's filter also admitted
/// any `0x`-prefixed string regardless of length; that was an operator
/// precedence accident, not a feature.
pub fn is_plausible_key(line: &str) -> bool {
    let hex = line.strip_prefix("0x").unwrap_or(line);
    hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Read the key file, keeping only plausible key lines.
pub fn load_keys(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read key file {}", path.display()))?;

    let mut keys = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_plausible_key(line) {
            keys.push(line.to_string());
        } else {
            debug!(line_len = line.len(), "dropping implausible key line");
        }
    }
    Ok(keys)
}

/// Parse one `name:address` contract line. Lines missing either part or with
/// an address that is not a well-formed EVM address are rejected.
pub fn parse_contract_line(line: &str) -> Option<TokenContract> {
    let (name, address) = line.split_once(':')?;
    let (name, address) = (name.trim(), address.trim());
    if name.is_empty() || address.is_empty() {
        return None;
    }
    if address.parse::<Address>().is_err() {
        return None;
    }
    Some(TokenContract {
        name: name.to_string(),
        address: address.to_string(),
    })
}

/// Read the contracts file. A missing file produces an empty list; malformed
/// lines are dropped with a debug log.
pub fn load_contracts(path: &Path) -> Result<Vec<TokenContract>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read contracts file {}", path.display()))?;

    let mut contracts = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_contract_line(line) {
            Some(contract) => contracts.push(contract),
            None => debug!(line, "dropping malformed contract line"),
        }
    }
    Ok(contracts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_endpoints_order_and_trim() {
        let endpoints = parse_endpoints("A=u1, B = u2");
        assert_eq!(
            endpoints,
            vec![
                NetworkEndpoint {
                    name: "A".to_string(),
                    url: "u1".to_string()
                },
                NetworkEndpoint {
                    name: "B".to_string(),
                    url: "u2".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_endpoints_skips_malformed_entries() {
        let endpoints = parse_endpoints("A=,=u1,junk,B=u2");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].name, "B");
    }

    #[test]
    fn test_parse_endpoints_empty_input() {
        assert!(parse_endpoints("").is_empty());
    }

    #[test]
    fn test_plausible_key_bare_hex() {
        let key = "a".repeat(64);
        assert!(is_plausible_key(&key));
        assert!(is_plausible_key(&key.to_uppercase()));
    }

    #[test]
    fn test_plausible_key_with_prefix() {
        let key = format!("0x{}", "1".repeat(64));
        assert!(is_plausible_key(&key));
    }

    #[test]
    fn test_implausible_keys_rejected() {
        // 63 chars, short 0x string, non-hex content
        assert!(!is_plausible_key(&"a".repeat(63)));
        assert!(!is_plausible_key("0xabc"));
        assert!(!is_plausible_key(&"g".repeat(64)));
        assert!(!is_plausible_key(""));
    }

    #[test]
    fn test_parse_contract_line() {
        let line = "USDC:0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238";
        let contract = parse_contract_line(line).unwrap();
        assert_eq!(contract.name, "USDC");
        assert_eq!(
            contract.address,
            "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"
        );
    }

    #[test]
    fn test_parse_contract_line_rejects_bad_input() {
        assert!(parse_contract_line("no colon here").is_none());
        assert!(parse_contract_line("USDC:not-an-address").is_none());
        assert!(parse_contract_line(":0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238").is_none());
        assert!(parse_contract_line("USDC:").is_none());
    }

    #[test]
    fn test_missing_contracts_file_is_empty_list() {
        let path = PathBuf::from("/definitely/not/here/contracts.txt");
        let contracts = load_contracts(&path).unwrap();
        assert!(contracts.is_empty());
    }

    #[test]
    fn test_missing_key_file_is_fatal() {
        let path = PathBuf::from("/definitely/not/here/pk.txt");
        assert!(load_keys(&path).is_err());
    }

    #[test]
    fn test_default_options() {
        let options = ReportOptions::default();
        assert_eq!(options.retry_attempts, 3);
        assert_eq!(options.retry_backoff, Duration::from_secs(1));
        assert!(!options.show_empty_tokens);
    }
}
