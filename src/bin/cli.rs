use anyhow::{bail, Result};
use clap::Parser;
use console::style;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use wallet_monitor::{build_report, network_style, parse_selection, render, Config, ReportOptions};

#[derive(Parser, Debug)]
#[command(name = "wallet-monitor")]
#[command(about = "Report native and ERC-20 balances for a list of accounts", long_about = None)]
struct Args {
    /// File with one private key per line
    #[arg(long, default_value = "pk.txt")]
    keys: PathBuf,

    /// Optional file with one `name:address` token descriptor per line
    #[arg(long, default_value = "contracts.txt")]
    contracts: PathBuf,

    /// Attempts per native-balance query (1 disables retrying)
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Keep token columns even when every account balance is zero
    #[arg(long)]
    all_tokens: bool,

    /// Log retry attempts and dropped config lines
    #[arg(short, long)]
    verbose: bool,
}

fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        })
        .init();

    dotenvy::dotenv().ok();

    let options = ReportOptions {
        retry_attempts: args.retries.max(1),
        retry_backoff: Duration::from_secs(1),
        show_empty_tokens: args.all_tokens,
    };
    let config = Config::load(&args.keys, &args.contracts, options)?;

    println!("{}", style("[ EVM Wallet Monitor ]").magenta().bold());
    println!();
    println!("{}", style("Select a network:").yellow());
    for (i, endpoint) in config.endpoints.iter().enumerate() {
        println!("{}. {}", i + 1, network_style(i).apply_to(&endpoint.name));
    }

    let answer = prompt("\nNetwork number: ")?;
    let Some(index) = parse_selection(&answer, config.endpoints.len()) else {
        bail!("invalid selection: {answer:?}");
    };
    let endpoint = &config.endpoints[index];
    let accent = network_style(index);

    println!(
        "\nQuerying {} ({} keys, {} tokens)...\n",
        accent.apply_to(&endpoint.name),
        config.keys.len(),
        config.contracts.len()
    );

    let report = build_report(&config, endpoint).await?;
    print!("{}", render(&report, &accent));

    Ok(())
}
