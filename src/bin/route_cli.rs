//! Route CLI
//!
//! One-shot route lookup against a freshly-built `Core`. Useful for smoke
//! testing adapters and registry wiring without standing up a long-running
//! service.
//!
//! Usage:
//!   cargo run --bin route-cli -- \
//!     --from-chain 1 --from-token native \
//!     --to-chain 137 --to-token native \
//!     --amount 1000000000000000000
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use swap_router_core::adapters::{jupiter::JupiterAdapter, lifi::LifiAdapter, relay::RelayAdapter};
use swap_router_core::adapters::RouterAdapter;
use swap_router_core::config::load_config;
use swap_router_core::graph::MultiChainGraph;
use swap_router_core::registry::{ChainRegistryBuilder, DEFAULT_CHAINS};
use swap_router_core::types::{AmountRaw, CanonicalChainId, ChainAddress, RouteRequest, SlippagePolicy, TokenRef};
use swap_router_core::Core;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "route-cli", about = "Look up a single swap route and print it as JSON")]
struct Args {
    /// Source chain's canonical id (e.g. 1 for Ethereum)
    #[arg(long)]
    from_chain: u32,

    /// Source token address, or "native" for the chain's native currency
    #[arg(long)]
    from_token: String,

    /// Destination chain's canonical id
    #[arg(long)]
    to_chain: u32,

    /// Destination token address, or "native"
    #[arg(long)]
    to_token: String,

    /// Amount in, in the source token's smallest unit
    #[arg(long)]
    amount: String,

    /// Max acceptable slippage in bps (default: 50 = 0.5%)
    #[arg(long, default_value = "50")]
    slippage_bps: u16,

    /// Route lookup deadline in milliseconds
    #[arg(long, default_value = "2000")]
    deadline_ms: u64,
}

fn parse_token(chain: CanonicalChainId, raw: &str) -> Result<TokenRef> {
    if raw.eq_ignore_ascii_case("native") {
        return Ok(TokenRef::native(chain));
    }
    if let Ok(addr) = raw.parse() {
        return Ok(TokenRef::new(chain, ChainAddress::Evm(addr)));
    }
    Ok(TokenRef::new(chain, ChainAddress::Text(raw.to_string())))
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let config_path = std::env::var("ROUTER_CONFIG").unwrap_or_else(|_| "router.toml".to_string());
    let config = load_config(&config_path)?;

    let mut registry_builder = ChainRegistryBuilder::new();
    for chain in DEFAULT_CHAINS.iter() {
        registry_builder = registry_builder.add_chain(chain.clone());
    }
    let registry = Arc::new(registry_builder.build()?);
    let graphs = Arc::new(MultiChainGraph::new());

    let adapters: Vec<Arc<dyn RouterAdapter>> = vec![
        Arc::new(LifiAdapter::new()),
        Arc::new(JupiterAdapter::new()),
        Arc::new(RelayAdapter::new()),
    ];
    let core = Core::new(registry, graphs, config, adapters);

    let from_chain = CanonicalChainId(args.from_chain);
    let to_chain = CanonicalChainId(args.to_chain);
    let from = parse_token(from_chain, &args.from_token)?;
    let to = parse_token(to_chain, &args.to_token)?;
    let amount_in = AmountRaw::new(args.amount.parse().context("invalid --amount")?);

    let request = RouteRequest {
        from,
        to,
        amount_in,
        slippage: SlippagePolicy::Auto { max_bps: args.slippage_bps },
        deadline: Duration::from_millis(args.deadline_ms),
        recipient: None,
    };

    let response = core.get_route(request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
