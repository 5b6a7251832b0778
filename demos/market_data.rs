//! Market data example
//!
//! This example fetches public data over REST only:
//! - Meta configuration
//! - Products
//! - A fixed rate deposit quote for the default product

use swaprate_rust_sdk::{ApiClient, Config, Namespace};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("🚀 Starting SwapRate market data example");

    let namespace: Namespace = std::env::var("SWAPRATE_NAMESPACE")
        .unwrap_or_else(|_| "development".to_string())
        .parse()?;
    let api = ApiClient::new(&Config::new(namespace)?)?;

    let meta = api.get_meta_config().await?;
    info!(
        "✅ Network {} with {} tokens",
        meta.network_id,
        meta.supported_tokens.len()
    );

    let products = api.get_products().await?;
    for product in &products {
        info!(
            "  - {} ({}): {:?}/{:?}, fixed rate deposits: {}",
            product.title,
            product.product_id,
            product.product_type,
            product.subtype,
            product.fixed_rate_supported
        );
    }

    let Some(maturity) = meta.supported_maturities.first().copied() else {
        info!("No maturities available");
        return Ok(());
    };

    match api
        .get_fixed_rate_deposit_quote(&meta.defaults.product_id, maturity, 1000.0)
        .await
    {
        Ok(quote) => info!("📈 Fixed rate for 1000 until {}: {}", maturity, quote.fixed_rate),
        Err(e) => error!("❌ Failed to get quote: {}", e),
    }

    Ok(())
}
