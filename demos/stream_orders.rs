//! Order stream example
//!
//! Logs in with a local private key, subscribes to the orders and swaps of
//! that address and prints every update for a minute.
//!
//! Run with `SWAPRATE_PRIVATE_KEY=<hex key> cargo run --example stream_orders`.

use std::sync::Arc;
use std::time::Duration;
use swaprate_rust_sdk::{
    types::{DataChannelResponse, ErrorChannelResponse, Order, Swap},
    Agent, Config, Handler, MessageSigner, Namespace, SwapRateError, WalletSigner,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let private_key = std::env::var("SWAPRATE_PRIVATE_KEY")?;
    let signer = WalletSigner::from_private_key(&private_key)?;

    let mut agent = Agent::new(Config::new(Namespace::Development)?)?;
    agent.login(&signer).await?;
    info!("✅ Logged in as {}", signer.address());

    let on_orders: Handler<DataChannelResponse<Vec<Order>>> = Arc::new(|response| {
        for order in &response.d {
            info!(
                "📨 Order {} {}: filled {}/{}",
                order.order_id, order.status, order.filled, order.nominal
            );
        }
    });
    let on_swaps: Handler<DataChannelResponse<Vec<Swap>>> = Arc::new(|response| {
        for swap in &response.d {
            info!("📨 Swap {} {:?}", swap.swap_id, swap.status);
        }
    });
    let on_error_message: Handler<ErrorChannelResponse> =
        Arc::new(|response| warn!("Server error: {}", response.message));
    let on_error: Handler<SwapRateError> = Arc::new(|e| error!("❌ Socket error: {}", e));

    agent.on_orders(&on_orders);
    agent.on_swaps(&on_swaps);
    agent.on_error_message(&on_error_message);
    agent.on_error(&on_error);

    agent.subscribe_orders(agent.access_token())?;
    agent.subscribe_swaps(agent.access_token())?;

    tokio::time::sleep(Duration::from_secs(60)).await;

    agent.unsubscribe_orders(agent.access_token())?;
    agent.unsubscribe_swaps(agent.access_token())?;
    agent.off_orders(&on_orders);
    agent.off_swaps(&on_swaps);
    agent.close_socket();

    info!("🛑 Done");
    Ok(())
}
