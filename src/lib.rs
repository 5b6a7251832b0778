//! # SwapRate Rust SDK
//!
//! A Rust SDK for the SwapRate fixed rate swap API.
//!
//! ## Features
//!
//! - **REST API**: meta config, products, quotes, wallet balance and order placement
//! - **Access Tokens**: stateless expiring credentials checked before any network call
//! - **EIP-712 Signing**: login and order messages signed with a local wallet
//! - **Typed Streams**: swaps, orders, positions and chart ticks over one Socket.IO connection
//! - **Agent Architecture**: unified interface combining API, socket and token handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use swaprate_rust_sdk::{Agent, Config, Handler, Namespace, WalletSigner};
//! use swaprate_rust_sdk::types::{DataChannelResponse, Order};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut agent = Agent::new(Config::new(Namespace::Development)?)?;
//!
//!     // Public data
//!     let products = agent.get_products().await?;
//!     println!("Products: {}", products.len());
//!
//!     // Log in with a local key and stream orders
//!     let signer = WalletSigner::from_private_key("your_private_key")?;
//!     agent.login(&signer).await?;
//!
//!     let on_orders: Handler<DataChannelResponse<Vec<Order>>> =
//!         Arc::new(|response| println!("Orders: {}", response.d.len()));
//!     agent.on_orders(&on_orders);
//!     agent.subscribe_orders(agent.access_token())?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod agent;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod types;
pub mod websocket;

// Re-exports for convenience
pub use agent::Agent;
pub use api::ApiClient;
pub use auth::{AccessToken, MessageSigner, MockMessageSigner, WalletSigner};
pub use config::{Config, Namespace};
pub use error::{Result, SwapRateError};
pub use websocket::{Channel, ChannelKind, Handler, SocketClient};
