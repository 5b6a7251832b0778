//! Main Agent for SwapRate SDK
//!
//! Provides a unified interface for all SwapRate operations: REST requests,
//! access token handling and push channel subscriptions.

use crate::{
    api::ApiClient,
    auth::{now_secs, require, AccessToken, MessageSigner},
    config::Config,
    error::{Result, SwapRateError},
    types::{account::*, orders::*, products::*, websocket::*},
    websocket::{
        channel::{ErrorMessage, Orders, Positions, ProductChart, Swaps},
        Handler, SocketClient,
    },
};
use tracing::info;

/// Main Agent for SwapRate operations
///
/// This is the primary interface for interacting with SwapRate, combining
/// the API client, the subscription client and an optional stored access
/// token in a single struct.
#[derive(Debug, Clone)]
pub struct Agent {
    /// API client for REST operations
    api: ApiClient,
    /// Subscription client for push channels
    socket: SocketClient,
    /// Access token used when the caller passes `agent.access_token()`
    access_token: Option<String>,
    /// Configuration
    config: Config,
}

impl Agent {
    /// Create a new Agent and open its socket connection
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use swaprate_rust_sdk::{Agent, Config, Namespace};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let agent = Agent::new(Config::new(Namespace::Development)?)?;
    ///     let products = agent.get_products().await?;
    ///     println!("Products: {}", products.len());
    ///     Ok(())
    /// }
    /// ```
    #[cfg(feature = "websocket")]
    pub fn new(config: Config) -> Result<Self> {
        let ws_config = crate::websocket::WsConfig::from_config(&config)?;
        let socket = SocketClient::connect(ws_config)?;
        Self::with_socket(config, socket)
    }

    /// Create an Agent over an existing subscription client
    pub fn with_socket(config: Config, socket: SocketClient) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        info!("✅ Agent ready for {} ({})", config.api_base(), config.namespace);

        Ok(Self {
            api,
            socket,
            access_token: None,
            config,
        })
    }

    // === Access token ===

    /// Store the access token used by default for authenticated operations
    pub fn set_access_token(&mut self, access_token: impl Into<String>) {
        self.access_token = Some(access_token.into());
    }

    /// Stored access token
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Forget the stored access token
    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    /// Check a token at the current time, returning it unchanged when live
    pub fn valid_access_token<'a>(&self, access_token: Option<&'a str>) -> Result<&'a str> {
        require(access_token, now_secs())
    }

    /// Fetch login data, sign it and store the resulting access token
    pub async fn login(&mut self, signer: &dyn MessageSigner) -> Result<String> {
        let login = self.api.get_auth_login_data().await?;
        let address = signer.address();
        let signature = signer.sign_message(&login.data).await?;

        let token = AccessToken::new(login.ttl, address.as_str(), signature).encode()?;
        self.access_token = Some(token.clone());

        info!("🔑 Logged in as {}, token valid till {}", address, login.ttl);
        Ok(token)
    }

    // === Public REST API ===

    /// Get network config, supported tokens and maturities
    pub async fn get_meta_config(&self) -> Result<MetaConfigResponse> {
        self.api.get_meta_config().await
    }

    /// Get all products
    pub async fn get_products(&self) -> Result<ProductsResponse> {
        self.api.get_products().await
    }

    /// Quote a fixed rate deposit
    pub async fn get_fixed_rate_deposit_quote(
        &self,
        product_id: &str,
        maturity: u64,
        nominal: f64,
    ) -> Result<ProductQuoteResponse> {
        self.api
            .get_fixed_rate_deposit_quote(product_id, maturity, nominal)
            .await
    }

    /// Get login data to sign
    pub async fn get_auth_login_data(&self) -> Result<AuthLoginDataResponse> {
        self.api.get_auth_login_data().await
    }

    // === Authenticated REST API ===

    /// Get wallet balances of the token's address
    pub async fn get_wallet_balance(
        &self,
        access_token: Option<&str>,
    ) -> Result<WalletBalanceResponse> {
        let access_token = self.valid_access_token(access_token)?;
        self.api.get_wallet_balance(access_token).await
    }

    /// Form an order
    pub async fn post_order_form(
        &self,
        order: &PostOrdersFormRequest,
        access_token: Option<&str>,
    ) -> Result<PostOrdersFormResponse> {
        let access_token = self.valid_access_token(access_token)?;
        self.api.post_order_form(order, access_token).await
    }

    /// Post the signature of a formed order
    pub async fn post_order_sign(
        &self,
        signed: &PostOrdersSignRequest,
        access_token: Option<&str>,
    ) -> Result<PostOrdersSignResponse> {
        let access_token = self.valid_access_token(access_token)?;
        self.api.post_order_sign(signed, access_token).await
    }

    /// Cancel orders by id
    pub async fn put_orders_cancel(
        &self,
        order_ids: &[String],
        access_token: Option<&str>,
    ) -> Result<()> {
        let access_token = self.valid_access_token(access_token)?;
        if order_ids.is_empty() {
            return Err(SwapRateError::invalid_parameter("No order ids to cancel"));
        }
        self.api.put_orders_cancel(order_ids, access_token).await
    }

    /// Form an order, sign the returned message and place it
    pub async fn sign_and_post_order(
        &self,
        order: &PostOrdersFormRequest,
        signer: &dyn MessageSigner,
        access_token: Option<&str>,
    ) -> Result<PostOrdersSignResponse> {
        let access_token = self.valid_access_token(access_token)?;

        let formed = self.api.post_order_form(order, access_token).await?;
        let signature = signer.sign_message(&formed.order_to_sign).await?;
        let placed = self
            .api
            .post_order_sign(
                &PostOrdersSignRequest {
                    formed_order_id: formed.formed_order_id,
                    signature,
                },
                access_token,
            )
            .await?;

        info!("✅ Order placed: {}", placed.order_id);
        Ok(placed)
    }

    // === Push channels ===

    fn protected_params(&self, access_token: Option<&str>) -> Result<ProtectedSubscriptionParams> {
        let access_token = self.valid_access_token(access_token)?;
        Ok(ProtectedSubscriptionParams {
            access_token: access_token.to_string(),
        })
    }

    fn chart_params(product_id: &str) -> IdSubscriptionParams {
        IdSubscriptionParams {
            id: product_id.to_string(),
        }
    }

    /// Subscribe to swaps of the token's address
    pub fn subscribe_swaps(&self, access_token: Option<&str>) -> Result<()> {
        self.socket
            .subscribe::<Swaps>(&self.protected_params(access_token)?)
    }

    /// Unsubscribe from swaps
    pub fn unsubscribe_swaps(&self, access_token: Option<&str>) -> Result<()> {
        self.socket
            .unsubscribe::<Swaps>(&self.protected_params(access_token)?)
    }

    /// Register a swaps handler
    pub fn on_swaps(&self, handler: &Handler<DataChannelResponse<Vec<Swap>>>) {
        self.socket.on::<Swaps>(handler);
    }

    /// Remove a swaps handler
    pub fn off_swaps(&self, handler: &Handler<DataChannelResponse<Vec<Swap>>>) {
        self.socket.off::<Swaps>(handler);
    }

    /// Subscribe to orders of the token's address
    pub fn subscribe_orders(&self, access_token: Option<&str>) -> Result<()> {
        self.socket
            .subscribe::<Orders>(&self.protected_params(access_token)?)
    }

    /// Unsubscribe from orders
    pub fn unsubscribe_orders(&self, access_token: Option<&str>) -> Result<()> {
        self.socket
            .unsubscribe::<Orders>(&self.protected_params(access_token)?)
    }

    /// Register an orders handler
    pub fn on_orders(&self, handler: &Handler<DataChannelResponse<Vec<Order>>>) {
        self.socket.on::<Orders>(handler);
    }

    /// Remove an orders handler
    pub fn off_orders(&self, handler: &Handler<DataChannelResponse<Vec<Order>>>) {
        self.socket.off::<Orders>(handler);
    }

    /// Subscribe to positions of the token's address
    pub fn subscribe_positions(&self, access_token: Option<&str>) -> Result<()> {
        self.socket
            .subscribe::<Positions>(&self.protected_params(access_token)?)
    }

    /// Unsubscribe from positions
    pub fn unsubscribe_positions(&self, access_token: Option<&str>) -> Result<()> {
        self.socket
            .unsubscribe::<Positions>(&self.protected_params(access_token)?)
    }

    /// Register a positions handler
    pub fn on_positions(&self, handler: &Handler<DataChannelResponse<Vec<Position>>>) {
        self.socket.on::<Positions>(handler);
    }

    /// Remove a positions handler
    pub fn off_positions(&self, handler: &Handler<DataChannelResponse<Vec<Position>>>) {
        self.socket.off::<Positions>(handler);
    }

    /// Subscribe to rate chart ticks of a product
    pub fn subscribe_charts(&self, product_id: &str) -> Result<()> {
        self.socket
            .subscribe::<ProductChart>(&Self::chart_params(product_id))
    }

    /// Unsubscribe from rate chart ticks of a product
    pub fn unsubscribe_charts(&self, product_id: &str) -> Result<()> {
        self.socket
            .unsubscribe::<ProductChart>(&Self::chart_params(product_id))
    }

    /// Register a charts handler
    pub fn on_charts(&self, handler: &Handler<DataChannelResponse<Charts>>) {
        self.socket.on::<ProductChart>(handler);
    }

    /// Remove a charts handler
    pub fn off_charts(&self, handler: &Handler<DataChannelResponse<Charts>>) {
        self.socket.off::<ProductChart>(handler);
    }

    /// Register a handler for server-pushed business errors
    pub fn on_error_message(&self, handler: &Handler<ErrorChannelResponse>) {
        self.socket.on::<ErrorMessage>(handler);
    }

    /// Remove a business error handler
    pub fn off_error_message(&self, handler: &Handler<ErrorChannelResponse>) {
        self.socket.off::<ErrorMessage>(handler);
    }

    /// Register a transport error handler
    pub fn on_error(&self, handler: &Handler<SwapRateError>) {
        self.socket.on_error(handler);
    }

    /// Remove a transport error handler
    pub fn off_error(&self, handler: &Handler<SwapRateError>) {
        self.socket.off_error(handler);
    }

    /// Close the socket connection. Calling it again has no effect.
    pub fn close_socket(&self) {
        self.socket.close();
    }

    // === Accessors ===

    /// Subscription client
    pub fn socket(&self) -> &SocketClient {
        &self.socket
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
