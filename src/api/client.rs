//! API client for SwapRate REST API

use crate::{
    config::Config,
    error::{Result, SwapRateError},
    types::{account::*, constants::paths, orders::*, products::*},
};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

/// SwapRate API client
///
/// Stateless with respect to credentials: authenticated calls take the
/// bearer token as an argument, already validated by the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client
    http_client: HttpClient,
    /// Base API URL without a trailing slash
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| SwapRateError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_base(),
        })
    }

    /// Base API URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !params.is_empty() {
            url.push('?');
            for (i, (key, value)) in params.iter().enumerate() {
                if i > 0 {
                    url.push('&');
                }
                url.push_str(&format!("{}={}", key, urlencoding::encode(value)));
            }
        }
        url
    }

    fn authorize(request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        match access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and return the body of a successful response
    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            debug!("Request failed with {}: {}", status, error_text);
            Err(SwapRateError::api(status.as_u16() as i32, error_text))
        }
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        access_token: Option<&str>,
    ) -> Result<T> {
        let url = self.url(path, params);
        debug!("GET {}", url);
        let request = Self::authorize(self.http_client.get(&url), access_token);
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Make a POST request with a JSON body
    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        access_token: Option<&str>,
    ) -> Result<T> {
        let url = self.url(path, &[]);
        debug!("POST {}", url);
        let request = Self::authorize(self.http_client.post(&url).json(body), access_token);
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Make a PUT request without a body, discarding the response body
    async fn put(
        &self,
        path: &str,
        params: &[(&str, String)],
        access_token: Option<&str>,
    ) -> Result<()> {
        let url = self.url(path, params);
        debug!("PUT {}", url);
        let request = Self::authorize(self.http_client.put(&url), access_token);
        self.execute(request).await?;
        Ok(())
    }

    // === Public API ===

    /// Get network config, supported tokens and maturities
    pub async fn get_meta_config(&self) -> Result<MetaConfigResponse> {
        self.get(paths::META_CONFIG, &[], None).await
    }

    /// Get all products
    pub async fn get_products(&self) -> Result<ProductsResponse> {
        self.get(paths::PRODUCTS, &[], None).await
    }

    /// Quote a fixed rate deposit
    pub async fn get_fixed_rate_deposit_quote(
        &self,
        product_id: &str,
        maturity: u64,
        nominal: f64,
    ) -> Result<ProductQuoteResponse> {
        if product_id.is_empty() {
            return Err(SwapRateError::invalid_parameter("Product id must not be empty"));
        }

        let path = format!(
            "{}/{}/quote",
            paths::PRODUCTS,
            urlencoding::encode(product_id)
        );
        let params = [
            ("maturity", maturity.to_string()),
            ("nominal", nominal.to_string()),
        ];
        self.get(&path, &params, None).await
    }

    /// Get the typed login message and the ttl of the token it will produce
    pub async fn get_auth_login_data(&self) -> Result<AuthLoginDataResponse> {
        self.get(paths::AUTH_LOGIN_DATA, &[], None).await
    }

    // === Authenticated API ===

    /// Get ETH and token balances of the token's address
    pub async fn get_wallet_balance(&self, access_token: &str) -> Result<WalletBalanceResponse> {
        self.get(paths::WALLET_BALANCE, &[], Some(access_token)).await
    }

    /// Form an order, returning the typed message to sign
    pub async fn post_order_form(
        &self,
        order: &PostOrdersFormRequest,
        access_token: &str,
    ) -> Result<PostOrdersFormResponse> {
        self.post(paths::ORDERS_FORM, order, Some(access_token)).await
    }

    /// Place a formed order by posting its signature
    pub async fn post_order_sign(
        &self,
        signed: &PostOrdersSignRequest,
        access_token: &str,
    ) -> Result<PostOrdersSignResponse> {
        self.post(paths::ORDERS_SIGN, signed, Some(access_token)).await
    }

    /// Cancel orders by id
    pub async fn put_orders_cancel(&self, order_ids: &[String], access_token: &str) -> Result<()> {
        let params: Vec<(&str, String)> = order_ids
            .iter()
            .map(|id| ("orderIds[]", id.clone()))
            .collect();
        self.put(paths::ORDERS_CANCEL, &params, Some(access_token)).await
    }
}
