//! Meta configuration and product types

use serde::{Deserialize, Serialize};

/// Token supported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedToken {
    /// Token title (e.g. "DAI")
    pub title: String,
    /// Token contract address
    pub address: String,
    /// Token decimals
    pub decimals: u32,
}

/// Default values suggested by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDefaults {
    /// Default product id
    pub product_id: String,
}

/// Opium contract addresses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpiumContracts {
    /// Token spender contract
    #[serde(rename = "TokenSpender")]
    pub token_spender: String,
    /// Compound supply aggregator contract
    #[serde(rename = "CompoundSupplyAggregator")]
    pub compound_supply_aggregator: String,
}

/// Response of `GET /meta/config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaConfigResponse {
    /// Ethereum network id
    pub network_id: u64,
    /// Default values
    pub defaults: MetaDefaults,
    /// Supported tokens
    pub supported_tokens: Vec<SupportedToken>,
    /// Opium contract addresses
    pub opium_contracts: OpiumContracts,
    /// Supported maturities (seconds since epoch)
    pub supported_maturities: Vec<u64>,
}

/// Product type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    /// Compound-based product
    Compound,
}

/// Product subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSubtype {
    /// Supply rate product
    Supply,
    /// Borrow rate product
    Borrow,
}

/// Tradable product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    pub product_id: String,
    /// Human readable title
    pub title: String,
    /// Underlying token address
    pub token: String,
    /// Product type
    #[serde(rename = "type")]
    pub product_type: ProductType,
    /// Product subtype
    pub subtype: ProductSubtype,
    /// Margin
    pub margin: f64,
    /// Whether fixed rate deposits are supported
    pub fixed_rate_supported: bool,
}

/// Response of `GET /products`
pub type ProductsResponse = Vec<Product>;

/// Response of `GET /products/{id}/quote`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuoteResponse {
    /// Quoted fixed rate
    pub fixed_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_config_deserialize() {
        let json = serde_json::json!({
            "networkId": 42,
            "defaults": { "productId": "prod-1" },
            "supportedTokens": [{ "title": "DAI", "address": "0xdai", "decimals": 18 }],
            "opiumContracts": {
                "TokenSpender": "0xspender",
                "CompoundSupplyAggregator": "0xaggregator"
            },
            "supportedMaturities": [1600000000, 1700000000]
        });

        let meta: MetaConfigResponse = serde_json::from_value(json).unwrap();
        assert_eq!(meta.network_id, 42);
        assert_eq!(meta.defaults.product_id, "prod-1");
        assert_eq!(meta.supported_tokens[0].decimals, 18);
        assert_eq!(meta.opium_contracts.token_spender, "0xspender");
        assert_eq!(meta.supported_maturities.len(), 2);
    }

    #[test]
    fn test_product_deserialize() {
        let json = serde_json::json!({
            "productId": "prod-1",
            "title": "Compound DAI supply",
            "token": "0xdai",
            "type": "COMPOUND",
            "subtype": "SUPPLY",
            "margin": 0.1,
            "fixedRateSupported": true
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.product_type, ProductType::Compound);
        assert_eq!(product.subtype, ProductSubtype::Supply);
        assert!(product.fixed_rate_supported);
    }
}
