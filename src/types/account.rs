//! Account and authentication types

use ethers::types::transaction::eip712::TypedData;
use serde::{Deserialize, Serialize};

/// EIP-712 typed message as served by the API for signing
pub type Eip712Message = TypedData;

/// Token entry of a wallet balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceToken {
    /// Token title
    pub title: String,
    /// Token contract address
    pub address: String,
    /// Token decimals
    pub decimals: u32,
    /// Total balance (base units)
    pub total: String,
    /// Allowance granted to the token spender (base units)
    pub allowance: String,
    /// Allowance granted to the compound supply aggregator (base units)
    pub compound_supply_allowance: String,
}

/// Response of `GET /wallet/balance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalanceResponse {
    /// ETH balance (wei)
    pub eth: String,
    /// Token balances
    pub tokens: Vec<BalanceToken>,
}

/// Response of `GET /auth/loginData`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthLoginDataResponse {
    /// Expiry of the access token formed from this login data
    pub ttl: i64,
    /// Typed message to sign
    pub data: Eip712Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_data_deserialize() {
        let json = serde_json::json!({
            "ttl": 13371488,
            "data": {
                "types": {
                    "EIP712Domain": [
                        { "name": "name", "type": "string" },
                        { "name": "version", "type": "string" }
                    ],
                    "Login": [{ "name": "message", "type": "string" }]
                },
                "domain": { "name": "SwapRate", "version": "1" },
                "primaryType": "Login",
                "message": { "message": "Login to SwapRate! Token valid till: 13371488" }
            }
        });

        let login: AuthLoginDataResponse = serde_json::from_value(json).unwrap();
        assert_eq!(login.ttl, 13371488);
        assert_eq!(login.data.primary_type, "Login");
        assert_eq!(login.data.domain.name.as_deref(), Some("SwapRate"));
    }

    #[test]
    fn test_wallet_balance_deserialize() {
        let json = serde_json::json!({
            "eth": "1000000000000000000",
            "tokens": [{
                "title": "DAI",
                "address": "0xdai",
                "decimals": 18,
                "total": "5",
                "allowance": "0",
                "compoundSupplyAllowance": "7"
            }]
        });

        let balance: WalletBalanceResponse = serde_json::from_value(json).unwrap();
        assert_eq!(balance.tokens[0].compound_supply_allowance, "7");
    }
}
