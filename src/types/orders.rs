//! Order, swap and position types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Leg rate kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayReceiveType {
    /// Fixed rate leg
    Fixed,
    /// Floating rate leg
    Floating,
}

/// Order aggregation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateType {
    /// Plain swap
    None,
    /// Fixed rate deposit through compound
    FixedRateCompound,
}

/// Swap settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    /// Waiting for settlement
    Pending,
    /// Settled on chain
    Processed,
    /// Rejected
    Rejected,
}

/// Position kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionType {
    /// Loan
    #[serde(rename = "L")]
    Loan,
    /// Deposit
    #[serde(rename = "D")]
    Deposit,
}

/// Leg of an order request; `rate` is `null` for floating legs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLegRequest {
    /// Leg kind
    #[serde(rename = "type")]
    pub leg_type: PayReceiveType,
    /// Requested rate
    pub rate: Option<f64>,
}

impl OrderLegRequest {
    /// Fixed leg at `rate`
    pub fn fixed(rate: f64) -> Self {
        Self {
            leg_type: PayReceiveType::Fixed,
            rate: Some(rate),
        }
    }

    /// Floating leg
    pub fn floating() -> Self {
        Self {
            leg_type: PayReceiveType::Floating,
            rate: None,
        }
    }
}

/// Body of `POST /orders/form`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOrdersFormRequest {
    /// Product id
    pub product_id: String,
    /// Pay leg
    pub pay: OrderLegRequest,
    /// Receive leg
    pub receive: OrderLegRequest,
    /// Notional
    pub nominal: f64,
    /// Maturity (seconds since epoch)
    pub maturity: u64,
    /// Whether the order may be partially filled
    pub partial_fill: bool,
    /// Aggregation mode
    pub aggregate: AggregateType,
}

/// Response of `POST /orders/form`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOrdersFormResponse {
    /// Id of the formed order, used when posting the signature
    pub formed_order_id: String,
    /// Typed order to sign
    pub order_to_sign: crate::types::account::Eip712Message,
}

/// Body of `POST /orders/sign`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOrdersSignRequest {
    /// Id returned by `POST /orders/form`
    pub formed_order_id: String,
    /// Signature of `order_to_sign`
    pub signature: String,
}

/// Response of `POST /orders/sign`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOrdersSignResponse {
    /// Id of the placed order
    pub order_id: String,
}

/// Leg of a pushed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLeg {
    /// Leg kind
    #[serde(rename = "type")]
    pub leg_type: PayReceiveType,
    /// Rate
    pub rate: f64,
    /// Human readable description
    pub description: String,
}

/// Leg of a swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapLeg {
    /// Leg kind
    #[serde(rename = "type")]
    pub leg_type: PayReceiveType,
    /// Rate
    pub rate: f64,
    /// Human readable description
    pub description: String,
    /// Accumulated interest
    pub acc_interest: f64,
}

/// Fixed rate deposit details of a swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedRateDeposit {
    /// Deposited amount
    pub deposit_amount: f64,
}

/// Swap pushed on the swaps channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    /// Swap id
    pub swap_id: String,
    /// Creation time
    pub created_at: i64,
    /// Pay leg
    pub pay: SwapLeg,
    /// Receive leg
    pub receive: SwapLeg,
    /// Notional
    pub nominal: f64,
    /// Token address
    pub token: String,
    /// Maturity
    pub maturity: u64,
    /// Settlement status
    pub status: SwapStatus,
    /// Settlement transaction hash
    pub tx_hash: String,
    /// Fixed rate deposit details
    pub fixed_rate: Option<FixedRateDeposit>,
}

/// Order pushed on the orders channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub order_id: String,
    /// Creation time
    pub created_at: i64,
    /// Product id
    pub product_id: String,
    /// Pay leg
    pub pay: OrderLeg,
    /// Receive leg
    pub receive: OrderLeg,
    /// Token address
    pub token: String,
    /// Order status as reported by the server
    pub status: String,
    /// Notional
    pub nominal: f64,
    /// Filled notional
    pub filled: f64,
    /// Maturity
    pub maturity: u64,
}

/// Leg of a position; rates are sent as decimal strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionLeg {
    /// Leg kind
    #[serde(rename = "type")]
    pub leg_type: PayReceiveType,
    /// Rate
    pub rate: Decimal,
    /// Human readable description
    pub description: String,
    /// Accumulated interest
    pub acc_interest: f64,
}

/// Leg of a populate suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulateLeg {
    /// Leg kind
    #[serde(rename = "type")]
    pub leg_type: PayReceiveType,
    /// Suggested rate
    #[serde(default)]
    pub rate: Option<f64>,
}

/// Order suggestion attached to a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Populate {
    /// Product id
    pub product_id: String,
    /// Pay leg
    pub pay: PopulateLeg,
    /// Receive leg
    pub receive: PopulateLeg,
    /// Notional
    pub nominal: f64,
    /// Maturity
    pub maturity: u64,
}

/// Position pushed on the positions channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Loan or deposit
    #[serde(rename = "type")]
    pub position_type: PositionType,
    /// Creation time
    pub created_at: i64,
    /// Token address
    pub token: String,
    /// Pay leg
    pub pay: Option<PositionLeg>,
    /// Receive leg
    pub receive: Option<PositionLeg>,
    /// Notional
    pub nominal: f64,
    /// Suggested order to open the position
    pub populate: Option<Populate>,
}

/// Point of a rate chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsData {
    /// Sample time
    pub timestamp: i64,
    /// Rate, `None` when there is no quote
    pub value: Option<f64>,
}

/// Rate chart tick pushed on the product chart channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    /// Pay fixed rate
    pub pay_fixed: ChartsData,
    /// Receive fixed rate
    pub receive_fixed: ChartsData,
}
