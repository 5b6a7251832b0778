//! Socket.IO channel payload and parameter types

use serde::{Deserialize, Serialize};

/// Params echoed back by the server in `p` / `data`; empty for address channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedParams {
    /// Product id for the chart channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Update action of a data channel message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelAction {
    /// Full snapshot replacing the previous state
    #[serde(rename = "set")]
    Set,
    /// Action not known to this SDK version
    #[serde(other)]
    Unknown,
}

/// Envelope of every data channel push: `{ ch, p, a, d }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataChannelResponse<T> {
    /// Channel wire name
    pub ch: String,
    /// Echoed subscribe params
    #[serde(default)]
    pub p: EchoedParams,
    /// Update action
    pub a: ChannelAction,
    /// Channel payload
    pub d: T,
}

/// Business-level error pushed on the `error:message` channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorChannelResponse {
    /// Error description
    pub message: String,
    /// Params of the subscription attempt that failed
    #[serde(default)]
    pub data: EchoedParams,
}

/// Subscribe params of the address channels (swaps, positions, orders)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedSubscriptionParams {
    /// Validated access token
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Subscribe params of the product chart channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSubscriptionParams {
    /// Product id
    pub id: String,
}

/// Params of channels that take none
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyParams {}
