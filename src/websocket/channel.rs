//! Channel registry
//!
//! The set of push channels is closed. Each channel is described twice: as a
//! [`ChannelKind`] variant carrying the runtime [`ChannelDescriptor`], and as a
//! zero-sized type implementing [`Channel`] that pairs the parameter type with
//! the payload type handlers receive.

use crate::{
    error::{Result, SwapRateError},
    types::{
        constants::channels,
        orders::{Charts, Order, Position, Swap},
        websocket::{
            DataChannelResponse, EmptyParams, ErrorChannelResponse, IdSubscriptionParams,
            ProtectedSubscriptionParams,
        },
    },
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Shape of the params a channel is subscribed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    /// No params
    None,
    /// `{ accessToken }`
    AccessToken,
    /// `{ id }`
    ProductId,
}

impl ParamShape {
    /// Keys a params object of this shape carries
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            ParamShape::None => &[],
            ParamShape::AccessToken => &["accessToken"],
            ParamShape::ProductId => &["id"],
        }
    }
}

/// Shape of the payload a channel delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// [`ErrorChannelResponse`]
    ErrorMessage,
    /// [`DataChannelResponse`] of [`Swap`] list
    Swaps,
    /// [`DataChannelResponse`] of [`Position`] list
    Positions,
    /// [`DataChannelResponse`] of [`Order`] list
    Orders,
    /// [`DataChannelResponse`] of [`Charts`]
    Charts,
}

/// Static description of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDescriptor {
    /// Wire name, used as `ch` and as the inbound event name
    pub name: &'static str,
    /// Whether subscribing needs a validated access token
    pub requires_credential: bool,
    /// Subscribe params shape
    pub params: ParamShape,
    /// Delivered payload shape
    pub payload: PayloadShape,
}

impl ChannelDescriptor {
    /// Check a serialized params object against the declared shape.
    ///
    /// Exactly the declared keys must be present, each a non-empty string.
    pub fn validate_params(&self, params: &Map<String, Value>) -> Result<()> {
        let expected = self.params.keys();

        if let Some(extra) = params.keys().find(|key| !expected.contains(&key.as_str())) {
            return Err(SwapRateError::invalid_parameter(format!(
                "Unexpected param '{}' for channel {}",
                extra, self.name
            )));
        }

        for key in expected {
            match params.get(*key) {
                Some(Value::String(value)) if !value.is_empty() => {}
                Some(_) => {
                    return Err(SwapRateError::invalid_parameter(format!(
                        "Param '{}' for channel {} must be a non-empty string",
                        key, self.name
                    )))
                }
                None => {
                    return Err(SwapRateError::invalid_parameter(format!(
                        "Missing param '{}' for channel {}",
                        key, self.name
                    )))
                }
            }
        }

        Ok(())
    }
}

/// Closed set of push channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// `error:message`
    ErrorMessage,
    /// `swaps:address`
    Swaps,
    /// `positions:address`
    Positions,
    /// `orders:address`
    Orders,
    /// `products:chart`
    ProductChart,
}

impl ChannelKind {
    /// Every channel
    pub const ALL: [ChannelKind; 5] = [
        ChannelKind::ErrorMessage,
        ChannelKind::Swaps,
        ChannelKind::Positions,
        ChannelKind::Orders,
        ChannelKind::ProductChart,
    ];

    /// Static descriptor of this channel
    pub const fn descriptor(&self) -> ChannelDescriptor {
        match self {
            ChannelKind::ErrorMessage => ChannelDescriptor {
                name: channels::ERROR_MESSAGE,
                requires_credential: false,
                params: ParamShape::None,
                payload: PayloadShape::ErrorMessage,
            },
            ChannelKind::Swaps => ChannelDescriptor {
                name: channels::SWAPS,
                requires_credential: true,
                params: ParamShape::AccessToken,
                payload: PayloadShape::Swaps,
            },
            ChannelKind::Positions => ChannelDescriptor {
                name: channels::POSITIONS,
                requires_credential: true,
                params: ParamShape::AccessToken,
                payload: PayloadShape::Positions,
            },
            ChannelKind::Orders => ChannelDescriptor {
                name: channels::ORDERS,
                requires_credential: true,
                params: ParamShape::AccessToken,
                payload: PayloadShape::Orders,
            },
            ChannelKind::ProductChart => ChannelDescriptor {
                name: channels::PRODUCT_CHART,
                requires_credential: false,
                params: ParamShape::ProductId,
                payload: PayloadShape::Charts,
            },
        }
    }

    /// Wire name
    pub const fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Whether subscribing needs an access token
    pub const fn requires_credential(&self) -> bool {
        self.descriptor().requires_credential
    }

    /// Look a channel up by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Typed view of a channel: its params and the payload its handlers receive
pub trait Channel: sealed::Sealed + Send + Sync + 'static {
    /// Runtime identity
    const KIND: ChannelKind;
    /// Subscribe/unsubscribe params
    type Params: Serialize + Send + Sync;
    /// Payload delivered to handlers
    type Response: DeserializeOwned + Send + Sync + 'static;
}

macro_rules! channel {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $params:ty, $response:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl Channel for $name {
            const KIND: ChannelKind = ChannelKind::$kind;
            type Params = $params;
            type Response = $response;
        }
    };
}

channel!(
    /// Server-pushed business errors
    ErrorMessage,
    ErrorMessage,
    EmptyParams,
    ErrorChannelResponse
);
channel!(
    /// Swaps of the authenticated address
    Swaps,
    Swaps,
    ProtectedSubscriptionParams,
    DataChannelResponse<Vec<Swap>>
);
channel!(
    /// Positions of the authenticated address
    Positions,
    Positions,
    ProtectedSubscriptionParams,
    DataChannelResponse<Vec<Position>>
);
channel!(
    /// Orders of the authenticated address
    Orders,
    Orders,
    ProtectedSubscriptionParams,
    DataChannelResponse<Vec<Order>>
);
channel!(
    /// Rate chart ticks of one product
    ProductChart,
    ProductChart,
    IdSubscriptionParams,
    DataChannelResponse<Charts>
);
