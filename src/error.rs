//! Error types for the SwapRate SDK

use thiserror::Error;

/// Result type alias for SwapRate operations
pub type Result<T> = std::result::Result<T, SwapRateError>;

/// Main error type for SwapRate SDK operations
#[derive(Error, Debug)]
pub enum SwapRateError {
    /// No access token was supplied for an operation that requires one
    #[error("Unauthorized: no access token supplied")]
    Unauthenticated,

    /// The access token could not be decoded into `{ ttl, address, signature }`
    #[error("Incorrect access token: {0}")]
    MalformedCredential(String),

    /// The access token decoded but its ttl has passed
    #[error("Expired access token: ttl {ttl} is before {now}")]
    Expired {
        /// Expiry carried by the token (seconds since epoch)
        ttl: i64,
        /// Time the token was checked at (seconds since epoch)
        now: i64,
    },

    /// Transport-level failure that is not an HTTP or WebSocket library error
    #[error("Transport failure: {0}")]
    Transport(String),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket connection errors
    #[cfg(feature = "websocket")]
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Signature parsing/recovery errors
    #[error("Ethereum error: {0}")]
    Ethereum(#[from] ethers::core::types::SignatureError),

    /// EIP-712 encoding errors
    #[error("EIP-712 signing error: {0}")]
    Eip712(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// API errors returned from SwapRate (HTTP status and body)
    #[error("API error {code}: {message}")]
    Api {
        /// HTTP status code
        code: i32,
        /// Response body
        message: String,
    },

    /// Invalid parameter errors
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Signing/Wallet errors
    #[error("Signer error: {0}")]
    Signer(String),

    /// Generic errors
    #[error("SwapRate error: {0}")]
    Generic(String),
}

impl SwapRateError {
    /// Create a new API error
    pub fn api(code: i32, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Create a new malformed credential error
    pub fn malformed_credential(message: impl Into<String>) -> Self {
        Self::MalformedCredential(message.into())
    }

    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Create a new signer error
    pub fn signer(message: impl Into<String>) -> Self {
        Self::Signer(message.into())
    }

    /// Create a new EIP-712 signing error
    pub fn eip712(message: impl Into<String>) -> Self {
        Self::Eip712(message.into())
    }

    /// Create a new generic error
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic(message.into())
    }

    /// Whether this error came from access token validation.
    ///
    /// These are raised before any network activity takes place.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::MalformedCredential(_) | Self::Expired { .. }
        )
    }

    /// Whether the underlying connection or request could not complete
    /// (network error, timeout, closed socket).
    pub fn is_transport_failure(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Http(_) => true,
            #[cfg(feature = "websocket")]
            Self::WebSocket(_) => true,
            _ => false,
        }
    }
}
