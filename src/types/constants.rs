//! Constants used throughout the SwapRate SDK

/// REST endpoints of the known deployments
pub mod endpoints {
    /// Production API
    pub const PRODUCTION: &str = "https://api.swaprate.finance/v1";

    /// Staging API
    pub const DEVELOPMENT: &str = "https://api.stage.swaprate.finance/v1";
}

/// REST paths relative to the API base URL
pub mod paths {
    /// Meta configuration
    pub const META_CONFIG: &str = "/meta/config";
    /// Product list
    pub const PRODUCTS: &str = "/products";
    /// Login data to be signed
    pub const AUTH_LOGIN_DATA: &str = "/auth/loginData";
    /// Wallet balance (authenticated)
    pub const WALLET_BALANCE: &str = "/wallet/balance";
    /// Form an order (authenticated)
    pub const ORDERS_FORM: &str = "/orders/form";
    /// Submit a signed order (authenticated)
    pub const ORDERS_SIGN: &str = "/orders/sign";
    /// Cancel orders (authenticated)
    pub const ORDERS_CANCEL: &str = "/orders/cancel";
}

/// Socket.IO transport constants
pub mod socket {
    /// Engine.IO handshake path
    pub const PATH: &str = "/socket.io/";
    /// Engine.IO protocol revision spoken by the server
    pub const ENGINE_IO_VERSION: u8 = 3;
    /// Control event registering a subscription
    pub const SUBSCRIBE_EVENT: &str = "subscribe";
    /// Control event removing a subscription
    pub const UNSUBSCRIBE_EVENT: &str = "unsubscribe";
    /// Key carrying the channel name in control payloads
    pub const CHANNEL_KEY: &str = "ch";
}

/// Wire names of the push channels
pub mod channels {
    /// Business-level errors tied to a subscription attempt
    pub const ERROR_MESSAGE: &str = "error:message";
    /// Swaps of the authenticated address
    pub const SWAPS: &str = "swaps:address";
    /// Positions of the authenticated address
    pub const POSITIONS: &str = "positions:address";
    /// Orders of the authenticated address
    pub const ORDERS: &str = "orders:address";
    /// Rate chart of a product
    pub const PRODUCT_CHART: &str = "products:chart";
}
