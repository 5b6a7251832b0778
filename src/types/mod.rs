//! Type definitions for SwapRate API

pub mod account;
pub mod constants;
pub mod orders;
pub mod products;
pub mod websocket;

// Re-export commonly used types
pub use account::*;
pub use orders::*;
pub use products::*;
pub use websocket::*;
