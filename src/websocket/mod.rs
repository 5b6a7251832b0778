//! Socket.IO subscription client for SwapRate push channels

pub mod channel;
pub mod client;
pub mod mock;
pub mod packet;

#[cfg(feature = "websocket")]
pub mod manager;

pub use channel::{Channel, ChannelDescriptor, ChannelKind, ParamShape, PayloadShape};
pub use client::{EventSink, Handler, HandlerRegistry, SocketClient, Transport};
pub use mock::MockTransport;

#[cfg(feature = "websocket")]
pub use manager::{ConnectionState, ConnectionStats, SocketManager, WsConfig};
