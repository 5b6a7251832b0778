//! Engine.IO v3 / Socket.IO v2 text packet codec
//!
//! Frame layout: one Engine.IO type digit, and for `4` (message) one Socket.IO
//! type digit, an optional `/namespace,` prefix, an optional ack id and a JSON
//! body. `42/v1,["subscribe",{"ch":"orders:address"}]` is an event named
//! `subscribe` on namespace `/v1`.

use crate::error::{Result, SwapRateError};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Engine.IO open handshake
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// Session id
    pub sid: String,
    /// Transports the connection may upgrade to
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Ping interval in milliseconds
    pub ping_interval: u64,
    /// Ping timeout in milliseconds
    pub ping_timeout: u64,
}

impl Handshake {
    /// Ping interval as a duration
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval)
    }

    /// Ping timeout as a duration
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout)
    }
}

/// Socket.IO packet carried by an Engine.IO message
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    /// Namespace connected
    Connect {
        /// Namespace
        nsp: String,
    },
    /// Namespace disconnected
    Disconnect {
        /// Namespace
        nsp: String,
    },
    /// Named event with its first argument
    Event {
        /// Namespace
        nsp: String,
        /// Event name
        name: String,
        /// First event argument (`null` when absent)
        payload: Value,
    },
    /// Namespace-level error
    Error {
        /// Namespace
        nsp: String,
        /// Error body
        data: Value,
    },
    /// Acks and binary packets, which this client does not use
    Unsupported {
        /// Namespace
        nsp: String,
        /// Socket.IO packet type digit
        kind: u8,
    },
}

/// Engine.IO packet
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Connection opened
    Open(Handshake),
    /// Transport closing
    Close,
    /// Ping with optional payload data
    Ping(String),
    /// Pong with optional payload data
    Pong(String),
    /// Socket.IO message
    Message(SocketPacket),
    /// Transport upgrade
    Upgrade,
    /// No-op
    Noop,
}

impl Packet {
    /// Decode a text frame
    pub fn decode(frame: &str) -> Result<Self> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| SwapRateError::transport("empty Engine.IO frame"))?;
        let rest = chars.as_str();

        match kind {
            '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
            '1' => Ok(Packet::Close),
            '2' => Ok(Packet::Ping(rest.to_string())),
            '3' => Ok(Packet::Pong(rest.to_string())),
            '4' => Ok(Packet::Message(decode_socket_packet(rest)?)),
            '5' => Ok(Packet::Upgrade),
            '6' => Ok(Packet::Noop),
            other => Err(SwapRateError::transport(format!(
                "unknown Engine.IO packet type '{}'",
                other
            ))),
        }
    }
}

fn decode_socket_packet(body: &str) -> Result<SocketPacket> {
    let kind = body
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| SwapRateError::transport("missing Socket.IO packet type"))? as u8;
    let mut rest = &body[1..];

    let nsp = if rest.starts_with('/') {
        match rest.find(',') {
            Some(end) => {
                let nsp = rest[..end].to_string();
                rest = &rest[end + 1..];
                nsp
            }
            None => {
                let nsp = rest.to_string();
                rest = "";
                nsp
            }
        }
    } else {
        "/".to_string()
    };

    // ack id
    let data = rest.trim_start_matches(|c: char| c.is_ascii_digit());

    match kind {
        0 => Ok(SocketPacket::Connect { nsp }),
        1 => Ok(SocketPacket::Disconnect { nsp }),
        2 => {
            let args: Vec<Value> = serde_json::from_str(data)?;
            let mut args = args.into_iter();
            let name = match args.next() {
                Some(Value::String(name)) => name,
                _ => return Err(SwapRateError::transport("event without a name")),
            };
            Ok(SocketPacket::Event {
                nsp,
                name,
                payload: args.next().unwrap_or(Value::Null),
            })
        }
        4 => {
            let data = if data.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(data).unwrap_or_else(|_| Value::String(data.to_string()))
            };
            Ok(SocketPacket::Error { nsp, data })
        }
        kind => Ok(SocketPacket::Unsupported { nsp, kind }),
    }
}

fn namespace_prefix(nsp: &str) -> String {
    if nsp == "/" {
        String::new()
    } else {
        format!("{},", nsp)
    }
}

/// Frame connecting to a namespace
pub fn encode_connect(nsp: &str) -> String {
    format!("40{}", namespace_prefix(nsp))
}

/// Frame leaving a namespace
pub fn encode_disconnect(nsp: &str) -> String {
    format!("41{}", namespace_prefix(nsp))
}

/// Frame emitting `event` with a single argument
pub fn encode_event(nsp: &str, event: &str, payload: &Value) -> Result<String> {
    let body = serde_json::to_string(&(event, payload))?;
    Ok(format!("42{}{}", namespace_prefix(nsp), body))
}

/// Engine.IO ping frame
pub fn encode_ping() -> String {
    "2".to_string()
}

/// Engine.IO pong frame answering a ping carrying `data`
pub fn encode_pong(data: &str) -> String {
    format!("3{}", data)
}
