//! Socket.IO connection manager
//!
//! Features:
//! - One Tokio task owns the WebSocket; callers talk to it over an unbounded control channel
//! - Engine.IO v3 handshake, namespace join and keepalive pings
//! - Ping-timeout detection: a server silent for `pingInterval + pingTimeout` is treated as gone
//! - Frames emitted before the namespace is joined are queued and flushed in order
//! - Inbound events and connection failures are pushed into an [`EventSink`]

use crate::{
    config::Config,
    error::{Result, SwapRateError},
    websocket::client::{EventSink, Transport},
    websocket::packet::{self, Packet, SocketPacket},
};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use url::Url;

/// Socket connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,
    /// WebSocket handshake or namespace join in progress
    Connecting,
    /// Namespace joined
    Connected,
    /// Connection explicitly closed by user
    Closed,
}

/// Configuration for the socket manager
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket endpoint URL (ws:// or wss://)
    pub url: Url,
    /// Socket.IO namespace to join
    pub namespace: String,
    /// Interval between pings until the server announces its own
    pub ping_interval: Duration,
    /// Extra silence tolerated after a missed ping until the server announces its own
    pub ping_timeout: Duration,
}

impl WsConfig {
    /// Derive the socket configuration from an API configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            url: config.socket_url()?,
            namespace: config.socket_namespace(),
            ping_interval: Duration::from_secs(25),
            ping_timeout: Duration::from_secs(5),
        })
    }
}

/// Connection statistics
#[derive(Debug, Clone, Default)]
pub struct ConnectionStats {
    /// Number of frames sent to the server
    pub messages_sent: u64,
    /// Number of events received on the joined namespace
    pub messages_received: u64,
    /// Timestamp when the namespace was joined
    pub last_connected_at: Option<Instant>,
    /// Timestamp when the connection ended
    pub last_disconnected_at: Option<Instant>,
}

/// Manager control commands
#[derive(Debug)]
enum ManagerCommand {
    /// Send an encoded frame once the namespace is joined
    Emit(String),
    /// Leave the namespace, close the socket and stop the task
    Close,
}

/// Socket.IO connection driven by a background task
#[derive(Clone)]
pub struct SocketManager {
    /// Runtime configuration
    config: WsConfig,
    /// Connection state shared with the task
    state: Arc<RwLock<ConnectionState>>,
    /// Connection statistics
    stats: Arc<Mutex<ConnectionStats>>,
    /// Control channel sender driving the connection task
    control_tx: mpsc::UnboundedSender<ManagerCommand>,
}

impl std::fmt::Debug for SocketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketManager")
            .field("config", &self.config)
            .field("state", &"<RwLock>")
            .field("stats", &"<Mutex>")
            .field("control_tx", &!self.control_tx.is_closed())
            .finish()
    }
}

impl SocketManager {
    /// Open the connection in a background task.
    ///
    /// Returns immediately; the handshake continues on the task. Fails when
    /// called outside a Tokio runtime.
    pub fn connect(config: WsConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| SwapRateError::transport("Socket connection requires a Tokio runtime"))?;

        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let state = Arc::new(RwLock::new(ConnectionState::Connecting));
        let stats = Arc::new(Mutex::new(ConnectionStats::default()));

        runtime.spawn(Self::connection_task(
            config.clone(),
            Arc::clone(&state),
            Arc::clone(&stats),
            sink,
            control_rx,
        ));

        info!("🚀 Socket manager started");
        Ok(Self {
            config,
            state,
            stats,
            control_tx,
        })
    }

    /// Get current connection state
    pub async fn get_state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Get connection statistics
    pub async fn get_stats(&self) -> ConnectionStats {
        self.stats.lock().await.clone()
    }

    /// Check if the namespace is joined
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected)
    }

    /// Main connection task
    async fn connection_task(
        config: WsConfig,
        state: Arc<RwLock<ConnectionState>>,
        stats: Arc<Mutex<ConnectionStats>>,
        sink: Arc<dyn EventSink>,
        mut control_rx: mpsc::UnboundedReceiver<ManagerCommand>,
    ) {
        info!("🔌 Attempting to connect to Socket.IO: {}", config.url);

        let ws_stream = match connect_async(config.url.as_str()).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(e) => {
                error!("❌ Failed to connect to Socket.IO: {}", e);
                *state.write().await = ConnectionState::Disconnected;
                sink.on_transport_error(e.into());
                return;
            }
        };
        info!("✅ WebSocket connected, waiting for Engine.IO handshake");

        let (mut ws_sink, mut ws_stream) = ws_stream.split();
        let mut pending: VecDeque<String> = VecDeque::new();
        let mut opened = false;
        let mut joined = false;
        let mut ping = tokio::time::interval_at(
            tokio::time::Instant::now() + config.ping_interval,
            config.ping_interval,
        );
        let mut silence_limit = config.ping_interval + config.ping_timeout;
        let mut last_inbound = tokio::time::Instant::now();

        let failure = loop {
            let mut outgoing: Vec<String> = Vec::new();

            tokio::select! {
                ws_msg = ws_stream.next() => {
                    if let Some(Ok(_)) = ws_msg {
                        last_inbound = tokio::time::Instant::now();
                    }
                    match ws_msg {
                        Some(Ok(Message::Text(text))) => {
                            debug!("📨 Received: {}", text);
                            let packet = match Packet::decode(&text) {
                                Ok(packet) => packet,
                                Err(e) => {
                                    warn!("Failed to decode Engine.IO frame: {} - {}", e, text);
                                    continue;
                                }
                            };

                            match packet {
                                Packet::Open(handshake) => {
                                    debug!("Engine.IO session {}", handshake.sid);
                                    opened = true;
                                    let period = handshake.ping_interval();
                                    if !period.is_zero() {
                                        ping = tokio::time::interval_at(
                                            tokio::time::Instant::now() + period,
                                            period,
                                        );
                                        silence_limit = period + handshake.ping_timeout();
                                    }
                                    // The default namespace is joined implicitly.
                                    if config.namespace != "/" {
                                        outgoing.push(packet::encode_connect(&config.namespace));
                                    }
                                }
                                Packet::Ping(data) => outgoing.push(packet::encode_pong(&data)),
                                Packet::Pong(_) => debug!("Received pong"),
                                Packet::Close => {
                                    break Some(SwapRateError::transport("Engine.IO session closed by server"));
                                }
                                Packet::Message(SocketPacket::Connect { nsp }) if nsp == config.namespace => {
                                    info!("✅ Joined namespace {}", nsp);
                                    joined = true;
                                    *state.write().await = ConnectionState::Connected;
                                    stats.lock().await.last_connected_at = Some(Instant::now());
                                    outgoing.extend(pending.drain(..));
                                }
                                Packet::Message(SocketPacket::Event { nsp, name, payload }) if nsp == config.namespace => {
                                    stats.lock().await.messages_received += 1;
                                    sink.on_event(&name, payload);
                                }
                                Packet::Message(SocketPacket::Disconnect { nsp }) if nsp == config.namespace => {
                                    break Some(SwapRateError::transport(format!(
                                        "Server closed namespace {}",
                                        nsp
                                    )));
                                }
                                Packet::Message(SocketPacket::Error { nsp, data }) => {
                                    error!("❌ Namespace {} error: {}", nsp, data);
                                    let error = SwapRateError::transport(format!(
                                        "Namespace {} error: {}",
                                        nsp, data
                                    ));
                                    // A rejected join is terminal.
                                    if nsp == config.namespace && !joined {
                                        break Some(error);
                                    }
                                    sink.on_transport_error(error);
                                }
                                other => debug!("Ignoring packet {:?}", other),
                            }
                        }
                        Some(Ok(Message::Close(close_frame))) => {
                            match close_frame {
                                Some(frame) => {
                                    error!("WebSocket closed by server: code={:?}, reason=\"{}\"", frame.code, frame.reason);
                                }
                                None => error!("WebSocket closed without close frame"),
                            }
                            break Some(SwapRateError::transport("Socket closed by server"));
                        }
                        Some(Err(e)) => {
                            error!("❌ WebSocket error: {}", e);
                            break Some(e.into());
                        }
                        None => {
                            info!("WebSocket stream ended");
                            break Some(SwapRateError::transport("Socket stream ended"));
                        }
                        Some(Ok(_)) => {}
                    }
                },

                _ = ping.tick(), if opened => {
                    outgoing.push(packet::encode_ping());
                },

                _ = tokio::time::sleep_until(last_inbound + silence_limit) => {
                    error!("❌ No frame from server within {:?}", silence_limit);
                    break Some(SwapRateError::transport("ping timeout"));
                },

                cmd = control_rx.recv() => {
                    match cmd {
                        Some(ManagerCommand::Emit(frame)) => {
                            if joined {
                                outgoing.push(frame);
                            } else {
                                debug!("Queueing frame until namespace is joined");
                                pending.push_back(frame);
                            }
                        }
                        Some(ManagerCommand::Close) | None => {
                            info!("🛑 Close requested");
                            if joined && config.namespace != "/" {
                                let _ = ws_sink
                                    .send(Message::Text(packet::encode_disconnect(&config.namespace)))
                                    .await;
                            }
                            let _ = ws_sink.send(Message::Close(None)).await;
                            break None;
                        }
                    }
                },
            }

            let mut send_failure = None;
            for frame in outgoing {
                debug!("Sending: {}", frame);
                if let Err(e) = ws_sink.send(Message::Text(frame)).await {
                    error!("❌ Failed to send frame: {}", e);
                    send_failure = Some(e.into());
                    break;
                }
                stats.lock().await.messages_sent += 1;
            }
            if send_failure.is_some() {
                break send_failure;
            }
        };

        stats.lock().await.last_disconnected_at = Some(Instant::now());
        match failure {
            Some(error) => {
                *state.write().await = ConnectionState::Disconnected;
                if !pending.is_empty() {
                    warn!("Dropping {} frames emitted before namespace join", pending.len());
                }
                sink.on_transport_error(error);
            }
            None => *state.write().await = ConnectionState::Closed,
        }

        info!("Socket connection task ended");
    }
}

impl Transport for SocketManager {
    fn emit(&self, event: &str, payload: serde_json::Value) -> Result<()> {
        let frame = packet::encode_event(&self.config.namespace, event, &payload)?;
        self.control_tx
            .send(ManagerCommand::Emit(frame))
            .map_err(|_| SwapRateError::transport("Socket connection task has stopped"))
    }

    fn close(&self) {
        let _ = self.control_tx.send(ManagerCommand::Close);
    }
}
