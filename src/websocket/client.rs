//! Typed subscription client multiplexing all channels over one transport

use crate::{
    error::{Result, SwapRateError},
    types::constants::socket::{CHANNEL_KEY, SUBSCRIBE_EVENT, UNSUBSCRIBE_EVENT},
    websocket::channel::{Channel, ChannelKind},
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Callback registered for a channel or for transport errors.
///
/// Handlers are identified by the `Arc` allocation: `off` removes the
/// registration made with a clone of the same `Arc`.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Outbound side of a persistent connection
pub trait Transport: Send + Sync {
    /// Emit a named event. Must not block; the transport orders and flushes events itself.
    fn emit(&self, event: &str, payload: Value) -> Result<()>;

    /// Terminate the connection
    fn close(&self);
}

/// Inbound side of a persistent connection
pub trait EventSink: Send + Sync {
    /// An event arrived from the server
    fn on_event(&self, event: &str, payload: Value);

    /// The connection reported an error
    fn on_transport_error(&self, error: SwapRateError);
}

type ErasedHandler = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Clone)]
struct Registration {
    key: usize,
    invoke: ErasedHandler,
}

fn handler_key<T: ?Sized>(handler: &Arc<T>) -> usize {
    Arc::as_ptr(handler) as *const () as usize
}

/// Per-channel handler sets and transport error handlers
#[derive(Default)]
pub struct HandlerRegistry {
    channels: RwLock<HashMap<&'static str, Vec<Registration>>>,
    errors: RwLock<Vec<Handler<SwapRateError>>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("channels", &"<RwLock>")
            .field("errors", &"<RwLock>")
            .finish()
    }
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for channel `C`
    pub fn on<C: Channel>(&self, handler: &Handler<C::Response>) {
        let typed = Arc::clone(handler);
        let invoke: ErasedHandler = Arc::new(move |raw: &Value| {
            match <C::Response as serde::Deserialize>::deserialize(raw) {
                Ok(response) => typed(&response),
                Err(e) => warn!("Dropping {} payload that does not decode: {}", C::KIND, e),
            }
        });

        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(C::KIND.name())
            .or_default()
            .push(Registration {
                key: handler_key(handler),
                invoke,
            });
    }

    /// Remove the registration of `handler` for channel `C`; other handlers stay
    pub fn off<C: Channel>(&self, handler: &Handler<C::Response>) {
        let key = handler_key(handler);
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(registrations) = channels.get_mut(C::KIND.name()) {
            if let Some(index) = registrations.iter().position(|r| r.key == key) {
                registrations.remove(index);
            }
            if registrations.is_empty() {
                channels.remove(C::KIND.name());
            }
        }
    }

    /// Register a transport error handler
    pub fn on_error(&self, handler: &Handler<SwapRateError>) {
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(handler));
    }

    /// Remove a transport error handler
    pub fn off_error(&self, handler: &Handler<SwapRateError>) {
        let key = handler_key(handler);
        let mut errors = self.errors.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = errors.iter().position(|h| handler_key(h) == key) {
            errors.remove(index);
        }
    }

    /// Number of handlers registered for `kind`
    pub fn handler_count(&self, kind: ChannelKind) -> usize {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind.name())
            .map_or(0, Vec::len)
    }

    /// Number of transport error handlers
    pub fn error_handler_count(&self) -> usize {
        self.errors.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn snapshot(&self, event: &str) -> Vec<ErasedHandler> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map(|registrations| registrations.iter().map(|r| Arc::clone(&r.invoke)).collect())
            .unwrap_or_default()
    }
}

impl EventSink for HandlerRegistry {
    fn on_event(&self, event: &str, payload: Value) {
        // Handlers run outside the lock so they can register or remove handlers.
        let handlers = self.snapshot(event);
        if handlers.is_empty() {
            debug!("No handler for event {}", event);
            return;
        }
        for handler in handlers {
            handler(&payload);
        }
    }

    fn on_transport_error(&self, error: SwapRateError) {
        let handlers = self.errors.read().unwrap_or_else(PoisonError::into_inner).clone();
        if handlers.is_empty() {
            warn!("Unhandled transport error: {}", error);
            return;
        }
        for handler in handlers {
            handler(&error);
        }
    }
}

/// Subscription client owning a single transport connection
#[derive(Clone)]
pub struct SocketClient {
    transport: Arc<dyn Transport>,
    registry: Arc<HandlerRegistry>,
    closed: Arc<AtomicBool>,
}

impl std::fmt::Debug for SocketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketClient")
            .field("transport", &"<dyn Transport>")
            .field("registry", &self.registry)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl SocketClient {
    /// Create a client over an established transport whose inbound events
    /// are delivered to `registry`
    pub fn new(transport: Arc<dyn Transport>, registry: Arc<HandlerRegistry>) -> Self {
        Self {
            transport,
            registry,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Connect over Socket.IO. Must be called from within a Tokio runtime.
    #[cfg(feature = "websocket")]
    pub fn connect(config: crate::websocket::WsConfig) -> Result<Self> {
        let registry = Arc::new(HandlerRegistry::new());
        let sink: Arc<dyn EventSink> = registry.clone();
        let manager = crate::websocket::SocketManager::connect(config, sink)?;
        Ok(Self::new(Arc::new(manager), registry))
    }

    /// Handler registry receiving inbound events
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Emit a `subscribe` control event for channel `C`.
    ///
    /// Returns once the event is handed to the transport; no server
    /// acknowledgement is awaited. Repeated calls emit repeated events.
    pub fn subscribe<C: Channel>(&self, params: &C::Params) -> Result<()> {
        self.emit_control(SUBSCRIBE_EVENT, C::KIND, params)
    }

    /// Emit an `unsubscribe` control event for channel `C`
    pub fn unsubscribe<C: Channel>(&self, params: &C::Params) -> Result<()> {
        self.emit_control(UNSUBSCRIBE_EVENT, C::KIND, params)
    }

    /// Register a handler for channel `C`
    pub fn on<C: Channel>(&self, handler: &Handler<C::Response>) -> &Self {
        self.registry.on::<C>(handler);
        self
    }

    /// Remove a handler for channel `C`
    pub fn off<C: Channel>(&self, handler: &Handler<C::Response>) -> &Self {
        self.registry.off::<C>(handler);
        self
    }

    /// Register a transport error handler
    pub fn on_error(&self, handler: &Handler<SwapRateError>) -> &Self {
        self.registry.on_error(handler);
        self
    }

    /// Remove a transport error handler
    pub fn off_error(&self, handler: &Handler<SwapRateError>) -> &Self {
        self.registry.off_error(handler);
        self
    }

    /// Close the connection. Calling it again has no effect.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.transport.close();
        info!("Socket client closed");
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn emit_control<P: Serialize>(&self, event: &str, kind: ChannelKind, params: &P) -> Result<()> {
        let fields = match serde_json::to_value(params)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(SwapRateError::invalid_parameter(format!(
                    "Params for channel {} must be an object",
                    kind
                )))
            }
        };
        kind.descriptor().validate_params(&fields)?;

        let mut payload = Map::new();
        payload.insert(CHANNEL_KEY.to_string(), Value::String(kind.name().to_string()));
        payload.extend(fields);

        debug!("Emitting {} for channel {}", event, kind);
        self.transport.emit(event, Value::Object(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::orders::Charts;
    use crate::types::websocket::{
        DataChannelResponse, EmptyParams, ErrorChannelResponse, IdSubscriptionParams,
        ProtectedSubscriptionParams,
    };
    use crate::websocket::channel::{ErrorMessage, Orders, ProductChart, Swaps};
    use crate::websocket::mock::MockTransport;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn client() -> (SocketClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let client = SocketClient::new(transport.clone(), Arc::new(HandlerRegistry::new()));
        (client, transport)
    }

    fn chart_event(id: &str) -> Value {
        json!({
            "ch": "products:chart",
            "p": { "id": id },
            "a": "set",
            "d": {
                "payFixed": { "timestamp": 10, "value": 0.04 },
                "receiveFixed": { "timestamp": 10, "value": 0.03 }
            }
        })
    }

    fn counter<T: 'static>() -> (Handler<T>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handler: Handler<T> = Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (handler, count)
    }

    #[test]
    fn test_subscribe_then_unsubscribe_emits_two_events() {
        let (client, transport) = client();
        let params = IdSubscriptionParams {
            id: "prod-1".to_string(),
        };

        client.subscribe::<ProductChart>(&params).unwrap();
        client.unsubscribe::<ProductChart>(&params).unwrap();

        let emitted = transport.emitted();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0].0, "subscribe");
        assert_eq!(emitted[1].0, "unsubscribe");
        let expected = json!({ "ch": "products:chart", "id": "prod-1" });
        assert_eq!(emitted[0].1, expected);
        assert_eq!(emitted[1].1, expected);
    }

    #[test]
    fn test_duplicate_subscribe_is_forwarded() {
        let (client, transport) = client();
        let params = ProtectedSubscriptionParams {
            access_token: "token".to_string(),
        };

        client.subscribe::<Orders>(&params).unwrap();
        client.subscribe::<Orders>(&params).unwrap();

        let emitted = transport.emitted();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0], emitted[1]);
        assert_eq!(
            emitted[0].1,
            json!({ "ch": "orders:address", "accessToken": "token" })
        );
    }

    #[test]
    fn test_invalid_params_are_not_emitted() {
        let (client, transport) = client();

        let err = client
            .subscribe::<Swaps>(&ProtectedSubscriptionParams {
                access_token: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, SwapRateError::InvalidParameter(_)));
        assert!(transport.emitted().is_empty());
    }

    #[test]
    fn test_error_message_channel_has_no_params() {
        let (client, transport) = client();
        client.subscribe::<ErrorMessage>(&EmptyParams {}).unwrap();
        assert_eq!(transport.emitted()[0].1, json!({ "ch": "error:message" }));
    }

    #[test]
    fn test_handler_receives_typed_envelope_once() {
        let (client, _) = client();
        let received: Arc<Mutex<Vec<DataChannelResponse<Charts>>>> = Arc::default();
        let sink = received.clone();
        let handler: Handler<DataChannelResponse<Charts>> =
            Arc::new(move |response| sink.lock().unwrap().push(response.clone()));

        client.on::<ProductChart>(&handler);
        client.registry().on_event("products:chart", chart_event("prod-1"));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].d.pay_fixed.value, Some(0.04));
        assert_eq!(received[0].p.id.as_deref(), Some("prod-1"));
    }

    #[test]
    fn test_off_stops_delivery() {
        let (client, _) = client();
        let (handler, count) = counter::<DataChannelResponse<Charts>>();

        client.on::<ProductChart>(&handler);
        client.registry().on_event("products:chart", chart_event("prod-1"));
        client.off::<ProductChart>(&handler);
        client.registry().on_event("products:chart", chart_event("prod-1"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(client.registry().handler_count(ChannelKind::ProductChart), 0);
    }

    #[test]
    fn test_off_removes_only_that_handler() {
        let (client, _) = client();
        let (first, first_count) = counter::<DataChannelResponse<Charts>>();
        let (second, second_count) = counter::<DataChannelResponse<Charts>>();

        client.on::<ProductChart>(&first).on::<ProductChart>(&second);
        client.off::<ProductChart>(&first);
        client.registry().on_event("products:chart", chart_event("prod-1"));

        assert_eq!(first_count.load(Ordering::SeqCst), 0);
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_events_are_routed_by_channel() {
        let (client, _) = client();
        let (chart, chart_count) = counter::<DataChannelResponse<Charts>>();
        let (errors, error_count) = counter::<ErrorChannelResponse>();

        client.on::<ProductChart>(&chart);
        client.on::<ErrorMessage>(&errors);
        client.registry().on_event(
            "error:message",
            json!({ "message": "Invalid access token", "data": {} }),
        );

        assert_eq!(chart_count.load(Ordering::SeqCst), 0);
        assert_eq!(error_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_undecodable_payload_is_dropped() {
        let (client, _) = client();
        let (handler, count) = counter::<DataChannelResponse<Charts>>();

        client.on::<ProductChart>(&handler);
        client
            .registry()
            .on_event("products:chart", json!({ "ch": "products:chart", "d": 1 }));

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_may_remove_itself_during_delivery() {
        let (client, _) = client();
        let count = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Handler<DataChannelResponse<Charts>>>>> = Arc::default();

        let registry = client.registry().clone();
        let seen = count.clone();
        let own = slot.clone();
        let handler: Handler<DataChannelResponse<Charts>> = Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            if let Some(me) = own.lock().unwrap().take() {
                registry.off::<ProductChart>(&me);
            }
        });
        *slot.lock().unwrap() = Some(handler.clone());

        client.on::<ProductChart>(&handler);
        client.registry().on_event("products:chart", chart_event("prod-1"));
        client.registry().on_event("products:chart", chart_event("prod-1"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transport_errors_reach_error_handlers_only() {
        let (client, _) = client();
        let (errors, error_count) = counter::<SwapRateError>();
        let (channel, channel_count) = counter::<ErrorChannelResponse>();

        client.on_error(&errors);
        client.on::<ErrorMessage>(&channel);
        client
            .registry()
            .on_transport_error(SwapRateError::transport("connection reset"));
        assert_eq!(error_count.load(Ordering::SeqCst), 1);
        assert_eq!(channel_count.load(Ordering::SeqCst), 0);

        client.off_error(&errors);
        assert_eq!(client.registry().error_handler_count(), 0);
        client
            .registry()
            .on_transport_error(SwapRateError::transport("connection reset"));
        assert_eq!(error_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_is_idempotent_and_registration_stays_safe() {
        let (client, transport) = client();
        let (handler, _) = counter::<DataChannelResponse<Charts>>();

        client.close();
        client.close();
        assert!(client.is_closed());
        assert_eq!(transport.close_count(), 1);

        client.on::<ProductChart>(&handler);
        assert_eq!(client.registry().handler_count(ChannelKind::ProductChart), 1);
        client.off::<ProductChart>(&handler);
        assert_eq!(client.registry().handler_count(ChannelKind::ProductChart), 0);
    }
}
