use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::error::EventBusError;
use crate::event::{EventType, StorageEvent};

/// Callback invoked for each delivered event of a registered type.
///
/// Handlers must tolerate duplicate and cross-partition out-of-order
/// deliveries; the pipeline guarantees at-least-once, not exactly-once.
pub type EventHandler =
    Arc<dyn Fn(StorageEvent) -> BoxFuture<'static, Result<(), EventBusError>> + Send + Sync>;

/// What happened to one delivered message. The offset is committed no matter
/// which variant comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handler ran and reported success
    Handled,
    /// Handler ran and failed; the failure was logged and swallowed
    HandlerFailed,
    /// No handler registered for the event type
    NoHandler,
    /// Payload did not decode to a `StorageEvent`
    DecodeFailed,
}

/// Mapping from the closed event-type enum to callbacks.
///
/// Registration takes the write lock and happens before consumption starts;
/// dispatch takes the read lock only long enough to clone the callback.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<EventType, EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register<F, Fut>(&self, event_type: EventType, handler: F)
    where
        F: Fn(StorageEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), EventBusError>> + Send + 'static,
    {
        let handler: EventHandler = Arc::new(move |event| Box::pin(handler(event)));
        self.handlers.write().await.insert(event_type, handler);
        debug!(event_type = %event_type, "registered event handler");
    }

    /// Decode one broker message and invoke the matching handler.
    ///
    /// Decode failures and unregistered types are logged and skipped; handler
    /// errors are logged and swallowed. None of these outcomes stop the
    /// consumer loop or prevent the offset commit.
    pub async fn dispatch(&self, payload: &[u8]) -> DispatchOutcome {
        let event = match StorageEvent::from_json(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "failed to parse broker message, skipping");
                return DispatchOutcome::DecodeFailed;
            }
        };

        let handler = {
            let handlers = self.handlers.read().await;
            handlers.get(&event.event_type).cloned()
        };

        match handler {
            Some(handler) => {
                debug!(event_type = %event.event_type, path = %event.path, "dispatching event");
                match handler(event).await {
                    Ok(()) => DispatchOutcome::Handled,
                    Err(e) => {
                        error!(error = %e, "event handler failed");
                        DispatchOutcome::HandlerFailed
                    }
                }
            }
            None => {
                warn!(event_type = %event.event_type, "no handler registered for event type");
                DispatchOutcome::NoHandler
            }
        }
    }
}
