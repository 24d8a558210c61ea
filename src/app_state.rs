//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::ws::{ConnectionSettings, Dispatcher, SubscriptionRegistry};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Command dispatcher shared by every connection.
    pub dispatcher: Arc<Dispatcher>,
    /// Subscription registry, also reachable through the dispatcher.
    pub registry: Arc<SubscriptionRegistry>,
    /// Settings applied to each new WebSocket connection.
    pub connection: ConnectionSettings,
}

impl AppState {
    /// Builds state around a fresh registry and the stub backends.
    #[must_use]
    pub fn with_stub_backends(connection: ConnectionSettings) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let dispatcher = Arc::new(Dispatcher::with_stub_backends(Arc::clone(&registry)));
        Self {
            dispatcher,
            registry,
            connection,
        }
    }
}
