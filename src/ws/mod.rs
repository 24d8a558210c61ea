//! WebSocket layer: connection handling, dispatch, subscriptions.
//!
//! The endpoint at `/ws` accepts JSON command envelopes and answers each
//! with a response or error frame. Agent status updates are pushed to
//! connections subscribed to the agent's topic.

pub mod connection;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod sink;
pub mod subscription;

pub use connection::ConnectionSettings;
pub use dispatcher::Dispatcher;
pub use sink::ResponseSink;
pub use subscription::SubscriptionRegistry;
