//! # agent-gateway
//!
//! WebSocket gateway exposing a small typed command protocol: topic
//! subscriptions, remote-agent control, and transaction lookups.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── Connection loop (ws::connection)
//!     │
//!     ├── Envelope codec (protocol::envelope, protocol::frame)
//!     ├── Dispatcher + payload extractors (ws::dispatcher, protocol::payload)
//!     ├── Command handlers (ws::handlers)
//!     │
//!     ├── SubscriptionRegistry (ws::subscription)
//!     ├── Backend ports (backend/): agent control, ledger, notifier
//!     │
//!     └── ResponseSink (ws::sink) → outbound queue → socket
//! ```

pub mod api;
pub mod app_state;
pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod ws;
