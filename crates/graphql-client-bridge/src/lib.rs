//! Process launcher and protocol bridge for the GraphQL language server.
//!
//! This crate owns the boring half of editor integration: it spawns the
//! external `graphql-lsp` process with the settings the editor forwarded,
//! runs the JSON-RPC `initialize` handshake over the child's stdio, and
//! turns the traffic it observes into a stream of [`BridgeEvent`]s:
//!
//! - [`BridgeEvent::Ready`] — the handshake outcome, delivered once
//! - [`BridgeEvent::StateChanged`] — running / not-running markers
//! - [`BridgeEvent::Diagnostics`] — `publishDiagnostics` relayed verbatim
//! - [`BridgeEvent::Log`] — lines for the diagnostic output stream
//!
//! The server itself is an opaque collaborator. The bridge never retries a
//! failed launch and never restarts a dead process; all recovery, if any,
//! is the server's own business.

mod bridge;
mod error;
mod transport;

pub use bridge::{BridgeEvent, BridgeHandle, LanguageServerBridge, ServerState};
pub use error::{BridgeError, Result};
