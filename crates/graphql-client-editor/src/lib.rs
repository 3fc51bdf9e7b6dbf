//! Editor-facing shim for the GraphQL language server.
//!
//! This crate is the thin layer between an editor and the external
//! `graphql-lsp` process: it forwards settings at launch, reflects the
//! server's health in a status-bar indicator, and relays diagnostics and
//! log output to the editor's surfaces. The editor supplies the widget and
//! host implementations behind the [`StatusIndicator`] and [`EditorHost`]
//! traits; everything else here is a small, single-threaded state machine.

mod extension;
mod indicator;
mod status;

pub use extension::{EditorHost, Extension};
pub use indicator::{
    apply_view, update_indicator, IndicatorView, StatusIndicator, RECOGNIZED_CONTENT_TYPES,
    SHOW_OUTPUT_COMMAND,
};
pub use status::{presentation, ConnectionStatus, StatusPresentation};
