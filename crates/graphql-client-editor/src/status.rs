//! The connection-status state machine and its presentation table.
//!
//! `ConnectionStatus` is driven exclusively by bridge lifecycle
//! notifications; nothing else may set it. The machine has no terminal
//! state: a server that stops and later reports running again moves the
//! status back to `Connected`.

use graphql_client_bridge::{BridgeEvent, ServerState};

/// Health of the connection to the language server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Before any lifecycle notification has arrived.
    #[default]
    Initializing,
    /// The most recent notification was a successful handshake or a
    /// running-state marker.
    Connected,
    /// The most recent notification was a failed handshake or a
    /// not-running marker.
    Failed,
}

impl ConnectionStatus {
    /// Apply one lifecycle notification.
    ///
    /// Diagnostics and log traffic carry no health information and leave
    /// the status unchanged.
    #[must_use]
    pub fn apply(self, event: &BridgeEvent) -> Self {
        match event {
            BridgeEvent::Ready(Ok(_)) | BridgeEvent::StateChanged(ServerState::Running) => {
                Self::Connected
            }
            BridgeEvent::Ready(Err(_)) | BridgeEvent::StateChanged(ServerState::NotRunning) => {
                Self::Failed
            }
            BridgeEvent::Diagnostics(_) | BridgeEvent::Log(_) => self,
        }
    }
}

/// Display triple for one connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    /// Icon name in the editor's `$(icon)` syntax.
    pub icon: &'static str,
    /// Accent color token, if any.
    pub color: Option<&'static str>,
    pub tooltip: &'static str,
}

/// Immutable presentation lookup, keyed by status.
///
/// This is the single place presentation values live; render code must not
/// branch on status anywhere else.
#[must_use]
pub const fn presentation(status: ConnectionStatus) -> &'static StatusPresentation {
    match status {
        ConnectionStatus::Initializing => &StatusPresentation {
            icon: "sync",
            color: None,
            tooltip: "GraphQL language server is initializing",
        },
        ConnectionStatus::Connected => &StatusPresentation {
            icon: "plug",
            // Non-standard color token, kept verbatim.
            color: Some("lightgrean"),
            tooltip: "GraphQL language server is running",
        },
        ConnectionStatus::Failed => &StatusPresentation {
            icon: "stop",
            color: Some("red"),
            tooltip: "GraphQL language server has stopped",
        },
    }
}
