//! Activation wiring: the context object that owns the status machine, the
//! indicator widget, and the bridge subscription.
//!
//! One `Extension` exists per activation. All of its methods run on the
//! host's single event-processing thread; there is no locking because there
//! is no concurrent mutation.

use crossbeam_channel::Receiver;
use graphql_client_bridge::{BridgeEvent, BridgeHandle, LanguageServerBridge, ServerState};
use graphql_client_config::ClientSettings;
use lsp_types::PublishDiagnosticsParams;

use crate::indicator::{apply_view, update_indicator, StatusIndicator, SHOW_OUTPUT_COMMAND};
use crate::status::ConnectionStatus;

/// Editor surfaces the shim writes to, beyond the indicator widget.
pub trait EditorHost {
    /// Pop a user-visible error notification.
    fn show_error_message(&mut self, message: &str);
    /// Publish diagnostics relayed from the server.
    fn publish_diagnostics(&mut self, params: PublishDiagnosticsParams);
    /// Append a line to the diagnostic output stream.
    fn append_output(&mut self, line: &str);
    /// Reveal the diagnostic output stream.
    fn reveal_output(&mut self);
}

/// The activation context: constructed on activation, dropped on
/// deactivation. Owns the one mutable status variable and the one
/// indicator widget.
pub struct Extension<W, H> {
    status: ConnectionStatus,
    active_document: Option<String>,
    widget: W,
    host: H,
    bridge: BridgeHandle,
    failure_notified: bool,
}

impl<W: StatusIndicator, H: EditorHost> Extension<W, H> {
    /// Launch the bridge and render the initial (initializing, hidden)
    /// indicator.
    pub fn activate(settings: &ClientSettings, widget: W, host: H) -> Self {
        let bridge = LanguageServerBridge::launch(settings);
        let mut extension = Self {
            status: ConnectionStatus::default(),
            active_document: None,
            widget,
            host,
            bridge,
            failure_notified: false,
        };
        extension.render();
        extension
    }

    /// The bridge's lifecycle event receiver, for the host's event loop.
    #[must_use]
    pub fn events(&self) -> Receiver<BridgeEvent> {
        self.bridge.events()
    }

    #[must_use]
    pub const fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Editor focus moved to a document with the given content type, or
    /// away from any document.
    pub fn handle_focus_change(&mut self, content_type: Option<&str>) {
        self.active_document = content_type.map(str::to_string);
        self.render();
    }

    /// Process one bridge event.
    ///
    /// Diagnostics and log traffic is forwarded to the host; lifecycle
    /// notifications drive the status machine and re-render the indicator.
    pub fn handle_event(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Diagnostics(params) => self.host.publish_diagnostics(params),
            BridgeEvent::Log(line) => self.host.append_output(&line),
            lifecycle => {
                self.report_lifecycle(&lifecycle);
                self.status = self.status.apply(&lifecycle);
                self.render();
            }
        }
    }

    /// Dispatch a command invoked by the user.
    ///
    /// Returns `false` for commands this extension does not own.
    pub fn execute_command(&mut self, command: &str) -> bool {
        if command == SHOW_OUTPUT_COMMAND {
            self.host.reveal_output();
            true
        } else {
            false
        }
    }

    /// Release everything on editor deactivation: hide the widget and take
    /// the server down.
    pub fn deactivate(mut self) {
        self.widget.hide();
        self.bridge.shutdown();
    }

    fn report_lifecycle(&mut self, event: &BridgeEvent) {
        match event {
            BridgeEvent::Ready(Ok(_)) => {
                tracing::info!("GraphQL language server is ready");
            }
            BridgeEvent::Ready(Err(error)) => {
                tracing::error!("{error}");
                self.host.append_output(&error.to_string());
                // One-shot notification; later failures only reach the
                // output stream.
                if !self.failure_notified {
                    self.failure_notified = true;
                    self.host.show_error_message(
                        "The GraphQL language server failed to start. \
                         See the output channel for details.",
                    );
                }
                self.host.reveal_output();
            }
            BridgeEvent::StateChanged(ServerState::NotRunning) => {
                tracing::warn!("GraphQL language server is no longer running");
                self.host
                    .append_output("GraphQL language server is no longer running");
            }
            BridgeEvent::StateChanged(ServerState::Running) => {
                tracing::info!("GraphQL language server is running");
            }
            BridgeEvent::Diagnostics(_) | BridgeEvent::Log(_) => {}
        }
    }

    fn render(&mut self) {
        let view = update_indicator(self.status, self.active_document.as_deref());
        apply_view(&mut self.widget, &view);
    }
}
