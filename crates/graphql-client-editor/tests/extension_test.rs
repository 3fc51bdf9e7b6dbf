//! Activation-context behavior against recording fakes.

use graphql_client_bridge::{BridgeError, BridgeEvent, ServerState};
use graphql_client_config::ClientSettings;
use graphql_client_editor::{
    ConnectionStatus, EditorHost, Extension, StatusIndicator, SHOW_OUTPUT_COMMAND,
};
use lsp_types::{InitializeResult, PublishDiagnosticsParams};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct WidgetState {
    text: String,
    tooltip: String,
    color: Option<String>,
    command: String,
    visible: bool,
}

#[derive(Default)]
struct FakeWidget(Rc<RefCell<WidgetState>>);

impl StatusIndicator for FakeWidget {
    fn set_text(&mut self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.0.borrow_mut().tooltip = tooltip.to_string();
    }

    fn set_color(&mut self, color: Option<&str>) {
        self.0.borrow_mut().color = color.map(str::to_string);
    }

    fn set_command(&mut self, command: &str) {
        self.0.borrow_mut().command = command.to_string();
    }

    fn show(&mut self) {
        self.0.borrow_mut().visible = true;
    }

    fn hide(&mut self) {
        self.0.borrow_mut().visible = false;
    }
}

#[derive(Default)]
struct HostState {
    errors: Vec<String>,
    output: Vec<String>,
    reveals: usize,
    diagnostics: Vec<PublishDiagnosticsParams>,
}

#[derive(Default)]
struct FakeHost(Rc<RefCell<HostState>>);

impl EditorHost for FakeHost {
    fn show_error_message(&mut self, message: &str) {
        self.0.borrow_mut().errors.push(message.to_string());
    }

    fn publish_diagnostics(&mut self, params: PublishDiagnosticsParams) {
        self.0.borrow_mut().diagnostics.push(params);
    }

    fn append_output(&mut self, line: &str) {
        self.0.borrow_mut().output.push(line.to_string());
    }

    fn reveal_output(&mut self) {
        self.0.borrow_mut().reveals += 1;
    }
}

struct Fixture {
    extension: Extension<FakeWidget, FakeHost>,
    widget: Rc<RefCell<WidgetState>>,
    host: Rc<RefCell<HostState>>,
}

/// Activate against a server path that cannot spawn. Synthetic events are
/// fed through `handle_event` directly; the real bridge channel is only
/// used where a test says so.
fn activate() -> Fixture {
    let settings = ClientSettings {
        server_path: Some(PathBuf::from("/nonexistent/graphql-lsp")),
        ..ClientSettings::default()
    };
    let widget = FakeWidget::default();
    let host = FakeHost::default();
    let widget_state = Rc::clone(&widget.0);
    let host_state = Rc::clone(&host.0);
    Fixture {
        extension: Extension::activate(&settings, widget, host),
        widget: widget_state,
        host: host_state,
    }
}

fn ready_ok() -> BridgeEvent {
    BridgeEvent::Ready(Ok(Box::new(InitializeResult::default())))
}

fn ready_err(reason: &str) -> BridgeEvent {
    BridgeEvent::Ready(Err(BridgeError::InitializationFailure {
        reason: reason.to_string(),
    }))
}

#[test]
fn test_initial_render_is_initializing_and_hidden() {
    let fixture = activate();
    assert_eq!(fixture.extension.status(), ConnectionStatus::Initializing);

    let widget = fixture.widget.borrow();
    assert_eq!(widget.text, "$(sync) GraphQL");
    assert!(!widget.visible);
    assert_eq!(widget.command, SHOW_OUTPUT_COMMAND);
}

#[test]
fn test_spawn_failure_event_from_real_bridge_fails_the_status() {
    let mut fixture = activate();
    let event = fixture
        .extension
        .events()
        .recv_timeout(Duration::from_secs(10))
        .unwrap();
    fixture.extension.handle_event(event);

    assert_eq!(fixture.extension.status(), ConnectionStatus::Failed);
    let host = fixture.host.borrow();
    assert_eq!(host.errors.len(), 1);
    assert!(host.reveals >= 1);
}

#[test]
fn test_failure_notification_is_one_shot() {
    let mut fixture = activate();
    fixture.extension.handle_event(ready_err("first"));
    fixture.extension.handle_event(ready_err("second"));

    let host = fixture.host.borrow();
    assert_eq!(host.errors.len(), 1);
    // Both reasons still reach the output stream.
    assert!(host.output.iter().any(|line| line.contains("first")));
    assert!(host.output.iter().any(|line| line.contains("second")));
}

#[test]
fn test_connected_presentation_when_focused_on_graphql() {
    let mut fixture = activate();
    fixture.extension.handle_focus_change(Some("graphql"));
    fixture.extension.handle_event(ready_ok());

    let widget = fixture.widget.borrow();
    assert_eq!(widget.text, "$(plug) GraphQL");
    assert_eq!(widget.color.as_deref(), Some("lightgrean"));
    assert_eq!(widget.tooltip, "GraphQL language server is running");
    assert!(widget.visible);
}

#[test]
fn test_indicator_hidden_for_json_even_when_failed() {
    let mut fixture = activate();
    fixture.extension.handle_event(ready_err("boom"));
    fixture.extension.handle_focus_change(Some("json"));

    let widget = fixture.widget.borrow();
    assert_eq!(widget.text, "$(stop) GraphQL");
    assert!(!widget.visible);
}

#[test]
fn test_not_running_then_running_shows_connected() {
    let mut fixture = activate();
    fixture.extension.handle_focus_change(Some("typescript"));
    fixture
        .extension
        .handle_event(BridgeEvent::StateChanged(ServerState::NotRunning));
    fixture
        .extension
        .handle_event(BridgeEvent::StateChanged(ServerState::Running));

    assert_eq!(fixture.extension.status(), ConnectionStatus::Connected);
    let widget = fixture.widget.borrow();
    assert_eq!(widget.text, "$(plug) GraphQL");
    assert!(widget.visible);
}

#[test]
fn test_repeated_renders_are_idempotent() {
    let mut fixture = activate();
    fixture.extension.handle_event(ready_ok());

    fixture.extension.handle_focus_change(Some("graphql"));
    let first = fixture.widget.borrow().clone();
    fixture.extension.handle_focus_change(Some("graphql"));
    let second = fixture.widget.borrow().clone();

    assert_eq!(first, second);
    assert!(first.visible);
}

#[test]
fn test_diagnostics_are_forwarded_without_touching_status() {
    let mut fixture = activate();
    fixture.extension.handle_event(ready_ok());

    let params = PublishDiagnosticsParams {
        uri: "file:///schema.graphql".parse().unwrap(),
        diagnostics: Vec::new(),
        version: None,
    };
    fixture
        .extension
        .handle_event(BridgeEvent::Diagnostics(params));

    assert_eq!(fixture.extension.status(), ConnectionStatus::Connected);
    assert_eq!(fixture.host.borrow().diagnostics.len(), 1);
}

#[test]
fn test_log_events_feed_the_output_stream() {
    let mut fixture = activate();
    fixture
        .extension
        .handle_event(BridgeEvent::Log("schema loaded".to_string()));
    assert_eq!(fixture.host.borrow().output, vec!["schema loaded"]);
}

#[test]
fn test_show_output_command_reveals_the_stream() {
    let mut fixture = activate();
    assert!(fixture.extension.execute_command(SHOW_OUTPUT_COMMAND));
    assert!(!fixture.extension.execute_command("graphql.someOtherCommand"));
    assert_eq!(fixture.host.borrow().reveals, 1);
}

#[test]
fn test_deactivation_hides_the_widget() {
    let fixture = activate();
    let widget = Rc::clone(&fixture.widget);
    fixture.extension.deactivate();
    assert!(!widget.borrow().visible);
}
