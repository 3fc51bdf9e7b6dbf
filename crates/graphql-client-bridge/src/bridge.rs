//! Launching the external language-server process and turning its protocol
//! traffic into lifecycle notifications.
//!
//! The bridge treats the server as an opaque collaborator: it spawns the
//! process with the forwarded settings, performs the one-shot `initialize`
//! handshake, and from then on only relays what the server reports. It never
//! restarts the process; a later `Running` notification can only come from
//! the server's own recovery behavior.

use crossbeam_channel::{unbounded, Receiver, Sender};
use graphql_client_config::ClientSettings;
use lsp_types::{InitializeResult, PublishDiagnosticsParams};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::error::BridgeError;
use crate::transport;

const INITIALIZE_REQUEST_ID: i64 = 1;
const SHUTDOWN_REQUEST_ID: i64 = 2;

/// The server's running-state marker, as reported over `StateChanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Running,
    NotRunning,
}

/// Lifecycle notifications delivered to the editor shim.
///
/// Events arrive in the order the underlying protocol traffic was observed;
/// the consumer's state is always a function of the most recent one.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// Outcome of the first startup handshake. Delivered exactly once.
    Ready(Result<Box<InitializeResult>, BridgeError>),
    /// The server's running state changed. Fires for the lifetime of the
    /// bridge, including a final `NotRunning` when the process goes away.
    StateChanged(ServerState),
    /// Diagnostics relayed verbatim for the editor to publish.
    Diagnostics(PublishDiagnosticsParams),
    /// A line for the diagnostic output stream (server stderr and
    /// `window/logMessage` traffic).
    Log(String),
}

/// Handle to a launched bridge, owned by the activation context.
///
/// Dropping the handle shuts the server down.
pub struct BridgeHandle {
    events: Receiver<BridgeEvent>,
    stdin: Option<Arc<Mutex<ChildStdin>>>,
}

impl BridgeHandle {
    /// The lifecycle event receiver. Cloneable, but all events should be
    /// consumed on the host's single event-processing thread.
    #[must_use]
    pub fn events(&self) -> Receiver<BridgeEvent> {
        self.events.clone()
    }

    /// Ask the server to exit and close its stdin. Called on deactivation;
    /// also runs on drop. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(stdin) = self.stdin.take() {
            if let Ok(mut stdin) = stdin.lock() {
                let _ = transport::write_message(
                    &mut *stdin,
                    &json!({"jsonrpc": "2.0", "id": SHUTDOWN_REQUEST_ID, "method": "shutdown"}),
                );
                let _ = transport::write_message(
                    &mut *stdin,
                    &json!({"jsonrpc": "2.0", "method": "exit"}),
                );
            }
        }
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub struct LanguageServerBridge;

impl LanguageServerBridge {
    /// Spawn the language server and start the startup handshake.
    ///
    /// Returns immediately; every outcome, including a failed spawn, is
    /// reported as a [`BridgeEvent`] on the handle's channel.
    #[must_use]
    pub fn launch(settings: &ClientSettings) -> BridgeHandle {
        let (tx, rx) = unbounded();
        let program = settings.server_program().to_path_buf();
        let args = settings.server_args();

        tracing::info!(program = %program.display(), ?args, "Launching GraphQL language server");

        let spawned = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let reason = format!("failed to spawn {}: {e}", program.display());
                tracing::error!("{reason}");
                let _ = tx.send(BridgeEvent::Ready(Err(BridgeError::init(reason))));
                return BridgeHandle {
                    events: rx,
                    stdin: None,
                };
            }
        };

        // All three pipes were requested above.
        let (Some(stdin), Some(stdout), Some(stderr)) = (
            child.stdin.take(),
            child.stdout.take(),
            child.stderr.take(),
        ) else {
            let _ = tx.send(BridgeEvent::Ready(Err(BridgeError::init(
                "server process pipes unavailable",
            ))));
            return BridgeHandle {
                events: rx,
                stdin: None,
            };
        };

        let stdin = Arc::new(Mutex::new(stdin));
        if let Err(e) = send_initialize_request(&stdin) {
            let reason = format!("failed to send initialize request: {e}");
            tracing::error!("{reason}");
            let _ = tx.send(BridgeEvent::Ready(Err(BridgeError::init(reason))));
            return BridgeHandle {
                events: rx,
                stdin: None,
            };
        }

        spawn_stderr_relay(stderr, tx.clone());

        let reader_stdin = Arc::clone(&stdin);
        thread::spawn(move || read_loop(child, stdout, reader_stdin, &tx));

        BridgeHandle {
            events: rx,
            stdin: Some(stdin),
        }
    }
}

fn send_initialize_request(stdin: &Arc<Mutex<ChildStdin>>) -> std::io::Result<()> {
    let request = json!({
        "jsonrpc": "2.0",
        "id": INITIALIZE_REQUEST_ID,
        "method": "initialize",
        "params": {
            "processId": std::process::id(),
            "rootUri": null,
            "capabilities": {},
        },
    });
    let mut stdin = stdin
        .lock()
        .map_err(|_| std::io::Error::other("stdin lock poisoned"))?;
    transport::write_message(&mut *stdin, &request)
}

/// Relay server stderr lines to the diagnostic output stream.
fn spawn_stderr_relay(stderr: ChildStderr, tx: Sender<BridgeEvent>) {
    thread::spawn(move || {
        let reader = BufReader::new(stderr);
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if tx.send(BridgeEvent::Log(line)).is_err() {
                break;
            }
        }
    });
}

/// Pump server stdout until EOF, translating messages into events.
fn read_loop(
    mut child: Child,
    stdout: ChildStdout,
    stdin: Arc<Mutex<ChildStdin>>,
    tx: &Sender<BridgeEvent>,
) {
    let mut reader = BufReader::new(stdout);
    let mut handshake = Handshake::Pending(stdin);

    let clean_eof = loop {
        match transport::read_message(&mut reader) {
            Ok(Some(message)) => {
                for event in translate_message(&message, &mut handshake) {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
            Ok(None) => break true,
            Err(e) => {
                tracing::warn!("Server transport broke: {e}");
                break false;
            }
        }
    };

    if matches!(handshake, Handshake::Pending(_)) {
        let _ = tx.send(BridgeEvent::Ready(Err(BridgeError::init(
            "server exited during startup handshake",
        ))));
    }
    let _ = tx.send(BridgeEvent::StateChanged(ServerState::NotRunning));

    if !clean_eof {
        let _ = child.kill();
    }
    let _ = child.wait();
}

/// Handshake progress for the read loop. The stdin handle is only held while
/// pending, so that once `initialized` has been sent the `BridgeHandle`
/// keeps the sole reference and closing it actually closes the pipe.
enum Handshake<W> {
    Pending(Arc<Mutex<W>>),
    Done,
}

/// Translate one server message into zero or more lifecycle events.
fn translate_message<W: Write>(message: &Value, handshake: &mut Handshake<W>) -> Vec<BridgeEvent> {
    // The only response we ever expect on this channel is the handshake's.
    if message.get("id").and_then(Value::as_i64) == Some(INITIALIZE_REQUEST_ID)
        && message.get("method").is_none()
    {
        // Marking the handshake done up front also drops the read loop's
        // stdin reference once this message is handled.
        let Handshake::Pending(stdin) = std::mem::replace(handshake, Handshake::Done) else {
            return Vec::new();
        };

        if let Some(error) = message.get("error") {
            let reason = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("initialize request rejected")
                .to_string();
            return vec![BridgeEvent::Ready(Err(BridgeError::init(reason)))];
        }

        let result = message.get("result").cloned().unwrap_or(Value::Null);
        return match serde_json::from_value::<InitializeResult>(result) {
            Ok(init) => {
                if let Ok(mut stdin) = stdin.lock() {
                    let _ = transport::write_message(
                        &mut *stdin,
                        &json!({"jsonrpc": "2.0", "method": "initialized", "params": {}}),
                    );
                }
                vec![
                    BridgeEvent::Ready(Ok(Box::new(init))),
                    BridgeEvent::StateChanged(ServerState::Running),
                ]
            }
            Err(e) => vec![BridgeEvent::Ready(Err(BridgeError::init(format!(
                "malformed initialize response: {e}"
            ))))],
        };
    }

    match message.get("method").and_then(Value::as_str) {
        Some("textDocument/publishDiagnostics") => {
            let params = message.get("params").cloned().unwrap_or(Value::Null);
            match serde_json::from_value::<PublishDiagnosticsParams>(params) {
                Ok(diagnostics) => vec![BridgeEvent::Diagnostics(diagnostics)],
                Err(e) => {
                    tracing::warn!("Dropping malformed diagnostics notification: {e}");
                    Vec::new()
                }
            }
        }
        Some("window/logMessage") => {
            let line = message
                .pointer("/params/message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            vec![BridgeEvent::Log(line)]
        }
        Some(method) => {
            tracing::debug!(method, "Ignoring server message");
            Vec::new()
        }
        None => Vec::new(),
    }
}
