//! Terminal host for the GraphQL editor client shim.
//!
//! Runs the same activation wiring an editor would, with the indicator and
//! output surfaces mapped onto the terminal. Useful for debugging a server
//! installation without an editor in the way.

use clap::Parser;
use graphql_client_config::ClientSettings;
use graphql_client_editor::{EditorHost, Extension, StatusIndicator};
use lsp_types::PublishDiagnosticsParams;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graphql-client")]
#[command(about = "Run the GraphQL editor client shim against a terminal host", long_about = None)]
#[command(version)]
struct Cli {
    /// File-watching backend to forward to the server
    #[arg(long)]
    watchman: Option<String>,

    /// Whether the server may auto-download its schema-introspection dependency
    #[arg(long)]
    auto_download_gql: Option<bool>,

    /// Path to the language-server executable (defaults to `graphql-lsp` on PATH)
    #[arg(long, value_name = "FILE")]
    server_path: Option<PathBuf>,

    /// Forward --debug to the server
    #[arg(long)]
    debug: bool,

    /// Content type of the simulated focused document
    #[arg(long, default_value = "graphql")]
    content_type: String,
}

/// Status-bar widget rendered as log lines.
#[derive(Default)]
struct TerminalIndicator {
    text: String,
    tooltip: String,
    visible: bool,
}

impl StatusIndicator for TerminalIndicator {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.tooltip = tooltip.to_string();
    }

    fn set_color(&mut self, _color: Option<&str>) {}

    fn set_command(&mut self, _command: &str) {}

    fn show(&mut self) {
        if !self.visible {
            self.visible = true;
        }
        tracing::info!(text = %self.text, tooltip = %self.tooltip, "status bar");
    }

    fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            tracing::info!("status bar hidden");
        }
    }
}

/// Editor surfaces mapped onto the terminal: notifications and the output
/// channel both land on stderr via tracing.
struct TerminalHost;

impl EditorHost for TerminalHost {
    fn show_error_message(&mut self, message: &str) {
        tracing::error!("{message}");
    }

    fn publish_diagnostics(&mut self, params: PublishDiagnosticsParams) {
        tracing::info!(
            uri = %params.uri.as_str(),
            count = params.diagnostics.len(),
            "diagnostics"
        );
        for diagnostic in &params.diagnostics {
            tracing::info!(
                "  {}:{} {}",
                diagnostic.range.start.line,
                diagnostic.range.start.character,
                diagnostic.message
            );
        }
    }

    fn append_output(&mut self, line: &str) {
        tracing::info!(target: "graphql_lsp_output", "{line}");
    }

    fn reveal_output(&mut self) {
        // The output stream is already interleaved on stderr.
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = ClientSettings {
        watchman: cli.watchman,
        auto_download_gql: cli.auto_download_gql,
        server_path: cli.server_path,
        debug: cli.debug,
    };

    let mut extension = Extension::activate(&settings, TerminalIndicator::default(), TerminalHost);
    extension.handle_focus_change(Some(&cli.content_type));

    // Single event-processing loop; ends when the bridge's threads hang up,
    // which means the server process is gone.
    let events = extension.events();
    while let Ok(event) = events.recv() {
        extension.handle_event(event);
    }

    tracing::info!(status = ?extension.status(), "bridge closed, deactivating");
    extension.deactivate();
    Ok(())
}
