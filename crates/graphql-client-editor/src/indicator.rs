//! Pure rendering of the status indicator widget.
//!
//! The rendered indicator is a function of exactly two inputs: the current
//! [`ConnectionStatus`] and the focused document's content type. Rendering
//! is split into computing an [`IndicatorView`] (pure, tested directly) and
//! applying it to a widget behind the [`StatusIndicator`] seam.

use crate::status::{presentation, ConnectionStatus};

/// Content types for which the indicator is shown.
pub const RECOGNIZED_CONTENT_TYPES: [&str; 5] = [
    "graphql",
    "javascript",
    "javascript-react",
    "typescript",
    "typescript-react",
];

/// The command bound to the indicator; reveals the diagnostic output stream.
pub const SHOW_OUTPUT_COMMAND: &str = "graphql.showOutputChannel";

/// A fully computed render of the indicator widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorView {
    pub text: String,
    pub tooltip: &'static str,
    pub color: Option<&'static str>,
    pub command: &'static str,
    pub visible: bool,
}

/// Compute the indicator render for a status and focused document.
///
/// Pure and idempotent: the same inputs always yield the same view, and
/// applying the same view twice leaves the widget unchanged.
#[must_use]
pub fn update_indicator(status: ConnectionStatus, document: Option<&str>) -> IndicatorView {
    let presentation = presentation(status);
    IndicatorView {
        text: format!("$({}) GraphQL", presentation.icon),
        tooltip: presentation.tooltip,
        color: presentation.color,
        command: SHOW_OUTPUT_COMMAND,
        visible: document.is_some_and(|content_type| {
            RECOGNIZED_CONTENT_TYPES.contains(&content_type)
        }),
    }
}

/// The editor's status-bar widget seam. The hosting editor supplies the
/// implementation; tests use a recording fake.
pub trait StatusIndicator {
    fn set_text(&mut self, text: &str);
    fn set_tooltip(&mut self, tooltip: &str);
    fn set_color(&mut self, color: Option<&str>);
    fn set_command(&mut self, command: &str);
    fn show(&mut self);
    fn hide(&mut self);
}

/// Drive a widget from a computed view.
pub fn apply_view(widget: &mut dyn StatusIndicator, view: &IndicatorView) {
    widget.set_text(&view.text);
    widget.set_tooltip(view.tooltip);
    widget.set_color(view.color);
    widget.set_command(view.command);
    if view.visible {
        widget.show();
    } else {
        widget.hide();
    }
}
