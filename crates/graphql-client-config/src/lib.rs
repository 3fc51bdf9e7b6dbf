//! Editor-provided settings for the GraphQL language client.
//!
//! The editor hands the client a small settings payload at activation time.
//! Every value is optional with a documented default, so reading settings
//! cannot fail: unknown keys are ignored and malformed payloads fall back to
//! the defaults. The values are forwarded verbatim to the language-server
//! process as startup arguments; nothing here is re-read after activation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The language-server executable launched when no explicit override is
/// configured. Resolved on `PATH`.
pub const DEFAULT_SERVER_PROGRAM: &str = "graphql-lsp";

/// Settings read once from the editor at activation.
///
/// Keys use the editor's camel-case convention (`autoDownloadGql`,
/// `serverPath`). All fields are optional; absent keys take the defaults
/// documented per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSettings {
    /// File-watching backend the server should use. Forwarded as
    /// `--watchman=<value>` when present; when absent the server picks its
    /// own backend and no flag is passed.
    pub watchman: Option<String>,

    /// Whether the server may download its schema-introspection dependency
    /// automatically. Forwarded as `--auto-download-gql=<bool>` when
    /// present; the server defaults to `true` when the flag is omitted.
    pub auto_download_gql: Option<bool>,

    /// Explicit path to the language-server executable, overriding
    /// [`DEFAULT_SERVER_PROGRAM`].
    pub server_path: Option<PathBuf>,

    /// Debug mode. Forwarded as `--debug` when `true`. Defaults to `false`.
    pub debug: bool,
}

impl ClientSettings {
    /// Parse settings from the editor's JSON payload.
    ///
    /// Unknown keys are ignored; a payload that does not deserialize at all
    /// yields the defaults. Settings reads never fail.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The executable to launch: the configured override, or
    /// [`DEFAULT_SERVER_PROGRAM`].
    #[must_use]
    pub fn server_program(&self) -> &Path {
        self.server_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SERVER_PROGRAM))
    }

    /// The startup arguments forwarded to the server process.
    ///
    /// Each optional setting contributes a flag only when it is present, so
    /// the server's own defaults apply otherwise.
    #[must_use]
    pub fn server_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(backend) = &self.watchman {
            args.push(format!("--watchman={backend}"));
        }
        if let Some(auto) = self.auto_download_gql {
            args.push(format!("--auto-download-gql={auto}"));
        }
        if self.debug {
            args.push("--debug".to_string());
        }
        args
    }
}
