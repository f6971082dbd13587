//! Client configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use scrawl_core::{CanvasConfig, ClearPolicy, Color};

/// Top-level configuration for the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Relay and topic selection.
    pub network: NetworkConfig,
    /// Canvas geometry and stroke constants shared with peers.
    pub canvas: CanvasConfig,
    /// Local drawing preferences.
    pub drawing: DrawingConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Relay base URL: `ws://`, `wss://` or `tcp://host:port`.
    pub server: String,
    /// Topic shared by every client drawing on the same canvas.
    pub topic: String,
    /// Identity token sent with the WebSocket upgrade.
    pub token: String,
    /// Connection timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Local drawing preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    /// Initial stroke color.
    pub color: Color,
    /// Whether a local clear waits for the relay echo.
    pub clear_policy: ClearPolicy,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server: "ws://127.0.0.1:8080".into(),
            topic: "draw.volatile".into(),
            token: String::new(),
            timeout_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

/// Where a [`ClientConfig`] came from.
///
/// Loading happens before the tracing subscriber exists, so the outcome
/// is returned for the caller to log once it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the file.
    File,
    /// No readable file; defaults in use.
    Missing(String),
    /// The file exists but is not valid; defaults in use.
    Invalid(String),
}

impl ConfigSource {
    /// Emit the outcome for `path` at a level matching its severity.
    pub fn log(&self, path: &Path) {
        match self {
            ConfigSource::File => tracing::info!("loaded config from {}", path.display()),
            ConfigSource::Missing(reason) => {
                tracing::info!("no config at {} ({reason}); using defaults", path.display())
            }
            ConfigSource::Invalid(reason) => {
                tracing::warn!("invalid config {}: {reason}; using defaults", path.display())
            }
        }
    }
}

impl ClientConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> (Self, ConfigSource) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(cfg) => (cfg, ConfigSource::File),
                Err(e) => (Self::default(), ConfigSource::Invalid(e.to_string())),
            },
            Err(e) => (Self::default(), ConfigSource::Missing(e.to_string())),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

// ── Tests ────────────────────────────────────────────────────────
