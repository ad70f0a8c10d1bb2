//! # Configuration
//!
//! Optional TOML file. Every key has a default, so an empty file is valid:
//!
//! ```toml
//! port = 8080
//! connect_timeout_secs = 10
//! max_line_bytes = 1048576
//! show_raw = true
//! ```
//!
//! Unknown keys are rejected so typos do not pass silently.

use crate::LinetapError;
use crate::primitives::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_LINE_BYTES, DEFAULT_PORT, MAX_LINE_BYTES_CEILING,
};
use crate::render::RenderOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Runtime settings for a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// TCP port of the endpoint.
    pub port: u16,
    /// Seconds allowed for the TCP handshake.
    pub connect_timeout_secs: u64,
    /// Longest accepted line, terminator excluded.
    pub max_line_bytes: usize,
    /// Echo the raw line below the rendered pairs.
    pub show_raw: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            show_raw: true,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, LinetapError> {
        let config: Self = toml::from_str(s).map_err(|e| LinetapError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, LinetapError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LinetapError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, LinetapError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), LinetapError> {
        if self.port == 0 {
            return Err(LinetapError::Config("port must be non-zero".to_string()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(LinetapError::Config(
                "connect_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES_CEILING {
            return Err(LinetapError::Config(format!(
                "max_line_bytes must be between 1 and {}",
                MAX_LINE_BYTES_CEILING
            )));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_raw: self.show_raw,
        }
    }
}
