//! # Core Type Definitions
//!
//! This module contains the types shared between the core and the binary:
//! - Received frames (`Frame`)
//! - Events posted to the view (`ViewEvent`)
//! - Error types (`LinetapError`)

use crate::address::AddressError;
use crate::render::{RenderOptions, render_line};
use crate::state::{ButtonLabel, Status};
use thiserror::Error;

// =============================================================================
// FRAME
// =============================================================================

/// One line received from the endpoint, with its rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The line as received, without its terminator.
    pub raw: String,
    /// Text that replaces the view content.
    pub text: String,
    /// Whether the line parsed as a message object.
    pub parsed: bool,
}

impl Frame {
    /// Render a received line into a frame.
    pub fn from_line(raw: String, options: RenderOptions) -> Self {
        let rendered = render_line(&raw, options);
        Self {
            parsed: rendered.is_pairs(),
            text: rendered.into_text(),
            raw,
        }
    }
}

// =============================================================================
// VIEW EVENTS
// =============================================================================

/// Everything the background session posts to the view.
///
/// The view is the only consumer; the session never touches it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Replace the status line.
    Status(Status),
    /// Relabel the connect button.
    Button(ButtonLabel),
    /// Replace the data view with a new frame.
    Frame(Frame),
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in linetap.
///
/// - No silent failures
/// - Use `Result<T, LinetapError>` for fallible operations
#[derive(Debug, Error)]
pub enum LinetapError {
    /// The address typed into the connect form was rejected.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// A line exceeded the configured byte limit.
    #[error("Line of {len} bytes exceeds limit of {max} bytes")]
    LineTooLong { len: usize, max: usize },

    /// The configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The TCP handshake did not finish in time.
    #[error("Connection timed out after {0}s")]
    Timeout(u64),

    /// An I/O error occurred.
    #[error("{0}")]
    IoError(String),
}

impl From<std::io::Error> for LinetapError {
    /// Keeps the OS description ("Connection refused") and drops the
    /// " (os error N)" suffix, which is noise in the status line.
    fn from(e: std::io::Error) -> Self {
        let message = e.to_string();
        let message = match (e.raw_os_error(), message.rfind(" (os error ")) {
            (Some(_), Some(idx)) => message[..idx].to_string(),
            _ => message,
        };
        Self::IoError(message)
    }
}
