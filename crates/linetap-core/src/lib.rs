//! # linetap-core
//!
//! The synchronous logic behind linetap - THE LOGIC.
//!
//! linetap taps a TCP endpoint that emits newline-delimited JSON and shows
//! the latest frame as `message -> signal: value` pairs. Everything that does
//! not touch a socket lives here:
//!
//! - `address` → validating the address typed into the connect form
//! - `frame` → turning raw line bytes into text lines
//! - `render` → the key/value view of a frame
//! - `state` → connection state, status text, connect-button decisions
//! - `config` → TOML configuration
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network dependencies (the binary owns I/O)
//! - Rendering never fails; malformed input becomes an error view

// =============================================================================
// MODULES
// =============================================================================

pub mod address;
pub mod config;
pub mod frame;
pub mod primitives;
pub mod render;
pub mod state;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use address::{AddressError, validate_ipv4};
pub use config::Config;
pub use frame::decode_line;
pub use render::{RenderOptions, Rendered, render_line};
pub use state::{Action, ButtonLabel, ConnectionState, Controller, Status};
pub use types::{Frame, LinetapError, ViewEvent};
