//! # linetap
//!
//! Library side of the linetap binary: the TCP session and the terminal
//! view. Exposed so integration tests can drive a session against a local
//! listener.

pub mod client;
pub mod view;

pub use client::{EventSender, Session, SessionEnd, read_frames};
pub use view::TerminalView;
