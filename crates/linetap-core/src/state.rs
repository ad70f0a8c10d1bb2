//! # Connection State
//!
//! The connect form has one button. While disconnected, pressing it
//! validates the address field and starts a session; otherwise it ends the
//! current one. [`Controller`] makes that decision and produces the view
//! events for each transition. It does no I/O.

use crate::address::{AddressError, validate_ipv4};
use crate::types::ViewEvent;
use std::fmt;
use std::net::Ipv4Addr;

// =============================================================================
// STATUS & LABELS
// =============================================================================

/// Text for the status line. `Display` includes the `Status: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    EmptyAddress,
    InvalidAddress,
    Connecting,
    Connected(Ipv4Addr),
    Error(String),
    Disconnected,
}

impl Status {
    /// The message without the `Status: ` prefix.
    pub fn message(&self) -> String {
        match self {
            Self::EmptyAddress => AddressError::Empty.to_string(),
            Self::InvalidAddress => AddressError::InvalidFormat.to_string(),
            Self::Connecting => "Connecting...".to_string(),
            Self::Connected(ip) => format!("Connected to {ip}"),
            Self::Error(msg) => format!("Error: {msg}"),
            Self::Disconnected => "Disconnected".to_string(),
        }
    }

    /// Short machine-readable name, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyAddress => "empty_address",
            Self::InvalidAddress => "invalid_address",
            Self::Connecting => "connecting",
            Self::Connected(_) => "connected",
            Self::Error(_) => "error",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status: {}", self.message())
    }
}

impl From<AddressError> for Status {
    fn from(e: AddressError) -> Self {
        match e {
            AddressError::Empty => Self::EmptyAddress,
            AddressError::InvalidFormat => Self::InvalidAddress,
        }
    }
}

/// Label of the connect button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonLabel {
    Connect,
    Disconnect,
}

impl fmt::Display for ButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("Connect to Server"),
            Self::Disconnect => f.write_str("Disconnect"),
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Where the single connection currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(Ipv4Addr),
}

impl ConnectionState {
    /// True once a connection attempt is under way or established.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

/// What a button press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start a session to this address.
    Connect(Ipv4Addr),
    /// End the current session.
    Disconnect,
    /// Stay disconnected and show this status.
    Reject(Status),
}

/// Tracks the connection state behind the connect button.
#[derive(Debug, Default)]
pub struct Controller {
    state: ConnectionState,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Decide what a press of the connect button does, given the current
    /// text of the address field. Does not change state.
    pub fn press_connect(&self, input: &str) -> Action {
        if self.state.is_active() {
            return Action::Disconnect;
        }
        match validate_ipv4(input) {
            Ok(ip) => Action::Connect(ip),
            Err(e) => Action::Reject(e.into()),
        }
    }

    /// Record that a session was just started, before its first event
    /// arrives, so a second press cannot start another one.
    pub fn mark_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// Apply an event posted by the session, keeping the state in step with
    /// what the view shows.
    pub fn observe(&mut self, event: &ViewEvent) {
        if let ViewEvent::Status(status) = event {
            match status {
                Status::Connecting => self.state = ConnectionState::Connecting,
                Status::Connected(ip) => self.state = ConnectionState::Connected(*ip),
                Status::Disconnected => self.state = ConnectionState::Disconnected,
                _ => {}
            }
        }
    }
}

/// Events posted when a connection attempt starts.
pub fn connecting_events() -> Vec<ViewEvent> {
    vec![ViewEvent::Status(Status::Connecting)]
}

/// Events posted once the socket is open.
pub fn connected_events(ip: Ipv4Addr) -> Vec<ViewEvent> {
    vec![
        ViewEvent::Status(Status::Connected(ip)),
        ViewEvent::Button(ButtonLabel::Disconnect),
    ]
}

/// Events posted when a session ends, optionally after an error.
pub fn disconnected_events(error: Option<String>) -> Vec<ViewEvent> {
    let mut events = Vec::with_capacity(3);
    if let Some(msg) = error {
        events.push(ViewEvent::Status(Status::Error(msg)));
    }
    events.push(ViewEvent::Status(Status::Disconnected));
    events.push(ViewEvent::Button(ButtonLabel::Connect));
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 7);

    #[test]
    fn status_texts() {
        assert_eq!(
            Status::EmptyAddress.to_string(),
            "Status: Please enter an IP address"
        );
        assert_eq!(Status::InvalidAddress.to_string(), "Status: Invalid IP format");
        assert_eq!(Status::Connecting.to_string(), "Status: Connecting...");
        assert_eq!(
            Status::Connected(IP).to_string(),
            "Status: Connected to 192.168.0.7"
        );
        assert_eq!(
            Status::Error("Connection refused".into()).to_string(),
            "Status: Error: Connection refused"
        );
        assert_eq!(Status::Disconnected.to_string(), "Status: Disconnected");
    }

    #[test]
    fn button_labels() {
        assert_eq!(ButtonLabel::Connect.to_string(), "Connect to Server");
        assert_eq!(ButtonLabel::Disconnect.to_string(), "Disconnect");
    }

    #[test]
    fn press_while_disconnected_validates() {
        let controller = Controller::new();
        assert_eq!(
            controller.press_connect(""),
            Action::Reject(Status::EmptyAddress)
        );
        assert_eq!(
            controller.press_connect("999.1.1.1"),
            Action::Reject(Status::InvalidAddress)
        );
        assert_eq!(
            controller.press_connect(" 192.168.0.7 "),
            Action::Connect(IP)
        );
    }

    #[test]
    fn press_while_active_disconnects() {
        let mut controller = Controller::new();
        controller.observe(&ViewEvent::Status(Status::Connecting));
        assert_eq!(controller.press_connect("garbage"), Action::Disconnect);

        controller.observe(&ViewEvent::Status(Status::Connected(IP)));
        assert_eq!(controller.state(), ConnectionState::Connected(IP));
        assert_eq!(controller.press_connect(""), Action::Disconnect);
    }

    #[test]
    fn mark_connecting_blocks_second_connect() {
        let mut controller = Controller::new();
        let Action::Connect(_) = controller.press_connect("10.0.0.1") else {
            unreachable!("valid address should connect");
        };
        controller.mark_connecting();
        assert_eq!(controller.press_connect("10.0.0.2"), Action::Disconnect);
    }

    #[test]
    fn error_status_does_not_disconnect_by_itself() {
        let mut controller = Controller::new();
        controller.observe(&ViewEvent::Status(Status::Connected(IP)));
        controller.observe(&ViewEvent::Status(Status::Error("reset".into())));
        assert!(controller.state().is_active());

        for event in disconnected_events(None) {
            controller.observe(&event);
        }
        assert_eq!(controller.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn session_end_events_end_with_connect_label() {
        let events = disconnected_events(Some("boom".into()));
        assert_eq!(
            events,
            vec![
                ViewEvent::Status(Status::Error("boom".into())),
                ViewEvent::Status(Status::Disconnected),
                ViewEvent::Button(ButtonLabel::Connect),
            ]
        );
    }

    #[test]
    fn connected_events_relabel_button() {
        assert_eq!(
            connected_events(IP).last(),
            Some(&ViewEvent::Button(ButtonLabel::Disconnect))
        );
        assert_eq!(connecting_events(), vec![ViewEvent::Status(Status::Connecting)]);
    }
}
