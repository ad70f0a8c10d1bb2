//! # TCP Session
//!
//! One background task per connection. The task connects, reads lines
//! until the peer closes, an error occurs or a disconnect is requested, and
//! posts every state change and frame to the view channel. It never writes
//! to the terminal itself.
//!
//! Every session, however it ends, posts `Status::Disconnected` followed by
//! the `Connect` button label as its last events.

use linetap_core::frame::read_budget;
use linetap_core::state::{connected_events, connecting_events, disconnected_events};
use linetap_core::{Config, Frame, LinetapError, ViewEvent, decode_line};
use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Channel the session posts view events on.
pub type EventSender = mpsc::UnboundedSender<ViewEvent>;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed the connection.
    Closed,
    /// A disconnect was requested.
    Disconnected,
    /// Connecting or reading failed.
    Failed(String),
    /// The view stopped listening.
    ViewGone,
}

/// Handle to a running session.
///
/// Dropping the handle also ends the session.
pub struct Session {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<SessionEnd>,
}

impl Session {
    /// Spawn a session to `ip` on the configured port.
    pub fn start(ip: Ipv4Addr, config: &Config, events: EventSender) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(ip, config.clone(), events, shutdown_rx));
        Self { shutdown, task }
    }

    /// Ask the session to close its socket and end.
    pub fn disconnect(&self) {
        // Err only if the task already ended.
        let _ = self.shutdown.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end.
    pub async fn join(self) -> SessionEnd {
        // Keep the sender alive until the task is done so it is not read as
        // a disconnect request.
        let Self { shutdown, task } = self;
        let end = task
            .await
            .unwrap_or_else(|e| SessionEnd::Failed(format!("session task failed: {e}")));
        drop(shutdown);
        end
    }
}

async fn run(
    ip: Ipv4Addr,
    config: Config,
    events: EventSender,
    mut shutdown: watch::Receiver<bool>,
) -> SessionEnd {
    let end = connect_and_read(ip, &config, &events, &mut shutdown).await;

    match &end {
        SessionEnd::Failed(msg) => tracing::warn!(%ip, "Session failed: {}", msg),
        other => tracing::info!(%ip, "Session ended: {:?}", other),
    }

    if end != SessionEnd::ViewGone {
        let error = match &end {
            SessionEnd::Failed(msg) => Some(msg.clone()),
            _ => None,
        };
        // The view may already be gone; nothing left to tell it then.
        let _ = post_all(&events, disconnected_events(error));
    }
    end
}

async fn connect_and_read(
    ip: Ipv4Addr,
    config: &Config,
    events: &EventSender,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd {
    if post_all(events, connecting_events()).is_err() {
        return SessionEnd::ViewGone;
    }

    let addr = SocketAddrV4::new(ip, config.port);
    tracing::debug!(%addr, "Connecting");

    let stream = tokio::select! {
        () = wait_for_shutdown(shutdown) => return SessionEnd::Disconnected,
        result = tokio::time::timeout(config.connect_timeout(), TcpStream::connect(addr)) => {
            match result {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => return SessionEnd::Failed(LinetapError::from(e).to_string()),
                Err(_) => {
                    return SessionEnd::Failed(
                        LinetapError::Timeout(config.connect_timeout_secs).to_string(),
                    );
                }
            }
        }
    };

    tracing::info!(%addr, "Connected");
    if post_all(events, connected_events(ip)).is_err() {
        return SessionEnd::ViewGone;
    }

    read_frames(stream, config, events, shutdown).await
}

/// Read lines from `reader` and post each as a rendered frame.
///
/// Returns when the reader hits EOF, a read fails, a line exceeds
/// `max_line_bytes`, or `shutdown` flips to true. Does not post the final
/// disconnect events.
pub async fn read_frames<R: AsyncRead + Unpin>(
    reader: R,
    config: &Config,
    events: &EventSender,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let budget = read_budget(config.max_line_bytes);
    let options = config.render_options();

    loop {
        buf.clear();
        let mut limited = (&mut reader).take(budget);
        let read = tokio::select! {
            () = wait_for_shutdown(shutdown) => return SessionEnd::Disconnected,
            read = limited.read_until(b'\n', &mut buf) => read,
        };

        match read {
            Ok(0) => return SessionEnd::Closed,
            Ok(_) => {}
            Err(e) => return SessionEnd::Failed(LinetapError::from(e).to_string()),
        }

        let line = match decode_line(&buf, config.max_line_bytes) {
            Ok(line) => line,
            Err(e) => return SessionEnd::Failed(e.to_string()),
        };
        tracing::trace!(bytes = buf.len(), "Line received");

        if events
            .send(ViewEvent::Frame(Frame::from_line(line, options)))
            .is_err()
        {
            return SessionEnd::ViewGone;
        }
    }
}

/// Resolves once a disconnect is requested or the handle is dropped.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

fn post_all(events: &EventSender, batch: Vec<ViewEvent>) -> Result<(), ()> {
    for event in batch {
        events.send(event).map_err(|_| ())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linetap_core::Status;

    fn config(max_line_bytes: usize) -> Config {
        Config {
            max_line_bytes,
            show_raw: false,
            ..Config::default()
        }
    }

    async fn read_all(input: &'static [u8], max: usize) -> (SessionEnd, Vec<ViewEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_stop, mut shutdown) = watch::channel(false);
        let end = read_frames(input, &config(max), &tx, &mut shutdown).await;
        drop(tx);
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        (end, events)
    }

    fn frame_texts(events: &[ViewEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Frame(frame) => Some(frame.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn each_line_becomes_a_frame() {
        let (end, events) = read_all(b"{\"a\":{\"x\":1}}\r\n{\"b\":{\"y\":2}}\n", 1024).await;
        assert_eq!(end, SessionEnd::Closed);
        assert_eq!(frame_texts(&events), vec!["a:\n  x: 1\n", "b:\n  y: 2\n"]);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_delivered() {
        let (end, events) = read_all(b"{\"a\":{\"x\":1}}", 1024).await;
        assert_eq!(end, SessionEnd::Closed);
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn overlong_line_fails_session() {
        let (end, events) = read_all(b"ok\n0123456789abcdef\n", 8).await;
        assert!(matches!(end, SessionEnd::Failed(msg) if msg.contains("exceeds limit")));
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn shutdown_stops_reading() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (stop, mut shutdown) = watch::channel(false);
        let (_writer, reader) = tokio::io::duplex(64);

        stop.send(true).expect("send");
        let end = read_frames(reader, &config(64), &tx, &mut shutdown).await;
        assert_eq!(end, SessionEnd::Disconnected);
    }

    #[tokio::test]
    async fn closed_view_ends_session() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let (_stop, mut shutdown) = watch::channel(false);
        let end = read_frames(&b"{}\n"[..], &config(64), &tx, &mut shutdown).await;
        assert_eq!(end, SessionEnd::ViewGone);
    }

    #[test]
    fn post_all_reports_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert!(post_all(&tx, vec![ViewEvent::Status(Status::Connecting)]).is_err());
    }
}
