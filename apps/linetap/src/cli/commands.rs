//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use linetap::{Session, SessionEnd, TerminalView};
use linetap_core::frame::read_budget;
use linetap_core::{
    Action, ButtonLabel, Config, Controller, Frame, LinetapError, Status, ViewEvent, decode_line,
    validate_ipv4,
};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it
/// names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, LinetapError> {
    let canonical = path.canonicalize().map_err(|e| {
        LinetapError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LinetapError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// CONNECT COMMAND
// =============================================================================

/// Tap one endpoint until it closes, fails, or Ctrl+C is pressed.
pub async fn cmd_connect(
    config: &Config,
    json_mode: bool,
    address: &str,
) -> Result<(), LinetapError> {
    let mut view = TerminalView::new(std::io::stdout(), json_mode);
    run_connect(config, address, &mut view, tokio::signal::ctrl_c()).await
}

/// Run one session to `address`, showing its events on `view`.
///
/// When `interrupt` resolves the session is asked to disconnect; the
/// function still returns only after the session has posted its last event.
async fn run_connect<W, F>(
    config: &Config,
    address: &str,
    view: &mut TerminalView<W>,
    interrupt: F,
) -> Result<(), LinetapError>
where
    W: Write,
    F: Future<Output = std::io::Result<()>>,
{
    let ip = match validate_ipv4(address) {
        Ok(ip) => ip,
        Err(e) => {
            view.show_status(e.into())?;
            return Err(e.into());
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = Session::start(ip, config, tx);
    let mut interrupted = false;
    tokio::pin!(interrupt);

    // The channel closes once the session task has posted its last event.
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => view.show(&event)?,
                None => break,
            },
            result = &mut interrupt, if !interrupted => {
                result?;
                tracing::info!("Interrupted, disconnecting");
                session.disconnect();
                interrupted = true;
            }
        }
    }

    match session.join().await {
        SessionEnd::Failed(msg) => Err(LinetapError::IoError(msg)),
        _ => Ok(()),
    }
}

// =============================================================================
// INTERACTIVE COMMAND
// =============================================================================

/// Drive the connect button from stdin.
pub async fn cmd_interactive(config: &Config, json_mode: bool) -> Result<(), LinetapError> {
    let mut view = TerminalView::new(std::io::stdout(), json_mode);

    if !json_mode {
        eprintln!("Type an IPv4 address to connect, any line to disconnect, 'quit' to exit.");
    }
    run_interactive(config, BufReader::new(tokio::io::stdin()), &mut view).await
}

/// Each line of `input` is one press of the connect button with that line
/// as the address field. `quit` or `exit` (or end of input) stops,
/// disconnecting first and showing the last session's final events.
async fn run_interactive<R, W>(
    config: &Config,
    input: R,
    view: &mut TerminalView<W>,
) -> Result<(), LinetapError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut controller = Controller::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session: Option<Session> = None;
    let mut lines = input.lines();

    view.show(&ViewEvent::Button(ButtonLabel::Connect))?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if matches!(line.trim(), "quit" | "exit") {
                    break;
                }
                match controller.press_connect(&line) {
                    Action::Connect(ip) => {
                        controller.mark_connecting();
                        session = Some(Session::start(ip, config, tx.clone()));
                    }
                    Action::Disconnect => {
                        if let Some(active) = &session {
                            active.disconnect();
                        }
                    }
                    Action::Reject(status) => view.show_status(status)?,
                }
            }
            Some(event) = rx.recv() => {
                controller.observe(&event);
                view.show(&event)?;
            }
        }
    }

    if let Some(active) = session.take() {
        active.disconnect();
        let end = active.join().await;
        tracing::debug!(?end, "Session closed on exit");
    }

    // Flush whatever the last session posted.
    drop(tx);
    while let Some(event) = rx.recv().await {
        view.show(&event)?;
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Validate an address and report the result.
pub fn cmd_check(json_mode: bool, address: &str) -> Result<(), LinetapError> {
    let result = validate_ipv4(address);

    if json_mode {
        let output = match &result {
            Ok(ip) => serde_json::json!({
                "input": address,
                "valid": true,
                "address": ip.to_string(),
            }),
            Err(e) => serde_json::json!({
                "input": address,
                "valid": false,
                "error": e.to_string(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else {
        match &result {
            Ok(ip) => println!("Valid address: {}", ip),
            Err(e) => println!("{}", Status::from(*e)),
        }
    }

    result.map(|_| ()).map_err(LinetapError::from)
}

// =============================================================================
// RENDER COMMAND
// =============================================================================

/// Render NDJSON lines from a file or stdin.
pub fn cmd_render(
    config: &Config,
    json_mode: bool,
    file: Option<&Path>,
) -> Result<(), LinetapError> {
    let mut view = TerminalView::new(std::io::stdout(), json_mode);

    let count = match file {
        Some(path) => {
            let path = validate_file_path(path)?;
            let reader = std::io::BufReader::new(std::fs::File::open(&path)?);
            render_lines(reader, config, &mut view)?
        }
        None => render_lines(std::io::stdin().lock(), config, &mut view)?,
    };

    tracing::debug!(count, "Rendered frames");
    Ok(())
}

/// Render every line of `reader` as a frame. Returns the number of frames.
fn render_lines<R: BufRead, W: Write>(
    mut reader: R,
    config: &Config,
    view: &mut TerminalView<W>,
) -> Result<usize, LinetapError> {
    let budget = read_budget(config.max_line_bytes);
    let options = config.render_options();
    let mut buf = Vec::new();
    let mut count = 0;

    loop {
        buf.clear();
        if reader.by_ref().take(budget).read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = decode_line(&buf, config.max_line_bytes)?;
        view.show(&ViewEvent::Frame(Frame::from_line(line, options)))?;
        count += 1;
    }

    Ok(count)
}
