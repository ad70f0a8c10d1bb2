//! # Terminal View
//!
//! The only consumer of view events. Text mode prints the status line,
//! button relabels and each frame under a separator; JSON mode prints one
//! object per event.

use linetap_core::{Status, ViewEvent};
use std::io::{self, Write};

const SEPARATOR: &str = "----------------------------------------";

/// Writes view events to `out`.
pub struct TerminalView<W: Write> {
    out: W,
    json_mode: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, json_mode: bool) -> Self {
        Self { out, json_mode }
    }

    /// Show one event.
    pub fn show(&mut self, event: &ViewEvent) -> io::Result<()> {
        if self.json_mode {
            let value = event_json(event);
            writeln!(self.out, "{}", value)?;
        } else {
            match event {
                ViewEvent::Status(status) => writeln!(self.out, "{}", status)?,
                ViewEvent::Button(label) => writeln!(self.out, "[{}]", label)?,
                ViewEvent::Frame(frame) => {
                    writeln!(self.out, "{}", SEPARATOR)?;
                    write!(self.out, "{}", frame.text)?;
                    if !frame.text.ends_with('\n') {
                        writeln!(self.out)?;
                    }
                }
            }
        }
        self.out.flush()
    }

    /// Shortcut for a status-only event.
    pub fn show_status(&mut self, status: Status) -> io::Result<()> {
        self.show(&ViewEvent::Status(status))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn event_json(event: &ViewEvent) -> serde_json::Value {
    match event {
        ViewEvent::Status(status) => serde_json::json!({
            "event": "status",
            "kind": status.kind(),
            "message": status.message(),
        }),
        ViewEvent::Button(label) => serde_json::json!({
            "event": "button",
            "label": label.to_string(),
        }),
        ViewEvent::Frame(frame) => serde_json::json!({
            "event": "frame",
            "parsed": frame.parsed,
            "raw": frame.raw,
            "text": frame.text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linetap_core::{ButtonLabel, Frame, RenderOptions};
    use std::net::Ipv4Addr;

    fn render(events: &[ViewEvent], json_mode: bool) -> String {
        let mut view = TerminalView::new(Vec::new(), json_mode);
        for event in events {
            view.show(event).expect("show");
        }
        String::from_utf8(view.into_inner()).expect("utf8")
    }

    #[test]
    fn text_mode_lines() {
        let frame = Frame::from_line(
            r#"{"m":{"s":1}}"#.to_string(),
            RenderOptions { show_raw: false },
        );
        let out = render(
            &[
                ViewEvent::Status(Status::Connected(Ipv4Addr::new(10, 0, 0, 1))),
                ViewEvent::Button(ButtonLabel::Disconnect),
                ViewEvent::Frame(frame),
            ],
            false,
        );
        assert_eq!(
            out,
            format!("Status: Connected to 10.0.0.1\n[Disconnect]\n{SEPARATOR}\nm:\n  s: 1\n")
        );
    }

    #[test]
    fn frame_text_always_ends_with_newline() {
        let frame = Frame::from_line("bad".to_string(), RenderOptions::default());
        let out = render(&[ViewEvent::Frame(frame)], false);
        assert!(out.ends_with(")\n"));
    }

    #[test]
    fn json_mode_one_object_per_event() {
        let out = render(
            &[
                ViewEvent::Status(Status::Error("refused".into())),
                ViewEvent::Button(ButtonLabel::Connect),
            ],
            true,
        );
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).expect("json"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["kind"], "error");
        assert_eq!(lines[0]["message"], "Error: refused");
        assert_eq!(lines[1]["label"], "Connect to Server");
    }
}
