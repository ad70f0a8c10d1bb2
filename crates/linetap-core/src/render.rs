//! # Frame Rendering
//!
//! Renders one received line into the text shown in the data view.
//!
//! A frame is a JSON object of messages, each message an object of signals:
//!
//! ```text
//! {"engine":{"rpm":3100,"temp":88.5},"doors":{"front_left":"open"}}
//! ```
//!
//! renders as
//!
//! ```text
//! engine:
//!   rpm: 3100
//!   temp: 88.5
//! doors:
//!   front_left: open
//!
//!
//! Raw JSON:
//! {"engine":{"rpm":3100,"temp":88.5},"doors":{"front_left":"open"}}
//! ```
//!
//! Keys keep document order. Anything that is not an object of objects is
//! shown as a parse error together with the line as received.

use crate::primitives::RAW_HEADER;
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Knobs for [`render_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append the raw line under a `Raw JSON:` header.
    pub show_raw: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_raw: true }
    }
}

/// Outcome of rendering a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The line was a message object; `text` is the key/value view.
    Pairs { text: String },
    /// The line could not be shown as pairs.
    Error { text: String, reason: String },
}

impl Rendered {
    /// The text to put in the view.
    pub fn text(&self) -> &str {
        match self {
            Self::Pairs { text } | Self::Error { text, .. } => text,
        }
    }

    pub fn is_pairs(&self) -> bool {
        matches!(self, Self::Pairs { .. })
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Pairs { text } | Self::Error { text, .. } => text,
        }
    }
}

/// Render a received line. Never fails.
pub fn render_line(line: &str, options: RenderOptions) -> Rendered {
    match format_pairs(line) {
        Ok(mut text) => {
            if options.show_raw {
                text.push_str(RAW_HEADER);
                text.push_str(line);
            }
            Rendered::Pairs { text }
        }
        Err(reason) => Rendered::Error {
            text: format!("Received: {line}\n\n(Error parsing JSON: {reason})"),
            reason,
        },
    }
}

fn format_pairs(line: &str) -> Result<String, String> {
    let root: Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
    let messages = root
        .as_object()
        .ok_or_else(|| format!("expected an object, found {}", kind(&root)))?;

    let mut out = String::new();
    for (message_key, message) in messages {
        let signals = message
            .as_object()
            .ok_or_else(|| format!("value of \"{message_key}\" is not an object"))?;
        write_message(&mut out, message_key, signals);
    }
    Ok(out)
}

fn write_message(out: &mut String, message_key: &str, signals: &Map<String, Value>) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{message_key}:");
    for (signal_key, value) in signals {
        let _ = writeln!(out, "  {signal_key}: {}", display_value(value));
    }
}

/// Strings are shown bare; everything else in its JSON form.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_RAW: RenderOptions = RenderOptions { show_raw: false };

    #[test]
    fn renders_messages_in_document_order() {
        let line = r#"{"zeta":{"b":1,"a":2},"alpha":{"x":"on"}}"#;
        let rendered = render_line(line, NO_RAW);
        assert!(rendered.is_pairs());
        assert_eq!(rendered.text(), "zeta:\n  b: 1\n  a: 2\nalpha:\n  x: on\n");
    }

    #[test]
    fn appends_raw_json() {
        let line = r#"{"m":{"s":true}}"#;
        let rendered = render_line(line, RenderOptions::default());
        assert_eq!(
            rendered.text(),
            "m:\n  s: true\n\n\nRaw JSON:\n{\"m\":{\"s\":true}}"
        );
    }

    #[test]
    fn value_forms() {
        let line = r#"{"m":{"str":"x y","num":-1.5,"nil":null,"arr":[1,"a"],"obj":{"k":2}}}"#;
        let text = render_line(line, NO_RAW).into_text();
        assert_eq!(
            text,
            "m:\n  str: x y\n  num: -1.5\n  nil: null\n  arr: [1,\"a\"]\n  obj: {\"k\":2}\n"
        );
    }

    #[test]
    fn empty_object_renders_nothing() {
        let rendered = render_line("{}", NO_RAW);
        assert_eq!(rendered, Rendered::Pairs { text: String::new() });
    }

    #[test]
    fn invalid_json_shows_error_view() {
        let rendered = render_line("not json", RenderOptions::default());
        let Rendered::Error { text, reason } = rendered else {
            unreachable!("expected error view");
        };
        assert!(text.starts_with("Received: not json\n\n(Error parsing JSON: "));
        assert!(text.ends_with(')'));
        assert!(!reason.is_empty());
    }

    #[test]
    fn non_object_root_is_error() {
        let rendered = render_line("[1,2]", NO_RAW);
        assert_eq!(
            rendered.text(),
            "Received: [1,2]\n\n(Error parsing JSON: expected an object, found an array)"
        );
    }

    #[test]
    fn flat_object_is_error() {
        let rendered = render_line(r#"{"speed":12}"#, NO_RAW);
        assert!(!rendered.is_pairs());
        assert!(rendered.text().contains("value of \"speed\" is not an object"));
    }

    #[test]
    fn empty_line_is_error() {
        assert!(!render_line("", NO_RAW).is_pairs());
    }
}
