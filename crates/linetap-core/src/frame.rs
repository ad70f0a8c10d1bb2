//! # Line Framing
//!
//! Turns raw bytes read up to a `\n` into a text line.
//!
//! - The terminator is `\n`, optionally preceded by `\r`
//! - Invalid UTF-8 is replaced, never rejected
//! - Lines longer than the configured limit are rejected
//!
//! The reader in the binary reads at most [`read_budget`] bytes per line, so
//! an over-long line is always seen here with at least `max + 1` content
//! bytes and rejected.

use crate::LinetapError;

/// Bytes to request from the socket for one line: the limit plus `\r\n`.
pub const fn read_budget(max_line_bytes: usize) -> u64 {
    max_line_bytes as u64 + 2
}

/// Decode one line read from the endpoint.
///
/// `bytes` is everything read for the line, terminator included when one
/// was seen. A final line without terminator is decoded the same way.
pub fn decode_line(bytes: &[u8], max_line_bytes: usize) -> Result<String, LinetapError> {
    let content = strip_terminator(bytes);

    if content.len() > max_line_bytes {
        return Err(LinetapError::LineTooLong {
            len: content.len(),
            max: max_line_bytes,
        });
    }

    Ok(String::from_utf8_lossy(content).into_owned())
}

fn strip_terminator(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}
