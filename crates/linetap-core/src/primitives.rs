//! # Fixed Primitives
//!
//! Constants compiled into the binary. Configuration may override the
//! defaults but never the hard limits.

/// Port the endpoint is expected to listen on when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Seconds to wait for the TCP handshake before giving up.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default upper bound for a single line, in bytes (1 MiB).
///
/// A peer that never sends a newline would otherwise grow the read
/// buffer without bound.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Hard ceiling for `max_line_bytes` (64 MiB).
pub const MAX_LINE_BYTES_CEILING: usize = 64 * 1024 * 1024;

/// Number of dot-separated octets in an IPv4 address.
pub const IPV4_OCTETS: usize = 4;

/// Maximum digits in a single octet ("255", "010").
pub const MAX_OCTET_DIGITS: usize = 3;

/// Header placed between the rendered pairs and the raw line.
pub const RAW_HEADER: &str = "\n\nRaw JSON:\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_8080() {
        assert_eq!(DEFAULT_PORT, 8080);
    }

    #[test]
    fn default_line_limit_below_ceiling() {
        assert!(DEFAULT_MAX_LINE_BYTES <= MAX_LINE_BYTES_CEILING);
    }
}
