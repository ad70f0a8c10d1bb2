//! # linetap
//!
//! Connects to a TCP endpoint that emits newline-delimited JSON and shows
//! each line as `message:` headers with indented `signal: value` pairs.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   apps/linetap (THE BINARY)               │
//! │                                                           │
//! │  ┌─────────────┐   ViewEvent    ┌──────────────────────┐  │
//! │  │  Session    │ ─────────────▶ │  TerminalView        │  │
//! │  │ (tokio task)│    (mpsc)      │  (stdout)            │  │
//! │  └──────┬──────┘                └──────────────────────┘  │
//! │         │                                                 │
//! │         ▼                                                 │
//! │  ┌──────────────────────────────────────────────────┐     │
//! │  │ linetap-core (address, frame, render, state)     │     │
//! │  └──────────────────────────────────────────────────┘     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Tap one endpoint
//! linetap connect 192.168.1.20 --port 8080
//!
//! # Type addresses on stdin to connect / disconnect
//! linetap interactive
//!
//! # Render a capture offline
//! linetap render -f capture.ndjson
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Logs go to stderr; stdout is the view.
    // LINETAP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LINETAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "linetap=debug,linetap_core=debug"
    } else {
        "linetap=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner to stderr.
fn print_banner() {
    eprintln!("linetap v{} - newline-delimited JSON tap", env!("CARGO_PKG_VERSION"));
}
