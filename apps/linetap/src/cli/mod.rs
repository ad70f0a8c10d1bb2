//! # linetap CLI Module
//!
//! ## Available Commands
//!
//! - `connect` - Tap one endpoint until it closes or Ctrl+C
//! - `interactive` - Connect/disconnect from stdin (default)
//! - `check` - Validate an address
//! - `render` - Render NDJSON from a file or stdin without a socket

mod commands;

use clap::{Parser, Subcommand};
use linetap_core::{Config, LinetapError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// linetap - watch newline-delimited JSON from a TCP endpoint
///
/// Each received line is shown as `message:` headers with indented
/// `signal: value` pairs, followed by the raw line.
#[derive(Parser, Debug)]
#[command(name = "linetap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output one JSON object per event (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to an endpoint and show frames until it closes
    Connect {
        /// IPv4 address of the endpoint
        address: String,

        /// Port to connect to (overrides the configuration file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Hide the raw line under each frame
        #[arg(long)]
        no_raw: bool,
    },

    /// Read addresses from stdin; each line presses the connect button
    Interactive {
        /// Port to connect to (overrides the configuration file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate an IPv4 address
    Check {
        /// Address to validate
        address: String,
    },

    /// Render NDJSON lines without connecting
    Render {
        /// Input file (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Hide the raw line under each frame
        #[arg(long)]
        no_raw: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LinetapError> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Connect {
            address,
            port,
            no_raw,
        }) => {
            let config = with_overrides(config, port, no_raw)?;
            cmd_connect(&config, json_mode, &address).await
        }
        Some(Commands::Interactive { port }) => {
            let config = with_overrides(config, port, false)?;
            cmd_interactive(&config, json_mode).await
        }
        Some(Commands::Check { address }) => cmd_check(json_mode, &address),
        Some(Commands::Render { file, no_raw }) => {
            let config = with_overrides(config, None, no_raw)?;
            cmd_render(&config, json_mode, file.as_deref())
        }
        None => cmd_interactive(&config, json_mode).await,
    }
}

/// Apply command-line overrides on top of the loaded configuration.
fn with_overrides(
    mut config: Config,
    port: Option<u16>,
    no_raw: bool,
) -> Result<Config, LinetapError> {
    if let Some(port) = port {
        config.port = port;
    }
    if no_raw {
        config.show_raw = false;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_override_applies() {
        let config = with_overrides(Config::default(), Some(9001), true).expect("valid");
        assert_eq!(config.port, 9001);
        assert!(!config.show_raw);
    }

    #[test]
    fn zero_port_override_rejected() {
        assert!(with_overrides(Config::default(), Some(0), false).is_err());
    }

    #[test]
    fn parses_connect_command() {
        let cli = Cli::parse_from(["linetap", "--json-mode", "connect", "10.0.0.5", "-p", "7000"]);
        assert!(cli.json_mode);
        match cli.command {
            Some(Commands::Connect { address, port, .. }) => {
                assert_eq!(address, "10.0.0.5");
                assert_eq!(port, Some(7000));
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::parse_from(["linetap", "-q"]);
        assert!(cli.quiet);
        assert!(cli.command.is_none());
    }
}
