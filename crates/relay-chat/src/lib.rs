//! Shared glue for the `relay-server` and `relay-client` binaries:
//! argument definitions, argument parsing with the documented exit
//! status, terminal input forwarding and logging setup.

use std::io::BufRead;

use clap::error::ErrorKind;
use clap::Parser;
use relay::ClientSender;

/// Arguments of `relay-server`.
#[derive(Parser, Debug)]
#[command(name = "relay-server", version, about = "Relay every message to all other connected peers")]
pub struct ServerArgs {
    /// TCP port to listen on (all interfaces).
    pub port: u16,
}

impl ServerArgs {
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Arguments of `relay-client`.
#[derive(Parser, Debug)]
#[command(name = "relay-client", version, about = "Chat through a relay server on this machine")]
pub struct ClientArgs {
    /// Port of the relay server on 127.0.0.1.
    pub port: u16,
}

impl ClientArgs {
    pub fn server_addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

/// Parses the process arguments, exiting with status 1 and a usage
/// message when they are missing or invalid.
///
/// `--help` and `--version` still print and exit with status 0.
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

/// Sends every line of `input` as one message, blank lines included,
/// until input ends or the client stops. Returns how many were queued.
pub fn forward_lines<R: BufRead>(input: R, sender: &ClientSender) -> usize {
    let mut sent = 0;
    for line in input.lines() {
        let Ok(line) = line else { break };
        if sender.send(line).is_err() {
            break;
        }
        sent += 1;
    }
    sent
}

/// Installs the `tracing` subscriber. Verbosity comes from `RUST_LOG`
/// and defaults to `info`. Logs go to stderr so they never mix with
/// chat text on stdout.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
