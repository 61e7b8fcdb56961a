//! Command line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

/// DAP registry server.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the registry over HTTP.
    Serve(ServeArgs),

    /// Generate a `did:web` operator identity for DOMAIN and print it as a
    /// portable DID.
    CreateDid {
        /// Host (and optional path) the registry is served from.
        domain: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "DAP_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Directory of the registration database. Registrations are kept in
    /// memory when unset.
    #[arg(long, env = "DAP_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Seconds allowed for fetching a signer's `did:web` document.
    #[arg(long, env = "DAP_RESOLVE_TIMEOUT_SECS", default_value_t = 10)]
    pub resolve_timeout_secs: u64,
}

impl ServeArgs {
    pub const fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }
}
