//! # triplex-config: CLI argument parsing and logging setup
//!
//! The cluster has no config file and no environment-driven overrides — its
//! entire configuration is the replica id and the three peer addresses
//! passed on the command line (spec §6). This crate is deliberately thin:
//! a `clap::Parser` struct per binary plus one shared `init_tracing`.

use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;
use triplex_types::ReplicaId;

/// Every replica listens on this port; only the host differs between
/// cluster members.
pub const REPLICA_PORT: u16 = 50051;

/// `triplex-server <id> <ip0> <ip1> <ip2>`
#[derive(Debug, Parser)]
#[command(name = "triplex-server", about = "A replica in a 3-node chat cluster")]
pub struct ServerArgs {
    /// This replica's id: 0, 1, or 2.
    pub id: u8,
    /// Replica 0's host (no port — every replica listens on 50051).
    pub ip0: String,
    /// Replica 1's host.
    pub ip1: String,
    /// Replica 2's host.
    pub ip2: String,
    /// Directory durable snapshots are written under.
    #[arg(long, default_value = ".")]
    pub data_dir: String,
    /// Port every replica listens on. Fixed at 50051 in normal operation
    /// (spec §6); overridable so the test harness can run several
    /// clusters side by side on one host without port collisions.
    #[arg(long, default_value_t = REPLICA_PORT)]
    pub port: u16,
}

impl ServerArgs {
    pub fn replica_id(&self) -> Result<ReplicaId, ConfigError> {
        ReplicaId::new(self.id).ok_or(ConfigError::InvalidReplicaId(self.id))
    }

    pub fn peer_addresses(&self) -> Result<[String; 3], ConfigError> {
        let port = self.port;
        let addrs = [format!("{}:{port}", self.ip0), format!("{}:{port}", self.ip1), format!("{}:{port}", self.ip2)];
        for addr in &addrs {
            addr.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidAddress(addr.clone()))?;
        }
        Ok(addrs)
    }
}

/// `triplex-client <ip0> <ip1> <ip2>`
#[derive(Debug, Parser)]
#[command(name = "triplex-client", about = "Interactive client for the triplex chat cluster")]
pub struct ClientArgs {
    pub ip0: String,
    pub ip1: String,
    pub ip2: String,
    /// Port every replica listens on. See [`ServerArgs::port`].
    #[arg(long, default_value_t = REPLICA_PORT)]
    pub port: u16,
}

impl ClientArgs {
    pub fn replica_addresses(&self) -> Result<[String; 3], ConfigError> {
        let port = self.port;
        let addrs = [format!("{}:{port}", self.ip0), format!("{}:{port}", self.ip1), format!("{}:{port}", self.ip2)];
        for addr in &addrs {
            addr.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidAddress(addr.clone()))?;
        }
        Ok(addrs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("replica id must be 0, 1, or 2, got {0}")]
    InvalidReplicaId(u8),
    #[error("{0} is not a valid host:port address")]
    InvalidAddress(String),
}

/// Initializes `tracing` the way every binary in this workspace does:
/// `RUST_LOG` if set, `info` otherwise.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}
