//! `triplex-server <id> <ip0> <ip1> <ip2>`
//!
//! Starts one replica of the 3-member chat cluster. `id` is this
//! replica's own index (0, 1, or 2); `ip0`/`ip1`/`ip2` are every replica's
//! address in id order, including this one's own.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use triplex_config::{init_tracing, ServerArgs};
use triplex_replica::ReplicaIdentity;
use triplex_server::ReplicaHandle;

fn main() -> ExitCode {
    init_tracing();
    let args = ServerArgs::parse();

    let replica_id = match args.replica_id() {
        Ok(id) => id,
        Err(err) => {
            tracing::error!(error = %err, "invalid arguments");
            return ExitCode::FAILURE;
        }
    };
    let addresses = match args.peer_addresses() {
        Ok(addresses) => addresses,
        Err(err) => {
            tracing::error!(error = %err, "invalid arguments");
            return ExitCode::FAILURE;
        }
    };

    let identity = ReplicaIdentity::new(replica_id, addresses, args.data_dir.clone());
    let handle = match ReplicaHandle::load(identity) {
        Ok(handle) => Arc::new(handle),
        Err(err) => {
            tracing::error!(error = %err, "failed to load durable snapshot");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = triplex_server::serve(handle) {
        tracing::error!(error = %err, "server exited");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
