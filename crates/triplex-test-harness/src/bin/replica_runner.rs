//! `triplex-replica-runner <id> <ip0> <ip1> <ip2> [--data-dir DIR] [--port N]`
//!
//! Identical to `triplex-server`'s own binary — this crate just needs its
//! own copy so `CARGO_BIN_EXE_triplex-replica-runner` is set when its
//! integration tests spawn real replica subprocesses (see `cluster.rs`).

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use triplex_config::ServerArgs;
use triplex_replica::ReplicaIdentity;
use triplex_server::ReplicaHandle;

fn main() -> ExitCode {
    let args = ServerArgs::parse();

    let replica_id = match args.replica_id() {
        Ok(id) => id,
        Err(err) => {
            eprintln!("invalid arguments: {err}");
            return ExitCode::FAILURE;
        }
    };
    let addresses = match args.peer_addresses() {
        Ok(addresses) => addresses,
        Err(err) => {
            eprintln!("invalid arguments: {err}");
            return ExitCode::FAILURE;
        }
    };

    let identity = ReplicaIdentity::new(replica_id, addresses, args.data_dir.clone());
    let handle = match ReplicaHandle::load(identity) {
        Ok(handle) => Arc::new(handle),
        Err(err) => {
            eprintln!("failed to load durable snapshot: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = triplex_server::serve(handle) {
        eprintln!("server exited: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
