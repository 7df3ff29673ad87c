//! TCP accept loop: binds one socket per replica and hands each accepted
//! connection to the worker pool.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use triplex_wire::{read_message, write_message, Envelope};

use crate::error::{ServerError, ServerResult};
use crate::handler::dispatch;
use crate::replica_handle::ReplicaHandle;
use crate::worker_pool::{WorkerPool, WorkerPoolConfig};

/// Binds `handle`'s own address and serves connections until the process
/// is killed. Each connection is a single request/response: the client
/// (or the leader, forwarding) opens a socket, sends one [`Envelope`],
/// reads back one response, and closes it — matching the one-shot,
/// no-keepalive style of the RPC surface in spec §6.
pub fn serve(handle: Arc<ReplicaHandle>) -> ServerResult<()> {
    let address = handle.identity().own_address().to_string();
    let listener = TcpListener::bind(&address).map_err(|source| ServerError::BindFailed { addr: address.clone(), source })?;
    tracing::info!(replica = %handle.identity().id(), %address, "listening");

    let pool = WorkerPool::start(WorkerPoolConfig::default(), move |stream| handle_connection(&handle, stream));

    for incoming in listener.incoming() {
        match incoming {
            Ok(stream) => {
                if let Err(rejected) = pool.submit(stream) {
                    tracing::warn!("worker pool saturated, dropping connection");
                    drop(rejected);
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to accept connection"),
        }
    }

    Ok(())
}

fn handle_connection(handle: &ReplicaHandle, mut stream: TcpStream) {
    let envelope: Envelope = match read_message(&mut stream) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::debug!(error = %err, "failed to read request");
            return;
        }
    };

    let response = dispatch(handle, envelope);

    if let Err(err) = write_message(&mut stream, &response) {
        tracing::debug!(error = %err, "failed to write response");
    }
}
