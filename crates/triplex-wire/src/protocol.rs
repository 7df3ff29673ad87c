//! The envelope every RPC travels in, and the blocking transport that
//! carries it.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use triplex_replica::{Command, CommandResponse};

use crate::error::WireError;
use crate::frame::{read_message, write_message};

/// A request on the wire. `is_client` is the routing flag a replica uses
/// to tell a client-originated call (which may need leader self-promotion
/// and forwarding) from a replication call forwarded by the leader (which
/// a follower must only apply locally).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub is_client: bool,
    pub command: Command,
}

impl Envelope {
    pub fn from_client(command: Command) -> Self {
        Self { is_client: true, command }
    }

    pub fn forwarded(command: Command) -> Self {
        Self { is_client: false, command }
    }
}

/// Connects to `addr`, sends `envelope`, and waits for a response — all
/// within a single deadline covering connect, write, and read. This is the
/// one transport primitive both the client library's failover loop and the
/// leader's forward-to-followers step build on (spec: "the only timeout is
/// a 1-second deadline on every call").
pub fn call(addr: impl ToSocketAddrs, envelope: &Envelope, deadline: Duration) -> Result<CommandResponse, WireError> {
    let addr = addr
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| WireError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, "no socket address")))?;

    let mut stream = TcpStream::connect_timeout(&addr, deadline).map_err(|err| {
        tracing::debug!(%addr, error = %err, "connect failed");
        if err.kind() == std::io::ErrorKind::TimedOut {
            WireError::Timeout(addr.to_string())
        } else {
            WireError::Io(err)
        }
    })?;
    stream.set_read_timeout(Some(deadline))?;
    stream.set_write_timeout(Some(deadline))?;
    stream.set_nodelay(true)?;

    write_message(&mut stream, envelope)?;
    read_message(&mut stream).map_err(|err| match err {
        WireError::Io(io_err) if would_block_or_timed_out(&io_err) => WireError::Timeout(addr.to_string()),
        other => other,
    })
}

fn would_block_or_timed_out(err: &std::io::Error) -> bool {
    matches!(err.kind(), std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock)
}
