//! The failover client's single send primitive (spec §4.4): one logical
//! stub that transparently advances to the next replica on timeout and
//! retries the same request.

use std::sync::Mutex;
use std::time::Duration;

use triplex_replica::{Command, CommandResponse};
use triplex_types::CLUSTER_SIZE;
use triplex_wire::{call, Envelope};

use crate::error::ClientError;

/// Deadline on every outbound call, including the retry against the next
/// candidate leader — the cluster's only timeout (spec §5).
pub const CALL_DEADLINE: Duration = Duration::from_secs(1);

/// The client's belief of which replica to contact, plus the full
/// address list. `curr_leader` only ever increases: once a replica is
/// abandoned the client never targets it again (spec: "LeaderView ...
/// monotonically non-decreasing").
struct LeaderView {
    addresses: [String; CLUSTER_SIZE as usize],
    curr_leader: usize,
}

/// One logical stub shared by [`crate::AuthClient`] and
/// [`crate::ChatClient`]. Both services live behind the same replica
/// process, so both route through the same `LeaderView` — a failover
/// discovered while sending a chat message also redirects the next auth
/// call.
///
/// `send` guards the whole leader view behind one mutex so that a
/// failover (advancing `curr_leader` and retrying) is atomic with
/// respect to any other thread calling `send` concurrently — spec
/// §4.4's "cross-cutting lock on the chat stub", generalized here to
/// cover both stubs since they share one view.
pub struct FailoverClient {
    view: Mutex<LeaderView>,
}

impl FailoverClient {
    /// `addresses[i]` is replica `i`'s `host:port`. A fresh client always
    /// starts out believing replica 0 is the leader (spec §6).
    pub fn new(addresses: [String; CLUSTER_SIZE as usize]) -> Self {
        Self { view: Mutex::new(LeaderView { addresses, curr_leader: 0 }) }
    }

    /// Sends `command` to the replica this client currently believes is
    /// the leader. On timeout or transport error, advances to the next
    /// replica in ascending id order and retries the *same* command.
    /// Returns [`ClientError`] once every candidate has been exhausted.
    pub fn send(&self, command: Command) -> Result<CommandResponse, ClientError> {
        let mut view = self.view.lock().expect("leader view mutex poisoned");
        let envelope = Envelope::from_client(command);

        loop {
            let address = view.addresses[view.curr_leader].clone();
            match call(address.as_str(), &envelope, CALL_DEADLINE) {
                Ok(response) => return Ok(response),
                Err(err) => {
                    tracing::warn!(
                        curr_leader = view.curr_leader,
                        %address,
                        error = %err,
                        "call failed, advancing to next replica"
                    );
                    view.curr_leader += 1;
                    if view.curr_leader >= CLUSTER_SIZE as usize {
                        return Err(ClientError);
                    }
                }
            }
        }
    }

    /// The replica this client currently believes is the leader. Not
    /// part of the wire contract; exposed for the shell's status line
    /// and for tests.
    pub fn current_leader(&self) -> u8 {
        self.view.lock().expect("leader view mutex poisoned").curr_leader as u8
    }
}
