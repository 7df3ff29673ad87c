//! The leader/follower algorithm: self-promotion, forward-then-apply, and
//! plain local application, all under one lock per request.

use std::time::Duration;

use triplex_wire::{call, Envelope};

use crate::replica_handle::{Follower, ReplicaHandle};

/// Every RPC, client or replication, is given this long to complete —
/// the cluster's only timeout (spec §5).
pub const CALL_DEADLINE: Duration = Duration::from_secs(1);

/// Applies an incoming envelope to `handle`, forwarding to followers first
/// when this replica is acting as leader for a mutating client request.
///
/// - `is_client = true`, not yet leader: this replica promotes itself to
///   leader (the first client request it sees is read as proof that every
///   lower-id replica has failed over past it).
/// - `is_client = true`, mutating command: forward to every follower
///   still believed alive, then apply locally. Forwarding is fire-and-
///   forget — a follower that is unreachable is marked dead and skipped
///   on every later request (spec §9: replication has no ack-wait or
///   rollback; spec §4.3/§7: dead followers stay dead for this leader's
///   life).
/// - `is_client = true`, read-only command: answered locally only; reads
///   are never replicated.
/// - `is_client = false`: this is the leader's forward landing on a
///   follower. Apply locally and do not forward further.
///
/// One lock is held across promotion, forwarding, and local apply (spec
/// §5: "a single per-replica mutex acquired for the duration of the
/// handler"), so two mutating requests handled concurrently by different
/// worker threads can never forward to the followers in one relative
/// order while applying locally in the other.
pub fn dispatch(handle: &ReplicaHandle, envelope: Envelope) -> triplex_replica::CommandResponse {
    let Envelope { is_client, command } = envelope;

    if is_client {
        handle.promote();
    }

    let mutating = command.is_mutating();
    let mut guard = handle.lock();

    if is_client && mutating {
        forward_to_followers(&mut guard.followers, &command);
    }

    let response = triplex_replica::apply(&mut guard.state, command);
    handle.persist_if_mutating(&guard, mutating);
    response
}

/// Forwards `command` to every follower still believed alive, marking
/// dead any that fail to respond. A follower marked dead here is never
/// retried again for the rest of this leader's life.
fn forward_to_followers(followers: &mut [Follower], command: &triplex_replica::Command) {
    for follower in followers.iter_mut().filter(|f| f.alive) {
        let envelope = Envelope::forwarded(command.clone());
        if let Err(err) = call(follower.address.as_str(), &envelope, CALL_DEADLINE) {
            tracing::warn!(follower = %follower.id, error = %err, "replication forward failed, marking follower dead");
            follower.alive = false;
        }
    }
}
