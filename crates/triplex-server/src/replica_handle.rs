//! One replica's in-memory state plus the durability and leadership flags
//! around it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use triplex_replica::{ReplicaIdentity, ReplicaState};
use triplex_types::ReplicaId;

use crate::error::ServerResult;

/// One follower this replica may forward mutating commands to as leader,
/// and whether it is still believed reachable. Once a forward to a
/// follower fails it is marked dead for the remainder of this leader's
/// life (spec §4.3/§7) — there is no membership-change path that ever
/// revives it.
pub(crate) struct Follower {
    pub id: ReplicaId,
    pub address: String,
    pub alive: bool,
}

/// Everything the per-replica mutex guards: the state machine itself and
/// the liveness of every follower this replica might forward to. Both
/// live under one lock so the leader/follower algorithm in
/// `handler::dispatch` — self-promotion, forward, and local apply — runs
/// as a single serialized step per request, not just its final write
/// (spec §5: "a single per-replica mutex acquired for the duration of
/// the handler").
pub(crate) struct Guarded {
    pub state: ReplicaState,
    pub followers: Vec<Follower>,
}

pub struct ReplicaHandle {
    identity: ReplicaIdentity,
    guarded: Mutex<Guarded>,
    /// Set the first time this replica answers a client directly. See
    /// `dispatch`'s self-promotion rule.
    is_leader: AtomicBool,
}

impl ReplicaHandle {
    /// Loads this replica's durable snapshot (or starts fresh if none
    /// exists yet), builds the follower table from `identity`'s static
    /// membership (every follower starts alive), and wraps both for
    /// serialized access.
    pub fn load(identity: ReplicaIdentity) -> ServerResult<Self> {
        let state = triplex_storage::load(&identity.db_path())?;
        let followers = identity
            .followers()
            .map(|id| Follower { id, address: identity.address_of(id).to_string(), alive: true })
            .collect();
        Ok(Self { identity, guarded: Mutex::new(Guarded { state, followers }), is_leader: AtomicBool::new(false) })
    }

    pub fn identity(&self) -> &ReplicaIdentity {
        &self.identity
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader.load(Ordering::Acquire)
    }

    /// Promotes this replica to leader. Idempotent; returns whether this
    /// call was the one that actually flipped the flag.
    pub fn promote(&self) -> bool {
        self.is_leader.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    /// Locks the state machine and the follower table together for the
    /// duration of one handler invocation. The caller (`handler::dispatch`)
    /// holds this guard across promotion, forwarding, and local apply, so
    /// two concurrent mutating requests can never forward in one order
    /// and apply in the other.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Guarded> {
        self.guarded.lock().expect("replica state mutex poisoned")
    }

    /// Persists `guard.state` if `mutating`. Durability failures are
    /// treated as fatal (spec §4.4) rather than surfaced to the caller as
    /// a retryable error.
    pub(crate) fn persist_if_mutating(&self, guard: &Guarded, mutating: bool) {
        if !mutating {
            return;
        }
        if let Err(err) = triplex_storage::store(&self.identity.db_path(), &guard.state) {
            tracing::error!(replica = %self.identity.id(), error = %err, "durable store write failed, replica cannot continue");
            std::process::exit(1);
        }
    }
}
