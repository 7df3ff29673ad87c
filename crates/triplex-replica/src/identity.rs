//! A replica's fixed place in the 3-member cluster.

use std::path::{Path, PathBuf};

use triplex_types::{ReplicaId, CLUSTER_SIZE};

/// The static cluster membership a replica is launched with: its own id
/// and the socket address of every replica in ascending-id order
/// (`addresses[0]` is always replica 0's address, independent of which
/// replica `self.id` is). Membership is fixed for the process lifetime —
/// spec §7 excludes dynamic membership changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaIdentity {
    id: ReplicaId,
    addresses: [String; CLUSTER_SIZE as usize],
    store_dir: PathBuf,
}

impl ReplicaIdentity {
    pub fn new(id: ReplicaId, addresses: [String; CLUSTER_SIZE as usize], store_dir: impl Into<PathBuf>) -> Self {
        Self { id, addresses, store_dir: store_dir.into() }
    }

    pub fn id(&self) -> ReplicaId {
        self.id
    }

    pub fn own_address(&self) -> &str {
        &self.addresses[self.id.as_index()]
    }

    pub fn address_of(&self, id: ReplicaId) -> &str {
        &self.addresses[id.as_index()]
    }

    /// The other two replicas, in ascending id order — the order spec
    /// §4.3 forwards a replicated write to.
    pub fn followers(&self) -> impl Iterator<Item = ReplicaId> {
        self.id.followers_of()
    }

    /// The path this replica's durable snapshot lives at: one file per
    /// replica id so that running all three on one machine for testing
    /// doesn't clobber a shared file.
    pub fn db_path(&self) -> PathBuf {
        self.store_dir.join(format!("replica-{}.db", self.id))
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: u8) -> ReplicaIdentity {
        ReplicaIdentity::new(
            ReplicaId::new(id).unwrap(),
            [
                "127.0.0.1:50051".to_string(),
                "127.0.0.1:50052".to_string(),
                "127.0.0.1:50053".to_string(),
            ],
            "/tmp/triplex-test",
        )
    }

    #[test]
    fn own_address_matches_own_id() {
        assert_eq!(identity(0).own_address(), "127.0.0.1:50051");
        assert_eq!(identity(2).own_address(), "127.0.0.1:50053");
    }

    #[test]
    fn followers_are_every_other_replica_ascending() {
        let followers: Vec<ReplicaId> = identity(1).followers().collect();
        assert_eq!(followers, vec![ReplicaId::new(0).unwrap(), ReplicaId::new(2).unwrap()]);
    }

    #[test]
    fn db_path_is_distinct_per_replica() {
        assert_ne!(identity(0).db_path(), identity(1).db_path());
    }
}
