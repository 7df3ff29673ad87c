//! # triplex-types: shared vocabulary for the triplex chat cluster
//!
//! Small newtypes used across the wire schema, the replica state machine,
//! the server, and the client library, so all four agree on one
//! representation of "which replica", "which user", and "what password".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Static replica identifier. Exactly three replicas exist in a cluster,
/// numbered `0`, `1`, `2`; the lowest-id live replica is the leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicaId(u8);

/// Number of replicas in a cluster. Fixed by the fault model (§1: tolerate
/// up to two of three crash failures).
pub const CLUSTER_SIZE: u8 = 3;

impl ReplicaId {
    /// Creates a `ReplicaId`, or `None` if `id >= CLUSTER_SIZE`.
    pub fn new(id: u8) -> Option<Self> {
        if id < CLUSTER_SIZE { Some(Self(id)) } else { None }
    }

    /// All replica ids in ascending order: `0`, `1`, `2`.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CLUSTER_SIZE).map(Self)
    }

    /// The replicas with a strictly greater id than this one, in
    /// ascending order. These are the replicas this one forwards to when
    /// it is leader.
    pub fn followers_of(self) -> impl Iterator<Item = Self> {
        ((self.0 + 1)..CLUSTER_SIZE).map(Self)
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Index into a 3-element peer address list.
    pub fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ReplicaId {
    type Error = InvalidReplicaId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidReplicaId(value))
    }
}

/// A replica id outside `0..CLUSTER_SIZE` was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("replica id must be in 0..{CLUSTER_SIZE}, got {0}")]
pub struct InvalidReplicaId(pub u8);

/// An account's username. Non-empty, otherwise unvalidated — the source
/// this system is modeled on performs no further validation either.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyUsername> {
        let raw = raw.into();
        if raw.is_empty() { Err(EmptyUsername) } else { Ok(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `Username` was constructed from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("username must not be empty")]
pub struct EmptyUsername;

/// A plaintext account password.
///
/// Stored and compared verbatim, matching the source system's behavior —
/// see DESIGN.md. A production fork would replace this newtype's storage
/// with a salted hash without touching any other contract in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replica_id_rejects_out_of_range() {
        assert!(ReplicaId::new(3).is_none());
        assert!(ReplicaId::new(255).is_none());
        assert!(ReplicaId::new(0).is_some());
        assert!(ReplicaId::new(2).is_some());
    }

    #[test]
    fn followers_of_are_strictly_greater_and_ascending() {
        let r0 = ReplicaId::new(0).unwrap();
        let followers: Vec<_> = r0.followers_of().map(ReplicaId::as_u8).collect();
        assert_eq!(followers, vec![1, 2]);

        let r2 = ReplicaId::new(2).unwrap();
        assert_eq!(r2.followers_of().count(), 0);
    }

    #[test]
    fn all_replica_ids_in_order() {
        let ids: Vec<_> = ReplicaId::all().map(ReplicaId::as_u8).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn username_rejects_empty() {
        assert!(Username::new("").is_err());
        assert!(Username::new("alice").is_ok());
    }

    #[test]
    fn username_round_trips_through_json() {
        let u = Username::new("alice").unwrap();
        let encoded = serde_json::to_string(&u).unwrap();
        let decoded: Username = serde_json::from_str(&encoded).unwrap();
        assert_eq!(u, decoded);
    }
}
