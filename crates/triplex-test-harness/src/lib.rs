//! # triplex-test-harness: real-process cluster scenarios (spec §8)
//!
//! Spawns three real `triplex-server` processes (via this crate's own
//! `triplex-replica-runner` binary) as OS subprocesses, each bound to its
//! own loopback address on a shared port and its own durable snapshot
//! file, and exposes `Child::kill`-based crash simulation plus a
//! [`triplex_client::FailoverClient`] pointed at the cluster. This is
//! deliberately process-level rather than in-thread: the scenarios in
//! spec §8 test survival of a real crash-stop, not just a flag flip.

mod cluster;

pub use cluster::TestCluster;
