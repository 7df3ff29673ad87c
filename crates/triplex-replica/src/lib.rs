//! # triplex-replica: the chat cluster's state machine
//!
//! This crate is the pure, deterministic core of a replica: accounts,
//! mailboxes, and the command handlers that mutate or read them. It has
//! no network I/O and no disk I/O — those live in `triplex-server` and
//! `triplex-storage` respectively. Keeping this layer pure means every
//! command handler is a plain unit test: no sockets, no threads, no
//! temp files.

mod command;
mod identity;
mod state;

pub use command::{apply, Command, CommandResponse};
pub use identity::ReplicaIdentity;
pub use state::{Account, MessageRecord, ReplicaState};
