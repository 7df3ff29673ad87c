//! # triplex-wire: the RPC envelope and its transport
//!
//! A length-prefixed postcard frame carrying an [`Envelope`] (a
//! [`Command`][triplex_replica::Command] plus the `is_client` routing flag)
//! out, and a [`CommandResponse`][triplex_replica::CommandResponse] back.
//! [`call`] is the single blocking transport primitive both the client
//! library and the leader's follower-forwarding path use.

mod error;
mod frame;
mod protocol;

pub use error::WireError;
pub use frame::{decode, encode, read_frame, read_message, write_frame, write_message, MAX_FRAME_BYTES};
pub use protocol::{call, Envelope};
