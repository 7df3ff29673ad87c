//! # triplex-client: the failover-aware RPC client library
//!
//! A client opens one [`FailoverClient`] against the cluster's three
//! `host:port` addresses and builds an [`AuthClient`] and a
//! [`ChatClient`] on top of it. Both wrappers share the same
//! `FailoverClient`, so a failover discovered on one service's call
//! immediately applies to the other — there is exactly one `LeaderView`
//! per client process (spec §3, §4.4).

mod auth;
mod chat;
mod error;
mod failover;

pub use auth::{AuthClient, AuthReply};
pub use chat::{ChatClient, SendReply};
pub use error::ClientError;
pub use failover::{FailoverClient, CALL_DEADLINE};
