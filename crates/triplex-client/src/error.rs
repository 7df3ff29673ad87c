//! Client-side errors.

use thiserror::Error;

/// Every replica in the cluster was tried, in ascending id order, and
/// none answered within its deadline — spec §4.4: "if `curr_leader` would
/// exceed 2, abort the client process with an 'all servers failed'
/// diagnostic."
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("all 3 servers have failed")]
pub struct ClientError;
