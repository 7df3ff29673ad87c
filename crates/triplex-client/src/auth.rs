//! Thin typed wrapper over [`FailoverClient`] for the three auth RPCs.

use std::sync::Arc;

use triplex_replica::{Command, CommandResponse};
use triplex_types::{Password, Username};

use crate::error::ClientError;
use crate::failover::FailoverClient;

/// The outcome of any auth RPC: whether it succeeded and the
/// user-facing message to print (spec §6's literal strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthReply {
    pub success: bool,
    pub message: String,
}

/// `Register`/`Login`/`DeleteAccount`, routed through a shared
/// [`FailoverClient`] (spec §4.4: "one logical stub per service").
#[derive(Clone)]
pub struct AuthClient {
    failover: Arc<FailoverClient>,
}

impl AuthClient {
    pub fn new(failover: Arc<FailoverClient>) -> Self {
        Self { failover }
    }

    pub fn register(&self, username: Username, password: Password) -> Result<AuthReply, ClientError> {
        self.call(Command::Register { username, password })
    }

    pub fn login(&self, username: Username, password: Password) -> Result<AuthReply, ClientError> {
        self.call(Command::Login { username, password })
    }

    pub fn delete_account(&self, username: Username, password: Password) -> Result<AuthReply, ClientError> {
        self.call(Command::DeleteAccount { username, password })
    }

    fn call(&self, command: Command) -> Result<AuthReply, ClientError> {
        match self.failover.send(command)? {
            CommandResponse::Auth { success, message } => Ok(AuthReply { success, message }),
            other => unreachable!("auth command produced a non-auth response: {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;
    use triplex_wire::{read_message, write_message, Envelope};

    fn one_shot_auth_responder(response: CommandResponse) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let _envelope: Envelope = read_message(&mut stream).unwrap();
            write_message(&mut stream, &response).unwrap();
        });
        addr
    }

    #[test]
    fn register_unwraps_the_auth_response() {
        let addr = one_shot_auth_responder(CommandResponse::Auth {
            success: true,
            message: "\nRegistration successful.".to_string(),
        });
        let client = AuthClient::new(Arc::new(FailoverClient::new([addr, "127.0.0.1:1".to_string(), "127.0.0.1:1".to_string()])));

        let reply = client.register(Username::new("alice").unwrap(), Password::new("p1")).unwrap();
        assert!(reply.success);
        assert_eq!(reply.message, "\nRegistration successful.");
    }
}
