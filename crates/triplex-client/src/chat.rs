//! Thin typed wrapper over [`FailoverClient`] for the chat RPCs.

use std::sync::Arc;

use triplex_replica::{Command, CommandResponse};
use triplex_types::Username;

use crate::error::ClientError;
use crate::failover::FailoverClient;

/// The outcome of `SendMessage` (spec §6's literal strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReply {
    pub success: bool,
    pub message: String,
}

/// `SendMessage`/`GetUsers`/`ReceiveMessage`, routed through a shared
/// [`FailoverClient`] (spec §4.4: "one logical stub per service").
#[derive(Clone)]
pub struct ChatClient {
    failover: Arc<FailoverClient>,
}

impl ChatClient {
    pub fn new(failover: Arc<FailoverClient>) -> Self {
        Self { failover }
    }

    pub fn send_message(&self, sender: Username, receiver: Username, body: impl Into<String>) -> Result<SendReply, ClientError> {
        match self.failover.send(Command::SendMessage { sender, receiver, body: body.into() })? {
            CommandResponse::SendMessage { success, message } => Ok(SendReply { success, message }),
            other => unreachable!("send-message command produced an unexpected response: {other:?}"),
        }
    }

    /// The current set of registered usernames. Never fails at the
    /// state-machine level (spec §4.2); only transport failure surfaces
    /// as an error here.
    pub fn get_users(&self) -> Result<Vec<Username>, ClientError> {
        match self.failover.send(Command::GetUsers)? {
            CommandResponse::Users { usernames } => Ok(usernames),
            other => unreachable!("get-users command produced an unexpected response: {other:?}"),
        }
    }

    /// `username`'s full current mailbox, rendered as `"From {sender}:
    /// {body}"` lines. Does not consume the mailbox (spec §4.2).
    pub fn receive_messages(&self, username: Username) -> Result<Vec<String>, ClientError> {
        match self.failover.send(Command::ReceiveMessage { username })? {
            CommandResponse::Chats { rendered } => Ok(rendered),
            other => unreachable!("receive-message command produced an unexpected response: {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;
    use triplex_wire::{read_message, write_message, Envelope};

    fn one_shot_chat_responder(response: CommandResponse) -> String {
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
    fn receive_messages_unwraps_the_chats_response() {
        let addr = one_shot_chat_responder(CommandResponse::Chats { rendered: vec!["From alice: hi".to_string()] });
        let client = ChatClient::new(Arc::new(FailoverClient::new([addr, "127.0.0.1:1".to_string(), "127.0.0.1:1".to_string()])));

        let chats = client.receive_messages(Username::new("bob").unwrap()).unwrap();
        assert_eq!(chats, vec!["From alice: hi".to_string()]);
    }

    #[test]
    fn get_users_unwraps_the_users_response() {
        let addr = one_shot_chat_responder(CommandResponse::Users {
            usernames: vec![Username::new("alice").unwrap(), Username::new("bob").unwrap()],
        });
        let client = ChatClient::new(Arc::new(FailoverClient::new([addr, "127.0.0.1:1".to_string(), "127.0.0.1:1".to_string()])));

        let users = client.get_users().unwrap();
        assert_eq!(users.len(), 2);
    }
}
