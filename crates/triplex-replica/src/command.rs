//! Commands and their pure handlers (spec §4.2's command table).

use serde::{Deserialize, Serialize};
use triplex_types::{Password, Username};

use crate::state::{MessageRecord, ReplicaState};

/// A request to the state machine. Carries everything a handler needs
/// except the `is_client` routing flag, which lives one layer up in the
/// wire schema (it's about *who sent this*, not *what it does*).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Register { username: Username, password: Password },
    Login { username: Username, password: Password },
    DeleteAccount { username: Username, password: Password },
    SendMessage { sender: Username, receiver: Username, body: String },
    GetUsers,
    ReceiveMessage { username: Username },
}

impl Command {
    /// Mutating commands are replicated to followers and trigger a
    /// durable store; read-only commands are answered locally and never
    /// touch disk (spec §4.2: "Read-only commands ... do not mutate
    /// state and are not replicated").
    pub fn is_mutating(&self) -> bool {
        match self {
            Command::Register { .. } | Command::DeleteAccount { .. } | Command::SendMessage { .. } => true,
            Command::Login { .. } | Command::GetUsers | Command::ReceiveMessage { .. } => false,
        }
    }
}

/// The state machine's answer to a [`Command`]. Every RPC surfaces
/// `success`/`message` except `GetUsers` (a user list) and
/// `ReceiveMessage` (a rendered chat list) — spec §4.5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandResponse {
    Auth { success: bool, message: String },
    SendMessage { success: bool, message: String },
    Users { usernames: Vec<Username> },
    Chats { rendered: Vec<String> },
}

const REGISTER_SUCCESS: &str = "\nRegistration successful.";
const REGISTER_DUPLICATE: &str = "\nThe username you requested is already taken.";
const LOGIN_SUCCESS: &str = "\nLogin successful.";
const UNKNOWN_USER: &str = "\nERROR: Username does not exist in the database. Please try again.";
const WRONG_PASSWORD: &str = "\nERROR: Invalid password. Please try again.";
const DELETE_SUCCESS: &str = "\nAccount successfully deleted.";
const SEND_SUCCESS: &str = "Message successfully added.";
const SEND_UNKNOWN_PARTY: &str =
    "\nERROR: either sender or receiver are not in username database. Please try again!\n";

/// Applies `command` to `state`, returning the (possibly unchanged)
/// state and the response. Mutating commands mutate `state` in place
/// only on success; on a validation failure `state` is left untouched.
pub fn apply(state: &mut ReplicaState, command: Command) -> CommandResponse {
    match command {
        Command::Register { username, password } => {
            if state.account_exists(&username) {
                CommandResponse::Auth { success: false, message: REGISTER_DUPLICATE.to_string() }
            } else {
                state.insert_account(username, password);
                CommandResponse::Auth { success: true, message: REGISTER_SUCCESS.to_string() }
            }
        }
        Command::Login { username, password } => credential_check(state, &username, &password, LOGIN_SUCCESS),
        Command::DeleteAccount { username, password } => {
            match credential_check(state, &username, &password, DELETE_SUCCESS) {
                resp @ CommandResponse::Auth { success: true, .. } => {
                    state.remove_account(&username);
                    resp
                }
                resp => resp,
            }
        }
        Command::SendMessage { sender, receiver, body } => {
            if state.account_exists(&sender) && state.account_exists(&receiver) {
                state.append_message(receiver, MessageRecord { sender, body });
                CommandResponse::SendMessage { success: true, message: SEND_SUCCESS.to_string() }
            } else {
                CommandResponse::SendMessage { success: false, message: SEND_UNKNOWN_PARTY.to_string() }
            }
        }
        Command::GetUsers => CommandResponse::Users { usernames: state.usernames().cloned().collect() },
        Command::ReceiveMessage { username } => {
            CommandResponse::Chats { rendered: state.rendered_mailbox(&username) }
        }
    }
}

/// Shared precondition for `Login`/`DeleteAccount`: unknown user vs.
/// wrong password vs. success, with a caller-supplied success message
/// (the two commands differ only in that message and in `DeleteAccount`
/// also erasing the account on success).
fn credential_check(
    state: &ReplicaState,
    username: &Username,
    password: &Password,
    success_message: &str,
) -> CommandResponse {
    if !state.account_exists(username) {
        CommandResponse::Auth { success: false, message: UNKNOWN_USER.to_string() }
    } else if !state.password_matches(username, password) {
        CommandResponse::Auth { success: false, message: WRONG_PASSWORD.to_string() }
    } else {
        CommandResponse::Auth { success: true, message: success_message.to_string() }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn uname(s: &str) -> Username {
        Username::new(s).unwrap()
    }

    proptest! {
        /// Property: registering any non-empty username once always
        /// succeeds, and a second registration of the same username
        /// always fails, regardless of the password used either time.
        #[test]
        fn prop_double_register_always_rejects(
            name in "[a-z]{1,12}",
            first_password in "[a-z0-9]{1,12}",
            second_password in "[a-z0-9]{1,12}",
        ) {
            let mut state = ReplicaState::new();
            let first = apply(&mut state, Command::Register { username: uname(&name), password: Password::new(first_password) });
            prop_assert_eq!(first, CommandResponse::Auth { success: true, message: REGISTER_SUCCESS.to_string() });

            let second = apply(&mut state, Command::Register { username: uname(&name), password: Password::new(second_password) });
            prop_assert_eq!(second, CommandResponse::Auth { success: false, message: REGISTER_DUPLICATE.to_string() });
        }

        /// Property: logging in with the password a user actually
        /// registered with always succeeds; logging in with any other
        /// password always fails, and in neither case is the account
        /// directory perturbed.
        #[test]
        fn prop_login_matches_registered_password_exactly(
            name in "[a-z]{1,12}",
            registered in "[a-z0-9]{1,12}",
            attempt in "[a-z0-9]{1,12}",
        ) {
            let mut state = ReplicaState::new();
            apply(&mut state, Command::Register { username: uname(&name), password: Password::new(registered.clone()) });
            let before = state.clone();

            let resp = apply(&mut state, Command::Login { username: uname(&name), password: Password::new(attempt.clone()) });
            prop_assert_eq!(&state, &before);
            if attempt == registered {
                prop_assert_eq!(resp, CommandResponse::Auth { success: true, message: LOGIN_SUCCESS.to_string() });
            } else {
                prop_assert_eq!(resp, CommandResponse::Auth { success: false, message: WRONG_PASSWORD.to_string() });
            }
        }

        /// Property: `GetUsers` never mutates the state it reads, no
        /// matter how many accounts have been registered beforehand.
        #[test]
        fn prop_get_users_is_always_a_pure_read(names in prop::collection::vec("[a-z]{1,10}", 0..6)) {
            let mut state = ReplicaState::new();
            for name in &names {
                apply(&mut state, Command::Register { username: uname(name), password: Password::new("p") });
            }
            let before = state.clone();
            apply(&mut state, Command::GetUsers);
            prop_assert_eq!(state, before);
        }
    }
}
