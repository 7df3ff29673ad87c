//! The durable tuple `(accounts, mailboxes)` and its invariants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use triplex_types::{Password, Username};

/// A registered account. `username` is the map key in [`ReplicaState`];
/// this struct only carries the password so accounts serialize as a flat
/// `username -> password` map, matching the source system's
/// `db['passwords']` shape (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub password: Password,
}

/// One undelivered-yet-visible message addressed to a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub sender: Username,
    pub body: String,
}

impl MessageRecord {
    /// Renders this record the way `ReceiveMessage` presents it to
    /// clients: `"From {sender}: {body}"`.
    pub fn render(&self) -> String {
        format!("From {}: {}", self.sender, self.body)
    }
}

/// The full durable state of one replica: accounts plus per-recipient
/// mailboxes. Ordered maps so that `GetUsers`/persistence have a
/// deterministic iteration order across a restart, even though the
/// external contract (§4.2) leaves `GetUsers`'s order unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaState {
    accounts: BTreeMap<Username, Account>,
    mailboxes: BTreeMap<Username, Vec<MessageRecord>>,
}

impl ReplicaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_exists(&self, username: &Username) -> bool {
        self.accounts.contains_key(username)
    }

    pub fn password_matches(&self, username: &Username, password: &Password) -> bool {
        self.accounts
            .get(username)
            .is_some_and(|account| &account.password == password)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &Username> {
        self.accounts.keys()
    }

    /// The current mailbox contents for `username`, rendered. Does not
    /// consume: repeated calls between two `SendMessage` applies return
    /// the same sequence (§8 mailbox-monotonicity).
    pub fn rendered_mailbox(&self, username: &Username) -> Vec<String> {
        self.mailboxes
            .get(username)
            .map(|records| records.iter().map(MessageRecord::render).collect())
            .unwrap_or_default()
    }

    pub(crate) fn insert_account(&mut self, username: Username, password: Password) {
        self.accounts.insert(username, Account { password });
    }

    pub(crate) fn remove_account(&mut self, username: &Username) {
        // Deleting an account does not drop its outstanding mailbox:
        // pending messages to a deleted user remain reachable until read.
        self.accounts.remove(username);
    }

    pub(crate) fn append_message(&mut self, recipient: Username, record: MessageRecord) {
        self.mailboxes.entry(recipient).or_default().push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uname(s: &str) -> Username {
        Username::new(s).unwrap()
    }

    #[test]
    fn fresh_state_has_no_accounts() {
        let state = ReplicaState::new();
        assert!(state.usernames().next().is_none());
        assert!(!state.account_exists(&uname("alice")));
    }

    #[test]
    fn password_matches_only_the_registered_password() {
        let mut state = ReplicaState::new();
        state.insert_account(uname("alice"), Password::new("hunter2"));

        assert!(state.password_matches(&uname("alice"), &Password::new("hunter2")));
        assert!(!state.password_matches(&uname("alice"), &Password::new("wrong")));
        assert!(!state.password_matches(&uname("bob"), &Password::new("hunter2")));
    }

    #[test]
    fn deleting_account_keeps_pending_mailbox() {
        let mut state = ReplicaState::new();
        state.insert_account(uname("alice"), Password::new("p1"));
        state.insert_account(uname("bob"), Password::new("p2"));
        state.append_message(
            uname("bob"),
            MessageRecord { sender: uname("alice"), body: "hi".into() },
        );

        state.remove_account(&uname("alice"));

        assert!(!state.account_exists(&uname("alice")));
        assert_eq!(state.rendered_mailbox(&uname("bob")), vec!["From alice: hi".to_string()]);
    }

    #[test]
    fn mailbox_order_is_insertion_order() {
        let mut state = ReplicaState::new();
        state.insert_account(uname("alice"), Password::new("p1"));
        state.insert_account(uname("bob"), Password::new("p2"));

        state.append_message(
            uname("bob"),
            MessageRecord { sender: uname("alice"), body: "first".into() },
        );
        state.append_message(
            uname("bob"),
            MessageRecord { sender: uname("alice"), body: "second".into() },
        );

        assert_eq!(
            state.rendered_mailbox(&uname("bob")),
            vec!["From alice: first".to_string(), "From alice: second".to_string()]
        );
    }

    #[test]
    fn round_trips_through_postcard() {
        let mut state = ReplicaState::new();
        state.insert_account(uname("alice"), Password::new("p1"));
        state.append_message(
            uname("alice"),
            MessageRecord { sender: uname("bob"), body: "hey".into() },
        );

        let bytes = postcard::to_allocvec(&state).unwrap();
        let decoded: ReplicaState = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(state, decoded);
    }
}
