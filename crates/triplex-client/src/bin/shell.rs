//! `triplex-client <ip0> <ip1> <ip2>`
//!
//! A minimal terminal client: register/login/delete, then a home screen
//! with one thread polling for new messages and the main thread
//! prompting for outgoing ones. This binary is the interactive shell the
//! core spec (§1) treats as an external collaborator — it exists only to
//! exercise [`triplex_client`]'s `AuthClient`/`ChatClient` surface, not as
//! a component the replication design depends on.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use triplex_client::{AuthClient, ChatClient, FailoverClient};
use triplex_config::{init_tracing, ClientArgs};
use triplex_types::{Password, Username};

fn main() -> ExitCode {
    init_tracing();
    let args = ClientArgs::parse();

    let addresses = match args.replica_addresses() {
        Ok(addresses) => addresses,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let failover = Arc::new(FailoverClient::new(addresses));
    let auth = AuthClient::new(Arc::clone(&failover));
    let chat = ChatClient::new(Arc::clone(&failover));

    let username = loop {
        match run_login(&auth) {
            Ok(Some(username)) => break username,
            Ok(None) => continue,
            Err(_) => {
                eprintln!("All 3 servers have failed.");
                return ExitCode::FAILURE;
            }
        }
    };

    if let Err(()) = run_home(&chat, username) {
        eprintln!("All 3 servers have failed.");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Prompts for Register/Login/DeleteAccount once. Returns the logged-in
/// username on a successful register or login, `None` to re-prompt (a
/// failed attempt or a delete), and propagates a client-level failover
/// exhaustion as an error the caller aborts on.
fn run_login(auth: &AuthClient) -> Result<Option<Username>, triplex_client::ClientError> {
    let choice = prompt("\nRegister, Login, or Delete Account?\n\n");

    if choice.to_lowercase().contains('r') {
        println!("Register with username and password.");
        let username = prompt(">> Username: ");
        let password = prompt(">> Password: ");
        let Ok(username) = Username::new(username) else {
            println!("\nUsername must not be empty.");
            return Ok(None);
        };
        let reply = auth.register(username.clone(), Password::new(password))?;
        println!("{}", reply.message);
        Ok(reply.success.then_some(username))
    } else if choice.to_lowercase().contains('l') {
        println!("Login with your username and password.");
        let username = prompt(">> Username: ");
        let password = prompt(">> Password: ");
        let Ok(username) = Username::new(username) else {
            println!("\nUsername must not be empty.");
            return Ok(None);
        };
        let reply = auth.login(username.clone(), Password::new(password))?;
        println!("{}", reply.message);
        Ok(reply.success.then_some(username))
    } else {
        println!("To delete an account, you must log in with the username and password.");
        let username = prompt(">> Username: ");
        let password = prompt(">> Password: ");
        let Ok(username) = Username::new(username) else {
            println!("\nUsername must not be empty.");
            return Ok(None);
        };
        let reply = auth.delete_account(username, Password::new(password))?;
        println!("{}", reply.message);
        Ok(None)
    }
}

/// Shows the inbox and the user directory once, then starts the two
/// cooperative loops spec §4.4/§9 describe: a receive loop polling for
/// new messages and a send loop prompting for outgoing ones. Both share
/// the same `ChatClient`, which in turn shares one `FailoverClient` — so
/// a failover discovered by either loop's call is immediately visible to
/// the other (the "cross-cutting lock on the chat stub").
fn run_home(chat: &ChatClient, username: Username) -> Result<(), ()> {
    println!("\n----------");
    println!("\nWELCOME TO THE CHAT HOME PAGE");
    println!("\nInbox [messages waiting for you]:");

    let inbox = chat.receive_messages(username.clone()).map_err(|_| ())?;
    if inbox.is_empty() {
        println!("No new messages to show.");
    } else {
        for line in &inbox {
            println!("{line}");
        }
    }

    let users = chat.get_users().map_err(|_| ())?;
    println!("\n----------\nAll usernames: {}", users.iter().map(Username::as_str).collect::<Vec<_>>().join(", "));

    let receiver_chat = chat.clone();
    let receiver_username = username.clone();
    let seen_at_login = inbox.len();
    thread::spawn(move || receive_loop(&receiver_chat, receiver_username, seen_at_login));

    send_loop(chat, username)
}

/// Polls `ReceiveMessage` roughly once a second and prints any lines
/// that weren't there last poll. Runs until the cluster is exhausted,
/// at which point this thread simply stops (the process exits via the
/// send loop's own failure, matching the original's "all three failed"
/// abort being driven by whichever loop notices first).
fn receive_loop(chat: &ChatClient, username: Username, mut last_seen: usize) {
    loop {
        let Ok(chats) = chat.receive_messages(username.clone()) else {
            return;
        };
        if chats.len() != last_seen {
            for line in &chats[last_seen..] {
                println!("{line}");
            }
            last_seen = chats.len();
        }
        thread::sleep(Duration::from_secs(1));
    }
}

/// Prompts for a recipient and body, sends, repeats. An empty recipient
/// exits the shell cleanly.
fn send_loop(chat: &ChatClient, username: Username) -> Result<(), ()> {
    loop {
        let receiver = prompt("\n>> Enter recipient username (blank to exit): ");
        if receiver.is_empty() {
            return Ok(());
        }
        let body = prompt(">> Enter message body: ");
        let Ok(receiver) = Username::new(receiver) else {
            println!("Recipient username must not be empty.");
            continue;
        };

        match chat.send_message(username.clone(), receiver, body) {
            Ok(reply) if !reply.success => println!("{}", reply.message),
            Ok(_) => {}
            Err(_) => return Err(()),
        }
    }
}

fn prompt(label: &str) -> String {
    print!("{label}");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok();
    line.trim().to_string()
}
