//! A real 3-replica cluster spawned as OS subprocesses.
//!
//! Grounded on `original_source/chat262-replication/test_replication.py`'s
//! `start_servers`/`kill_server` helpers: each replica runs on its own
//! loopback address (`127.0.0.1`, `127.0.0.2`, `127.0.0.3` — the whole
//! `127.0.0.0/8` block routes to `lo` without extra configuration) so that
//! every replica can share one fixed port, exactly as spec §6 describes,
//! while still letting this crate's tests run several independent
//! clusters in parallel by picking a different shared port per cluster.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;
use triplex_client::FailoverClient;

/// How long a freshly (re)spawned replica is given to bind its listener
/// before the harness starts dialing it.
const STARTUP_DELAY: Duration = Duration::from_millis(200);

fn replica_runner_bin() -> &'static str {
    env!("CARGO_BIN_EXE_triplex-replica-runner")
}

fn loopback_hosts() -> [String; 3] {
    ["127.0.0.1".to_string(), "127.0.0.2".to_string(), "127.0.0.3".to_string()]
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("failed to bind an ephemeral port")
        .local_addr()
        .expect("bound listener has a local address")
        .port()
}

/// One replica's subprocess handle, plus what's needed to (re)spawn it:
/// its id, the cluster's host list, the shared port, and its private
/// durable-snapshot directory.
struct Replica {
    id: u8,
    hosts: [String; 3],
    port: u16,
    data_dir: PathBuf,
    child: Option<Child>,
}

impl Replica {
    fn new(id: u8, hosts: [String; 3], port: u16, data_dir: PathBuf, start: bool) -> Self {
        let mut replica = Self { id, hosts, port, data_dir, child: None };
        if start {
            replica.start();
        }
        replica
    }

    fn start(&mut self) {
        assert!(self.child.is_none(), "replica {} is already running", self.id);
        let child = Command::new(replica_runner_bin())
            .arg(self.id.to_string())
            .args(&self.hosts)
            .arg("--port")
            .arg(self.port.to_string())
            .arg("--data-dir")
            .arg(&self.data_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn replica subprocess");
        tracing::debug!(id = self.id, port = self.port, "spawned replica subprocess");
        self.child = Some(child);
    }

    /// SIGKILLs this replica if it's running. A no-op if it was never
    /// started or was already killed — simulating the fail-stop model's
    /// "once dead, stays dead" rule doesn't require this to be callable
    /// only once.
    fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!(id = self.id, "killed replica subprocess");
        }
    }

    fn restart(&mut self) {
        self.kill();
        self.start();
    }
}

impl Drop for Replica {
    fn drop(&mut self) {
        self.kill();
    }
}

/// A 3-replica cluster, each member a real OS process, for spec §8's
/// end-to-end scenarios. Dropping the cluster kills every still-running
/// replica and removes the scratch directory holding their durable
/// snapshots.
pub struct TestCluster {
    _data_dir: TempDir,
    replicas: Vec<Replica>,
    addresses: [String; 3],
}

impl TestCluster {
    /// Spawns all three replicas.
    pub fn spawn() -> Self {
        Self::spawn_with(&[0, 1, 2])
    }

    /// Spawns only the replicas named in `alive_ids`; the rest are never
    /// started (not merely killed) — for scenarios like spec §8's "start
    /// id=2 standalone" that assume the other two were never brought up.
    /// Use [`TestCluster::restart_replica`] to bring an absent replica up
    /// for the first time.
    pub fn spawn_with(alive_ids: &[u8]) -> Self {
        let data_dir = tempfile::tempdir().expect("failed to create a scratch directory");
        let port = free_port();
        let hosts = loopback_hosts();
        let addresses = hosts.clone().map(|host| format!("{host}:{port}"));

        let replicas = (0..3u8)
            .map(|id| Replica::new(id, hosts.clone(), port, data_dir.path().to_path_buf(), alive_ids.contains(&id)))
            .collect();

        if !alive_ids.is_empty() {
            thread::sleep(STARTUP_DELAY);
        }

        Self { _data_dir: data_dir, replicas, addresses }
    }

    /// Kills replica `id`'s process (spec's fail-stop crash model). The
    /// replica stays dead until [`TestCluster::restart_replica`] is
    /// called explicitly.
    pub fn kill_replica(&mut self, id: u8) {
        self.replicas[id as usize].kill();
    }

    /// Kills (if running) and respawns replica `id` against the same
    /// address and durable snapshot directory — spec §8's durability
    /// scenario ("kill and restart id=2").
    pub fn restart_replica(&mut self, id: u8) {
        self.replicas[id as usize].restart();
        thread::sleep(STARTUP_DELAY);
    }

    /// A failover client pointed at this cluster's three addresses,
    /// starting out believing replica 0 is the leader (spec §6).
    pub fn client(&self) -> Arc<FailoverClient> {
        Arc::new(FailoverClient::new(self.addresses.clone()))
    }
}
