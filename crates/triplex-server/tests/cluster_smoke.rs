//! A cheap end-to-end smoke test for the server binary's own crate,
//! distinct from `triplex-test-harness`'s exhaustive failure-order
//! scenarios: just enough to catch a broken wire-up between
//! `triplex-server`, `triplex-test-harness`'s subprocess cluster, and
//! `triplex-client`'s failover stub without re-running the full spec §8
//! scenario suite here too.

use triplex_client::AuthClient;
use triplex_test_harness::TestCluster;
use triplex_types::{Password, Username};

#[test]
fn a_registered_user_can_log_back_in_through_any_live_replica() {
    let cluster = TestCluster::spawn();
    let auth = AuthClient::new(cluster.client());

    let reply = auth.register(Username::new("smoke").unwrap(), Password::new("pw")).unwrap();
    assert!(reply.success);

    let reply = auth.login(Username::new("smoke").unwrap(), Password::new("pw")).unwrap();
    assert!(reply.success);
    assert_eq!(reply.message, "\nLogin successful.");
}
