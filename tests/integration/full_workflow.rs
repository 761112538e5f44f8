//! Full workflow: a node boots, sights peers, an operator decides on them,
//! a peer renames, and the node is reset.

use std::sync::Arc;

use trust_sync::{
    Acceptance, LocalIdentity, RecordingConsole, RemoteIdentity, TrustConfig, TrustSync,
};

fn open(dir: &std::path::Path, auto_accept: bool) -> TrustSync {
    let config = TrustConfig::new(dir).with_auto_accept(auto_accept);
    TrustSync::open_with_console(&config, Arc::new(RecordingConsole::new()))
        .expect("open trust sync")
}

/// A peer with real Ed25519/X25519 public keys.
fn peer(uid: u64, name: &str) -> (RemoteIdentity, String, String) {
    let keys = LocalIdentity::generate(false);
    let verify = keys.verify_key_hex().unwrap();
    let public = keys.public_key_hex().unwrap();
    (RemoteIdentity::new(uid, name, "", ""), verify, public)
}

#[test]
fn workflow_boot_sight_decide_rename_reset() {
    let tmp = tempfile::tempdir().unwrap();
    let key_dir = tmp.path().join("pki");
    let road_dir = tmp.path().join("road");

    // Boot: no local identity yet, generate and persist one.
    let sync = open(&key_dir, false);
    assert!(sync.load_local_identity().unwrap().is_none());
    let me = LocalIdentity::generate(false);
    assert!(sync.dump_local_identity(&me).unwrap());

    // Restart: the same identity comes back.
    let sync = open(&key_dir, false);
    assert_eq!(sync.load_local_identity().unwrap().unwrap(), me);

    // Two peers show up.
    let (mut alice, alice_verify, alice_public) = peer(1, "alice");
    let (mut eve, eve_verify, eve_public) = peer(2, "eve");
    assert_eq!(
        sync.evaluate_and_dump(&mut alice, &alice_verify, &alice_public)
            .unwrap(),
        Acceptance::Pending
    );
    assert_eq!(
        sync.evaluate_and_dump(&mut eve, &eve_verify, &eve_public)
            .unwrap(),
        Acceptance::Pending
    );

    // Operator accepts alice and rejects eve.
    sync.accept_remote(&mut alice).unwrap();
    sync.reject_remote(&mut eve).unwrap();

    // Alice reconnects with the same keys: still accepted.
    assert_eq!(
        sync.evaluate_and_dump(&mut alice, &alice_verify, &alice_public)
            .unwrap(),
        Acceptance::Accepted
    );

    // Someone claims to be alice with different keys: rejected, keys kept.
    let (_, forged_verify, forged_public) = peer(1, "alice");
    let mut impostor = alice.clone();
    assert_eq!(
        sync.evaluate(&mut impostor, &forged_verify, &forged_public)
            .unwrap(),
        Acceptance::Rejected
    );
    assert_eq!(impostor.verify_key_hex(), alice_verify);

    // Alice renames; her record follows her into the accepted bucket.
    alice.set_name("alice2");
    sync.replace_remote(&mut alice, "alice").unwrap();

    let all = sync.load_all_remote_identities().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["1"].name(), "alice2");
    assert_eq!(all["1"].acceptance(), Acceptance::Accepted);
    assert_eq!(all["1"].verify_key_hex(), alice_verify);
    assert_eq!(all["2"].acceptance(), Acceptance::Rejected);

    // Full reset.
    let config = TrustConfig::new(&key_dir);
    trust_sync::clear_all_trust_state(&road_dir, &config).unwrap();
    assert!(sync.load_all_remote_identities().unwrap().is_empty());
}

#[test]
fn workflow_auto_accept_skips_pending() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path(), true);

    let (mut bob, verify, public) = peer(3, "bob");
    assert_eq!(
        sync.evaluate_and_dump(&mut bob, &verify, &public).unwrap(),
        Acceptance::Accepted
    );

    let loaded = sync.load_remote(&bob).unwrap().unwrap();
    assert_eq!(loaded, bob);
}

#[test]
fn workflow_state_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();

    let (mut carol, verify, public) = peer(4, "carol");
    {
        let sync = open(tmp.path(), false);
        sync.evaluate_and_dump(&mut carol, &verify, &public).unwrap();
        sync.accept_remote(&mut carol).unwrap();
    }

    let sync = open(tmp.path(), false);
    let mut fresh = RemoteIdentity::new(4, "carol", "", "");
    assert_eq!(
        sync.evaluate(&mut fresh, &verify, &public).unwrap(),
        Acceptance::Accepted
    );
    assert_eq!(fresh, carol);
}
