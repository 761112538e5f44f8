//! Scale: hundreds of peers across all buckets, renames, and bulk clear.

use std::sync::Arc;

use trust_sync::{Acceptance, KeyStore, RecordingConsole, RemoteIdentity, TrustConfig, TrustSync};

fn open(dir: &std::path::Path) -> TrustSync {
    let config = TrustConfig::new(dir);
    TrustSync::open_with_console(&config, Arc::new(RecordingConsole::new()))
        .expect("open trust sync")
}

#[test]
fn stress_300_peers_across_buckets() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path());

    for uid in 0..300u64 {
        let mut remote = RemoteIdentity::new(uid, format!("minion-{uid}"), "", "");
        sync.evaluate_and_dump(&mut remote, &format!("{uid:08x}"), "ab12")
            .unwrap();
        match uid % 3 {
            0 => sync.accept_remote(&mut remote).unwrap(),
            1 => sync.reject_remote(&mut remote).unwrap(),
            _ => {}
        }
    }

    let all = sync.load_all_remote_identities().unwrap();
    assert_eq!(all.len(), 300);
    for (key, remote) in &all {
        assert_eq!(key, &remote.uid().to_string());
        let expected = match remote.uid() % 3 {
            0 => Acceptance::Accepted,
            1 => Acceptance::Rejected,
            _ => Acceptance::Pending,
        };
        assert_eq!(remote.acceptance(), expected);
    }

    sync.clear_all_remote_identities().unwrap();
    assert!(sync.load_all_remote_identities().unwrap().is_empty());
}

#[test]
fn stress_rename_chain_keeps_single_record() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path());

    let mut remote = RemoteIdentity::new(1, "name-0", "", "");
    sync.evaluate_and_dump(&mut remote, "cd34", "ab12").unwrap();
    sync.accept_remote(&mut remote).unwrap();

    for i in 1..=50 {
        let old = remote.name().to_string();
        remote.set_name(format!("name-{i}"));
        sync.replace_remote(&mut remote, &old).unwrap();
    }

    let all = sync.load_all_remote_identities().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["1"].name(), "name-50");
    assert_eq!(all["1"].acceptance(), Acceptance::Accepted);

    let keys = sync.store().list_keys().unwrap();
    let total: usize = keys.values().map(Vec::len).sum();
    assert_eq!(total, 1);
}
