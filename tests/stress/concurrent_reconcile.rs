//! Concurrency: many threads evaluating the same and different peers.

use std::sync::{Arc, Barrier};
use std::thread;

use trust_sync::{Acceptance, RecordingConsole, RemoteIdentity, TrustConfig, TrustSync};

fn open(dir: &std::path::Path, auto_accept: bool) -> Arc<TrustSync> {
    let config = TrustConfig::new(dir).with_auto_accept(auto_accept);
    Arc::new(
        TrustSync::open_with_console(&config, Arc::new(RecordingConsole::new()))
            .expect("open trust sync"),
    )
}

#[test]
fn stress_same_peer_from_32_threads() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path(), false);
    let barrier = Arc::new(Barrier::new(32));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let sync = Arc::clone(&sync);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut remote = RemoteIdentity::new(7, "node7", "", "");
                (0..20)
                    .map(|_| sync.evaluate_and_dump(&mut remote, "cd34", "ab12").unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for h in handles {
        let statuses = h.join().unwrap();
        assert!(statuses.iter().all(|s| *s == Acceptance::Pending));
    }

    let all = sync.load_all_remote_identities().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["7"].acceptance(), Acceptance::Pending);
}

#[test]
fn stress_distinct_peers_in_parallel() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path(), true);

    let handles: Vec<_> = (0..16u64)
        .map(|t| {
            let sync = Arc::clone(&sync);
            thread::spawn(move || {
                for i in 0..25u64 {
                    let uid = t * 100 + i;
                    let mut remote = RemoteIdentity::new(uid, format!("peer-{uid}"), "", "");
                    let status = sync
                        .evaluate_and_dump(&mut remote, &format!("{uid:04x}"), "ab12")
                        .unwrap();
                    assert_eq!(status, Acceptance::Accepted);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let all = sync.load_all_remote_identities().unwrap();
    assert_eq!(all.len(), 16 * 25);
    assert!(all
        .values()
        .all(|r| r.acceptance() == Acceptance::Accepted));
}

#[test]
fn stress_conflicting_keys_first_writer_wins() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path(), false);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let sync = Arc::clone(&sync);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut remote = RemoteIdentity::new(9, "contested", "", "");
                let verify = format!("{t:02x}");
                let status = sync.evaluate_and_dump(&mut remote, &verify, "ab12").unwrap();
                (verify, status)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = results
        .iter()
        .filter(|(_, s)| *s == Acceptance::Pending)
        .collect();
    assert_eq!(winners.len(), 1, "exactly one key set may be recorded");

    let all = sync.load_all_remote_identities().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["9"].verify_key_hex(), winners[0].0);
}
