//! Resilience: corrupted, truncated and foreign files in the key store.

use std::sync::Arc;

use trust_sync::{
    Acceptance, LocalIdentity, RecordingConsole, RemoteIdentity, TrustConfig, TrustError,
    TrustSync,
};

fn open(dir: &std::path::Path) -> TrustSync {
    let config = TrustConfig::new(dir);
    TrustSync::open_with_console(&config, Arc::new(RecordingConsole::new()))
        .expect("open trust sync")
}

#[test]
fn resilience_corrupted_remote_record_detected() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path());
    let mut remote = RemoteIdentity::new(7, "node7", "", "");
    sync.evaluate_and_dump(&mut remote, "cd34", "ab12").unwrap();

    let path = tmp.path().join("pending").join("node7");
    let mut data = std::fs::read(&path).unwrap();
    for byte in data.iter_mut().take(6) {
        *byte ^= 0xFF;
    }
    std::fs::write(&path, data).unwrap();

    let result = sync.load_remote(&remote);
    assert!(matches!(result, Err(TrustError::InvalidFileFormat(_))));
    assert!(sync.load_all_remote_identities().is_err());
}

#[test]
fn resilience_truncated_local_key_detected() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path());
    sync.dump_local_identity(&LocalIdentity::generate(false))
        .unwrap();

    let path = tmp.path().join("local.key");
    let data = std::fs::read(&path).unwrap();
    std::fs::write(&path, &data[..data.len() / 2]).unwrap();

    let result = sync.load_local_identity();
    assert!(matches!(result, Err(TrustError::InvalidFileFormat(_))));
}

#[test]
fn resilience_failed_evaluation_leaves_store_unchanged() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path());
    let mut remote = RemoteIdentity::new(7, "node7", "", "");
    sync.evaluate_and_dump(&mut remote, "cd34", "ab12").unwrap();

    // A directory where the accepted record would go cannot be read as a record.
    std::fs::create_dir(tmp.path().join("accepted").join("node7")).unwrap();
    let before = remote.clone();
    assert!(sync.evaluate(&mut remote, "cd34", "ab12").is_err());
    assert_eq!(remote, before);

    let pending = std::fs::read(tmp.path().join("pending").join("node7")).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&pending).unwrap();
    assert_eq!(value["verify"], "cd34");
}

#[test]
fn resilience_stray_files_ignored_by_listing() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path());
    let mut remote = RemoteIdentity::new(7, "node7", "", "");
    sync.evaluate_and_dump(&mut remote, "cd34", "ab12").unwrap();

    std::fs::write(tmp.path().join("pending").join(".node8.tmp"), b"{").unwrap();
    std::fs::create_dir(tmp.path().join("rejected").join("subdir")).unwrap();

    let all = sync.load_all_remote_identities().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["7"].acceptance(), Acceptance::Pending);
}

#[test]
fn resilience_path_names_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let sync = open(tmp.path());

    let mut remote = RemoteIdentity::new(7, "../../etc/passwd", "", "");
    let result = sync.evaluate_and_dump(&mut remote, "cd34", "ab12");
    assert!(matches!(result, Err(TrustError::InvalidName(_))));
    assert_eq!(remote.acceptance(), Acceptance::Pending);
    assert!(remote.verify_key_hex().is_empty());
}
