use super::*;
use std::collections::BTreeMap;

fn sample(ts: i64, tag: &str) -> Sample {
    let mut tags = BTreeMap::new();
    tags.insert("k".to_string(), tag.to_string());
    Sample::new(ts, "m", 3.3, tags)
}

#[test]
fn test_append_then_replay_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data_store.log");

    {
        let mut log = DurabilityLog::open(&path).unwrap();
        log.append(&sample(1000, "v1")).unwrap();
        log.append(&sample(2000, "v2")).unwrap();
        log.close().unwrap();
    }

    let replayed = DurabilityLog::replay(&path).unwrap();
    assert_eq!(replayed.len(), 2);
    assert_eq!(replayed[0], sample(1000, "v1"));
    assert_eq!(replayed[1], sample(2000, "v2"));
}

#[test]
fn test_replay_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.log");
    let replayed = DurabilityLog::replay(&path).unwrap();
    assert!(replayed.is_empty());
}

#[test]
fn test_replay_parse_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.log");
    std::fs::write(&path, "{not json}\n").unwrap();

    match DurabilityLog::replay(&path) {
        Err(Error::ReplayParse(_, 0)) => (),
        other => panic!("expected ReplayParse at line 0, got {:?}", other),
    }
}

#[test]
fn test_append_after_close_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data_store.log");
    let mut log = DurabilityLog::open(&path).unwrap();
    log.close().unwrap();
    match log.append(&sample(1, "v")) {
        Err(Error::InvalidState(_)) => (),
        other => panic!("expected InvalidState, got {:?}", other),
    }
}

#[test]
fn test_reopen_preserves_prior_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data_store.log");

    {
        let mut log = DurabilityLog::open(&path).unwrap();
        log.append(&sample(1, "a")).unwrap();
    }
    {
        let mut log = DurabilityLog::open(&path).unwrap();
        log.append(&sample(2, "b")).unwrap();
    }

    let replayed = DurabilityLog::replay(&path).unwrap();
    assert_eq!(replayed.len(), 2);
}
