use fleetdash_browser::{Cookie, SessionSnapshot};

use super::SessionStore;

fn snapshot_with_cookie() -> SessionSnapshot {
    SessionSnapshot {
        origin: "https://portal.example.com".to_string(),
        cookies: vec![Cookie {
            name: "session-token".to_string(),
            value: "abc".to_string(),
            ..Cookie::default()
        }],
    }
}

#[test]
fn missing_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("state.json"));
    assert!(store.load().is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("state.json"));

    store.save(&snapshot_with_cookie()).unwrap();
    let loaded = store.load().expect("snapshot should load");
    assert_eq!(loaded.origin, "https://portal.example.com");
    assert_eq!(loaded.cookies[0].name, "session-token");
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("nested/deeper/state.json"));
    store.save(&snapshot_with_cookie()).unwrap();
    assert!(store.load().is_some());
}

#[test]
fn unparsable_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(SessionStore::new(path).load().is_none());
}

#[test]
fn cookie_less_snapshot_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"origin":"https://portal.example.com","cookies":[]}"#).unwrap();
    assert!(SessionStore::new(path).load().is_none());
}
