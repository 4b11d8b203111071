mod common;

use common::PlainHasher;
use std::sync::Arc;
use taskflow_core::domain::{NewTask, TaskStatus};
use taskflow_core::ports::KeyValueStore;
use taskflow_lib::adapters::FileStore;
use taskflow_lib::config::{Config, StorageBackend};
use taskflow_lib::state::AppState;
use tempfile::tempdir;

#[test]
fn documents_are_written_read_and_removed() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    assert_eq!(store.get("taskflow-users").unwrap(), None);
    store.set("taskflow-users", "[]").unwrap();
    assert_eq!(store.get("taskflow-users").unwrap().as_deref(), Some("[]"));
    assert!(dir.path().join("taskflow-users.json").is_file());
    assert!(!dir.path().join("taskflow-users.json.tmp").exists());

    store.set("taskflow-users", "[1]").unwrap();
    assert_eq!(store.get("taskflow-users").unwrap().as_deref(), Some("[1]"));

    store.remove("taskflow-users").unwrap();
    assert_eq!(store.get("taskflow-users").unwrap(), None);
    store.remove("taskflow-users").unwrap();
}

#[test]
fn keys_that_are_not_plain_names_are_rejected() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    for key in ["", "../escape", "a/b", "dots.json", "spaced key"] {
        assert!(store.set(key, "x").is_err(), "{key:?}");
        assert!(store.get(key).is_err(), "{key:?}");
    }
}

#[test]
fn open_creates_the_data_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = FileStore::open(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(store.root(), nested.as_path());
}

#[test]
fn state_survives_a_restart() {
    let dir = tempdir().unwrap();
    let open = || {
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        AppState::new(store, Arc::new(PlainHasher))
    };

    let first = open();
    let user = first
        .sessions
        .register("Ada", "ada@example.com", "secret1")
        .unwrap();
    let task = first
        .tasks
        .add_task(
            &user.id,
            NewTask {
                title: "Persist me".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    first.tasks.toggle_complete(&user.id, &task.id).unwrap();
    drop(first);

    let second = open();
    assert_eq!(second.sessions.current_session(), Some(user.clone()));
    let tasks = second.tasks.load_tasks(&user.id);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert!(second.sessions.login("ada@example.com", "secret1").is_ok());
}

#[test]
fn config_selects_the_backend() {
    let dir = tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().join("data"),
        storage: StorageBackend::File,
        log_level: tracing::Level::INFO,
    };
    AppState::from_config(&config).unwrap();
    assert!(dir.path().join("data").is_dir());

    let config = Config {
        data_dir: dir.path().join("unused"),
        storage: StorageBackend::Memory,
        ..config
    };
    let state = AppState::from_config(&config).unwrap();
    assert!(!dir.path().join("unused").exists());
    assert_eq!(state.sessions.current_session(), None);
}
