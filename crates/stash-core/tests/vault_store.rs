use std::path::PathBuf;

use stash_core::{KeyedTransform, NewEntry, StashError, VaultStore};

fn open_store(path: &PathBuf) -> VaultStore {
    VaultStore::open(path, Box::new(KeyedTransform::new("test-deployment-secret")))
        .expect("open should succeed")
}

fn temp_vault() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("vault.json");
    (dir, path)
}

#[test]
fn test_create_assigns_distinct_ids_in_insertion_order() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);

    let mut ids = Vec::new();
    for index in 0..10 {
        let id = store
            .create(NewEntry::new(
                format!("platform-{}", index),
                "user",
                "passphrase",
            ))
            .expect("create should succeed");
        ids.push(id);
    }

    let mut distinct = ids.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 10);

    let listed: Vec<_> = store.fetch_all().iter().map(|entry| entry.id).collect();
    assert_eq!(listed, ids);
}

#[test]
fn test_fetch_all_and_query_omit_passphrases() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);
    store
        .create(NewEntry::new("mail", "a", "super-secret-p1"))
        .expect("create should succeed");

    for entry in store.fetch_all() {
        assert!(entry.passphrase.is_none());
    }
    for entry in store.query("mail") {
        assert!(entry.passphrase.is_none());
    }

    let listing = serde_json::to_string(&store.fetch_all()).expect("serialize");
    assert!(!listing.contains("passphrase"));
    assert!(!listing.contains("super-secret-p1"));
}

#[test]
fn test_passphrase_encoded_at_rest_decoded_on_fetch() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);
    let id = store
        .create(NewEntry::new("mail", "a", "p1-plaintext"))
        .expect("create should succeed");

    let on_disk = std::fs::read_to_string(&path).expect("read vault file");
    assert!(!on_disk.contains("p1-plaintext"));

    let fetched = store.fetch(&id).expect("fetch should succeed");
    assert_eq!(fetched.passphrase.as_deref(), Some("p1-plaintext"));
}

#[test]
fn test_fetch_increments_counter_and_persists() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);
    let id = store
        .create(NewEntry::new("mail", "a", "p1"))
        .expect("create should succeed");

    assert_eq!(store.fetch(&id).expect("first fetch").total_accesses, 1);
    assert_eq!(store.fetch(&id).expect("second fetch").total_accesses, 2);

    // Counter survives a fresh open of the same file.
    let mut reopened = open_store(&path);
    assert_eq!(reopened.fetch(&id).expect("third fetch").total_accesses, 3);
}

#[test]
fn test_query_is_case_insensitive_and_leaves_counters() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);
    store
        .create(
            NewEntry::new("GitHub", "octocat", "p1").with_notes("Work account"),
        )
        .expect("create should succeed");
    store
        .create(NewEntry::new("bank", "alice", "p2"))
        .expect("create should succeed");

    assert_eq!(store.query("github").len(), 1);
    assert_eq!(store.query("OCTO").len(), 1);
    assert_eq!(store.query("work").len(), 1);
    assert_eq!(store.query("missing").len(), 0);

    for entry in store.fetch_all() {
        assert_eq!(entry.total_accesses, 0);
    }
}

#[test]
fn test_update_replaces_fields_but_not_identity() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);
    let id = store
        .create(NewEntry::new("mail", "a", "p1"))
        .expect("create should succeed");
    let created_at = store.fetch_all()[0].created_at;

    store
        .update(&id, NewEntry::new("mail-2", "b", "p2"), None)
        .expect("update should succeed");

    let updated = store.fetch(&id).expect("fetch should succeed");
    assert_eq!(updated.id, id);
    assert_eq!(updated.created_at, created_at);
    assert_eq!(updated.platform, "mail-2");
    assert_eq!(updated.username, "b");
    assert_eq!(updated.passphrase.as_deref(), Some("p2"));
    // One fetch so far; update itself left the counter alone.
    assert_eq!(updated.total_accesses, 1);

    store
        .update(&id, NewEntry::new("mail-2", "b", "p2"), Some(9))
        .expect("update with counter override");
    assert_eq!(store.fetch_all()[0].total_accesses, 9);
}

#[test]
fn test_update_missing_entry_fails() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);
    let result = store.update(
        &uuid::Uuid::new_v4(),
        NewEntry::new("mail", "a", "p1"),
        None,
    );
    assert!(matches!(result, Err(StashError::NotFound(_))));
}

#[test]
fn test_delete_is_strict() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);
    let id = store
        .create(NewEntry::new("mail", "a", "p1"))
        .expect("create should succeed");

    assert!(matches!(
        store.delete(&uuid::Uuid::new_v4()),
        Err(StashError::NotFound(_))
    ));

    store.delete(&id).expect("delete should succeed");
    assert!(matches!(store.fetch(&id), Err(StashError::NotFound(_))));
    assert!(matches!(store.delete(&id), Err(StashError::NotFound(_))));
}

#[test]
fn test_create_rejects_invalid_payload_without_mutation() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);

    let invalid = NewEntry::from_json(serde_json::json!({
        "platform": "mail",
        "passphrase": "p1"
    }));
    assert!(invalid.is_err());

    let empty_field = store.create(NewEntry::new("", "a", "p1"));
    assert!(matches!(empty_field, Err(StashError::Validation(_))));
    assert!(store.fetch_all().is_empty());
    // Nothing was persisted either.
    assert!(!path.exists());
}

#[test]
fn test_register_login_fetch_scenario() {
    let (_dir, path) = temp_vault();
    let mut store = open_store(&path);

    store.register("alice", "Secr3t!").expect("register");
    store.verify_owner("alice", "Secr3t!").expect("login check");

    let id = store
        .create(NewEntry::new("mail", "a", "p1"))
        .expect("create should succeed");

    let first = store.fetch(&id).expect("first fetch");
    assert_eq!(first.passphrase.as_deref(), Some("p1"));
    assert_eq!(first.total_accesses, 1);
    assert_eq!(store.fetch(&id).expect("second fetch").total_accesses, 2);

    store.delete(&id).expect("delete should succeed");
    assert!(matches!(store.fetch(&id), Err(StashError::NotFound(_))));
}
