use vignette_storage::{FileStore, KeyValueStore, MemoryStore};

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("vignette_store_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[tokio::test]
async fn load_missing_key_returns_none() {
    let store = FileStore::new(temp_dir("missing")).unwrap();
    assert!(store.load("vignette/credentials.json").await.unwrap().is_none());
}

#[tokio::test]
async fn store_then_load_round_trips() {
    let store = FileStore::new(temp_dir("roundtrip")).unwrap();
    store
        .store("vignette/credentials.json", r#"{"keys":["a"]}"#)
        .await
        .unwrap();
    let loaded = store.load("vignette/credentials.json").await.unwrap();
    assert_eq!(loaded.as_deref(), Some(r#"{"keys":["a"]}"#));
}

#[tokio::test]
async fn store_replaces_previous_value() {
    let store = FileStore::new(temp_dir("replace")).unwrap();
    store.store("k", "one").await.unwrap();
    store.store("k", "two").await.unwrap();
    assert_eq!(store.load("k").await.unwrap().as_deref(), Some("two"));
}

#[tokio::test]
async fn remove_is_idempotent() {
    let store = FileStore::new(temp_dir("remove")).unwrap();
    store.store("k", "v").await.unwrap();
    store.remove("k").await.unwrap();
    store.remove("k").await.unwrap();
    assert!(store.load("k").await.unwrap().is_none());
}

#[tokio::test]
async fn memory_store_behaves_like_file_store() {
    let store = MemoryStore::new();
    assert!(store.load("k").await.unwrap().is_none());
    store.store("k", "v").await.unwrap();
    assert_eq!(store.load("k").await.unwrap().as_deref(), Some("v"));
    store.remove("k").await.unwrap();
    assert!(store.load("k").await.unwrap().is_none());
}
