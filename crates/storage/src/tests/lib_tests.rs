use super::*;

#[tokio::test]
async fn stores_and_overwrites_values() {
    let store = SqlitePreferenceStore::new(MEMORY_URL).await.expect("db");
    assert_eq!(store.load("theme").await.expect("load"), None);

    store.store("theme", "light").await.expect("store");
    store.store("theme", "dark").await.expect("overwrite");
    store.store("language", "fr").await.expect("store");

    let theme = store.load("theme").await.expect("load").expect("present");
    assert_eq!(theme.value, "dark");
    let keys: Vec<String> = store
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|p| p.key)
        .collect();
    assert_eq!(keys, vec!["language", "theme"]);
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let store = SqlitePreferenceStore::new(MEMORY_URL).await.expect("db");
    store.health_check().await.expect("health check");
}

#[tokio::test]
async fn backend_trait_maps_absent_to_none() {
    let store = SqlitePreferenceStore::new(MEMORY_URL).await.expect("db");
    assert_eq!(PreferenceBackend::get(&store, "missing").await.expect("get"), None);
    PreferenceBackend::set(&store, "language", "es").await.expect("set");
    assert_eq!(
        PreferenceBackend::get(&store, "language").await.expect("get"),
        Some("es".to_string())
    );
}

#[test]
fn sqlite_path_ignores_memory_and_query_strings() {
    assert_eq!(sqlite_path(MEMORY_URL), None);
    assert_eq!(sqlite_path("postgres://db"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/prefs.db?mode=rwc"),
        Some(PathBuf::from("./data/prefs.db"))
    );
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let db_path = temp.path().join("nested").join("preferences.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let store = SqlitePreferenceStore::new(&database_url).await.expect("db");
    drop(store);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}
