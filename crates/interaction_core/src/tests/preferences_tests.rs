use super::*;

struct BrokenBackend;

#[async_trait]
impl PreferenceBackend for BrokenBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
        Err(PreferenceError::Backend("storage locked".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
        Err(PreferenceError::Backend("storage locked".to_string()))
    }
}

#[tokio::test]
async fn get_applies_default_only_when_absent() {
    let store = PreferenceStore::in_memory();
    assert_eq!(store.get("density", "compact").await.expect("get"), "compact");

    store.set("density", "").await.expect("set");
    assert_eq!(store.get("density", "compact").await.expect("get"), "");
}

#[tokio::test]
async fn typed_helpers_round_trip_through_backend() {
    let store = PreferenceStore::in_memory();
    assert_eq!(store.theme().await.expect("theme"), Theme::Light);
    assert_eq!(store.language().await.expect("language"), "en");

    store.set_theme(Theme::Dark).await.expect("set theme");
    store.set_language("fr").await.expect("set language");

    assert_eq!(store.theme().await.expect("theme"), Theme::Dark);
    assert_eq!(store.get(THEME_KEY, "light").await.expect("raw"), "dark");
    assert_eq!(store.language().await.expect("language"), "fr");
}

#[tokio::test]
async fn unrecognized_theme_falls_back_to_default() {
    let store = PreferenceStore::in_memory();
    store.set(THEME_KEY, "solarized").await.expect("set");
    assert_eq!(store.theme().await.expect("theme"), Theme::Light);
}

#[tokio::test]
async fn load_and_apply_writes_root_attributes_and_persists_defaults() {
    let backend = Arc::new(MemoryPreferenceBackend::new());
    let store = PreferenceStore::new(backend.clone());
    let doc = Document::new();

    store.load_and_apply(&doc).await;

    assert_eq!(doc.attribute(doc.root(), "data-theme").as_deref(), Some("light"));
    assert_eq!(doc.attribute(doc.root(), "lang").as_deref(), Some("en"));
    assert_eq!(
        backend.get(THEME_KEY).await.expect("get"),
        Some("light".to_string())
    );
    assert_eq!(
        backend.get(LANGUAGE_KEY).await.expect("get"),
        Some("en".to_string())
    );
}

#[tokio::test]
async fn failing_backend_still_applies_defaults() {
    let store = PreferenceStore::new(Arc::new(BrokenBackend));
    let doc = Document::new();

    assert!(store.get(THEME_KEY, "light").await.is_err());
    store.load_and_apply(&doc).await;

    assert_eq!(doc.attribute(doc.root(), "data-theme").as_deref(), Some("light"));
    assert_eq!(doc.attribute(doc.root(), "lang").as_deref(), Some("en"));
}
