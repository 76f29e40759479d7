use super::*;

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    settings
        .apply_file(
            r#"
            database_url = "sqlite::memory:"
            notification_ttl_ms = 1500
            simulate_failure = ["optimize"]
            "#,
        )
        .expect("parse");

    assert_eq!(settings.database_url, "sqlite::memory:");
    assert_eq!(settings.notification_ttl_ms, 1500);
    assert_eq!(settings.resize_debounce_ms, 250);
    assert_eq!(settings.simulate_failure, vec!["optimize"]);
}

#[test]
fn env_overrides_file_and_prefers_app_prefix() {
    let mut settings = Settings::default();
    settings.apply_env(env(&[
        ("DATABASE_URL", "sqlite://legacy.db"),
        ("APP__DATABASE_URL", "sqlite://app.db"),
        ("APP__SPEEDUP", "10"),
        ("APP__SIMULATE_FAILURE", "save, export,"),
        ("APP__MOBILE_BREAKPOINT", "wide"),
    ]));

    assert_eq!(settings.database_url, "sqlite://app.db");
    assert_eq!(settings.speedup, 10);
    assert_eq!(settings.simulate_failure, vec!["save", "export"]);
    assert_eq!(settings.mobile_breakpoint, 768);
}

#[test]
fn interaction_config_uses_milliseconds() {
    let settings = Settings {
        resize_debounce_ms: 100,
        save_throttle_ms: 400,
        ..Settings::default()
    };
    let config = settings.interaction_config();
    assert_eq!(config.resize_debounce, Duration::from_millis(100));
    assert_eq!(config.save_throttle, Duration::from_millis(400));
    assert_eq!(config.notification_ttl, Duration::from_millis(5000));
}

#[test]
fn backend_honors_speedup() {
    let settings = Settings {
        speedup: 5,
        simulate_failure: vec!["optimize".into(), "bogus".into()],
        ..Settings::default()
    };
    let backend = settings.simulated_backend();
    assert_eq!(
        backend.duration_for(ActionKind::Optimize),
        Duration::from_millis(1000)
    );
}

#[tokio::test(start_paused = true)]
async fn offline_mode_reports_every_action_unavailable() {
    let mut settings = Settings::default();
    settings.apply_file("offline = true").expect("parse");
    assert!(settings.offline);

    let err = settings
        .backend()
        .execute(&interaction_core::Action::Save)
        .await
        .expect_err("offline backend");
    assert_eq!(err.code, shared::error::ErrorCode::Unavailable);

    settings.apply_env(env(&[("APP__OFFLINE", "false")]));
    assert!(settings.backend().execute(&interaction_core::Action::Save).await.is_ok());
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let missing = Path::new("definitely/not/here/admin_shell.toml");
    assert!(load_settings(Some(missing)).is_err());
}

#[test]
fn malformed_file_is_rejected() {
    let mut settings = Settings::default();
    assert!(settings.apply_file("notification_ttl_ms = \"soon\"").is_err());
}
