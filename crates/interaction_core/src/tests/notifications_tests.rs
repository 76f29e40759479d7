use super::*;

use tokio::{sync::broadcast::error::TryRecvError, time::sleep};

#[tokio::test(start_paused = true)]
async fn notification_expires_after_ttl() {
    let center = NotificationCenter::default();
    let handle = center.notify("Saving changes...", Severity::Info);

    assert!(handle.is_active());
    sleep(Duration::from_millis(4999)).await;
    assert!(handle.is_active());
    sleep(Duration::from_millis(2)).await;

    assert!(!handle.is_active());
    assert!(center.active().is_empty());
}

#[tokio::test(start_paused = true)]
async fn manual_dismiss_cancels_expiry() {
    let center = NotificationCenter::new(Duration::from_millis(1000));
    let mut events = center.subscribe();
    let handle = center.notify("Item duplicated successfully", Severity::Success);

    assert!(handle.dismiss());
    assert!(!handle.dismiss());
    sleep(Duration::from_millis(2000)).await;

    match events.try_recv() {
        Ok(NotificationEvent::Shown(n)) => assert_eq!(n.id, handle.id()),
        other => panic!("expected shown event, got {other:?}"),
    }
    assert_eq!(
        events.try_recv(),
        Ok(NotificationEvent::Dismissed {
            id: handle.id(),
            reason: DismissReason::Manual,
        })
    );
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn expiry_reports_expired_reason_once() {
    let center = NotificationCenter::default();
    let mut events = center.subscribe();
    let handle = center.notify_with_ttl("Exporting to PDF...", Severity::Info, Duration::from_millis(50));

    sleep(Duration::from_millis(100)).await;
    assert!(!handle.dismiss());

    assert!(matches!(events.try_recv(), Ok(NotificationEvent::Shown(_))));
    assert_eq!(
        events.try_recv(),
        Ok(NotificationEvent::Dismissed {
            id: handle.id(),
            reason: DismissReason::Expired,
        })
    );
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn concurrent_notifications_keep_insertion_order() {
    let center = NotificationCenter::default();
    center.notify("first", Severity::Info);
    center.notify_with_ttl("second", Severity::Warning, Duration::from_millis(100));
    center.notify("third", Severity::Error);

    let messages: Vec<String> = center.active().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);

    sleep(Duration::from_millis(150)).await;
    let messages: Vec<String> = center.active().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["first", "third"]);
}

#[tokio::test(start_paused = true)]
async fn dismiss_all_clears_everything() {
    let center = NotificationCenter::default();
    let first = center.notify("a", Severity::Info);
    center.notify("b", Severity::Info);

    assert_eq!(center.dismiss_all(), 2);
    assert!(center.active().is_empty());
    assert!(!first.is_active());
    assert_eq!(center.dismiss_all(), 0);
}

#[tokio::test(start_paused = true)]
async fn records_ttl_and_severity() {
    let center = NotificationCenter::default();
    center.notify_with_ttl("Optimization already running", Severity::Warning, Duration::from_secs(3));

    let active = center.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].severity, Severity::Warning);
    assert_eq!(active[0].ttl_ms, 3000);
}
