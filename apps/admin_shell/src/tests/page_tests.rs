use super::*;

#[test]
fn schedule_column_uses_display_formats() {
    let doc = build_demo_page().expect("page");

    let first = doc.find_by_name("schedule-1").expect("schedule cell");
    assert_eq!(doc.label(first).as_deref(), Some("2026-11-02 09:00"));
    let second = doc.find_by_name("schedule-2").expect("schedule cell");
    assert_eq!(doc.label(second).as_deref(), Some("2026-12-14 14:30"));
}

#[test]
fn every_row_carries_its_action_buttons() {
    let doc = build_demo_page().expect("page");

    for id in [1, 2] {
        let row = doc.find_by_name(&format!("row-{id}")).expect("row");
        for prefix in ["export", "export-excel", "duplicate", "delete"] {
            let button = doc
                .find_by_name(&format!("{prefix}-{id}"))
                .expect("button");
            assert_eq!(doc.closest(button, |el| el.tag() == "tr"), Some(row));
            assert_eq!(doc.attribute(button, "data-id"), Some(id.to_string()));
        }
    }
}

#[test]
fn malformed_schedule_is_rejected() {
    let exam = ExamRow {
        id: 9,
        title: "Broken",
        date: "2026-02-30",
        starts_at: "09:00",
    };
    assert!(schedule_label(&exam).is_err());
}
