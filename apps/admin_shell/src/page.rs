//! The exam-administration page the shell drives. Scripts address elements
//! by their `name` attribute.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use interaction_core::{
    format::{format_date, format_time, parse_time, DEFAULT_DATE_PATTERN, DEFAULT_TIME_PATTERN},
    Document, DocumentError,
};
use shared::domain::ElementId;

struct ExamRow {
    id: u32,
    title: &'static str,
    date: &'static str,
    starts_at: &'static str,
}

const EXAMS: [ExamRow; 2] = [
    ExamRow {
        id: 1,
        title: "Algebra midterm",
        date: "2026-11-02",
        starts_at: "09:00",
    },
    ExamRow {
        id: 2,
        title: "Physics final",
        date: "2026-12-14",
        starts_at: "14:30:00",
    },
];

/// Date and start time as shown in the schedule column.
fn schedule_label(exam: &ExamRow) -> Result<String> {
    let date = NaiveDate::parse_from_str(exam.date, "%Y-%m-%d")
        .with_context(|| format!("invalid date for exam {}", exam.id))?;
    let time = parse_time(exam.starts_at)
        .with_context(|| format!("invalid start time for exam {}", exam.id))?;
    Ok(format!(
        "{} {}",
        format_date(date, DEFAULT_DATE_PATTERN),
        format_time(time, DEFAULT_TIME_PATTERN)
    ))
}

pub fn build_demo_page() -> Result<Document> {
    let doc = Document::new();
    let root = doc.root();

    let nav = named(&doc, root, "nav", "navbar")?;
    doc.add_class(nav, "navbar")?;
    doc.add_class(nav, "navbar-expanded")?;
    let sidebar = named(&doc, root, "aside", "sidebar")?;
    doc.add_class(sidebar, "sidebar")?;

    let main = doc.append(root, "main")?;
    action_button(&doc, main, "optimize", "optimize", "Run optimization")?;
    action_button(&doc, main, "save", "save", "Save")?;

    let table = doc.append(main, "table")?;
    for exam in &EXAMS {
        let row = named(&doc, table, "tr", &format!("row-{}", exam.id))?;
        let cell = doc.append(row, "td")?;
        doc.set_label(cell, exam.title)?;
        let schedule = named(&doc, row, "td", &format!("schedule-{}", exam.id))?;
        doc.set_label(schedule, schedule_label(exam)?)?;

        let export = action_button(&doc, row, &format!("export-{}", exam.id), "export", "PDF")?;
        doc.set_attribute(export, "data-id", exam.id.to_string())?;
        doc.set_attribute(export, "data-format", "pdf")?;

        let excel = action_button(&doc, row, &format!("export-excel-{}", exam.id), "export", "Excel")?;
        doc.set_attribute(excel, "data-id", exam.id.to_string())?;
        doc.set_attribute(excel, "data-format", "excel")?;

        let duplicate =
            action_button(&doc, row, &format!("duplicate-{}", exam.id), "duplicate", "Duplicate")?;
        doc.set_attribute(duplicate, "data-id", exam.id.to_string())?;

        let delete = action_button(&doc, row, &format!("delete-{}", exam.id), "delete", "Delete")?;
        doc.set_attribute(delete, "data-id", exam.id.to_string())?;
        doc.set_attribute(delete, "data-name", exam.title)?;
    }

    // An export button with no id, to exercise parameter validation.
    action_button(&doc, main, "export-orphan", "export", "Export")?;

    let form = named(&doc, main, "form", "exam-form")?;
    for field in ["exam-title", "exam-date"] {
        let input = named(&doc, form, "input", field)?;
        doc.set_attribute(input, "required", "")?;
    }
    named(&doc, form, "input", "exam-notes")?;
    let submit = named(&doc, form, "button", "exam-submit")?;
    doc.set_attribute(submit, "type", "submit")?;
    doc.set_label(submit, "Create exam")?;

    let modal = named(&doc, root, "div", "help-modal")?;
    doc.add_class(modal, "modal")?;
    doc.add_class(modal, "show")?;

    Ok(doc)
}

fn named(doc: &Document, parent: ElementId, tag: &str, name: &str) -> Result<ElementId, DocumentError> {
    let id = doc.append(parent, tag)?;
    doc.set_attribute(id, "name", name)?;
    Ok(id)
}

fn action_button(
    doc: &Document,
    parent: ElementId,
    name: &str,
    action: &str,
    label: &str,
) -> Result<ElementId, DocumentError> {
    let button = named(doc, parent, "button", name)?;
    doc.set_attribute(button, "data-action", action)?;
    doc.set_label(button, label)?;
    Ok(button)
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
