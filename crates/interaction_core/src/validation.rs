//! Required-field validation for form submissions.

use shared::domain::ElementId;

use crate::document::Document;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_CLASS: &str = "is-invalid";
pub const ERROR_ATTRIBUTE: &str = "data-error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ElementId,
    pub message: String,
}

fn required_fields(document: &Document, form: ElementId) -> Vec<ElementId> {
    document
        .descendants(form)
        .into_iter()
        .filter(|field| document.attribute(*field, "required").is_some())
        .collect()
}

/// Every `required` field under `form` whose trimmed value is empty.
pub fn validate_form(document: &Document, form: ElementId) -> Vec<FieldError> {
    required_fields(document, form)
        .into_iter()
        .filter(|field| {
            document
                .attribute(*field, "value")
                .map_or(true, |value| value.trim().is_empty())
        })
        .map(|field| FieldError {
            field,
            message: REQUIRED_MESSAGE.to_string(),
        })
        .collect()
}

/// Marks the fields in `errors` invalid and clears stale marks on the other
/// required fields of `form`.
pub fn render_field_errors(document: &Document, form: ElementId, errors: &[FieldError]) {
    for field in required_fields(document, form) {
        let outcome = match errors.iter().find(|err| err.field == field) {
            Some(err) => document
                .add_class(field, INVALID_CLASS)
                .and_then(|()| document.set_attribute(field, ERROR_ATTRIBUTE, err.message.clone())),
            None => document
                .remove_class(field, INVALID_CLASS)
                .and_then(|()| document.remove_attribute(field, ERROR_ATTRIBUTE)),
        };
        if let Err(err) = outcome {
            tracing::debug!(field = %field, error = %err, "field error rendering skipped");
        }
    }
}

/// First descendant `button` of `form` with `type="submit"`.
pub fn submit_button(document: &Document, form: ElementId) -> Option<ElementId> {
    document.descendants(form).into_iter().find(|el| {
        document.tag(*el).as_deref() == Some("button")
            && document.attribute(*el, "type").as_deref() == Some("submit")
    })
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
