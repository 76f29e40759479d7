//! Per-element loading state.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use shared::domain::ElementId;

use crate::document::Document;

pub const BUSY_LABEL: &str = "Loading...";
pub const BUSY_CLASS: &str = "loading";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyState {
    pub original_label: String,
    pub was_disabled: bool,
}

#[derive(Clone)]
pub struct BusyStateController {
    document: Document,
    saved: Arc<Mutex<HashMap<ElementId, BusyState>>>,
}

impl BusyStateController {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            saved: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_busy(&self, element: ElementId) -> bool {
        self.saved.lock().contains_key(&element)
    }

    /// Swaps the label for the busy indicator and disables the element.
    /// No-op while already busy, so the saved label is captured once.
    pub fn mark_busy(&self, element: ElementId) {
        let mut saved = self.saved.lock();
        if saved.contains_key(&element) {
            return;
        }
        let Some(original_label) = self.document.label(element) else {
            tracing::debug!(%element, "mark_busy on detached element ignored");
            return;
        };
        let was_disabled = self.document.is_disabled(element);

        if self.document.set_label(element, BUSY_LABEL).is_err()
            || self.document.set_disabled(element, true).is_err()
            || self.document.add_class(element, BUSY_CLASS).is_err()
        {
            return;
        }
        saved.insert(
            element,
            BusyState {
                original_label,
                was_disabled,
            },
        );
    }

    /// Restores the saved label and re-enables the element. No-op when not
    /// busy; skips restoration if the element has left the document.
    pub fn mark_idle(&self, element: ElementId) {
        let Some(state) = self.saved.lock().remove(&element) else {
            return;
        };
        if !self.document.is_connected(element) {
            tracing::debug!(%element, "busy element removed before restore; skipping");
            return;
        }

        let restored = self
            .document
            .set_label(element, state.original_label)
            .and_then(|()| self.document.set_disabled(element, state.was_disabled))
            .and_then(|()| self.document.remove_class(element, BUSY_CLASS));
        if let Err(err) = restored {
            tracing::debug!(%element, error = %err, "busy restore skipped");
        }
    }

    /// Marks `element` busy and returns a scope that marks it idle on drop.
    pub fn scope(&self, element: ElementId) -> BusyScope {
        self.mark_busy(element);
        BusyScope {
            controller: self.clone(),
            element,
        }
    }
}

/// Restores an element's idle state when dropped.
#[must_use = "dropping the scope immediately restores the element"]
pub struct BusyScope {
    controller: BusyStateController,
    element: ElementId,
}

impl BusyScope {
    pub fn element(&self) -> ElementId {
        self.element
    }
}

impl Drop for BusyScope {
    fn drop(&mut self) {
        self.controller.mark_idle(self.element);
    }
}

#[cfg(test)]
#[path = "tests/busy_tests.rs"]
mod tests;
