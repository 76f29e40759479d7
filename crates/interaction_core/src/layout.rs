//! Responsive refresh applied after resize bursts settle.

use serde::{Deserialize, Serialize};

use crate::document::Document;

pub const MODAL_CLASS: &str = "modal";
pub const MODAL_OPEN_CLASS: &str = "show";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Expands the navbar and opens the sidebar on wide viewports; the reverse
/// below `mobile_breakpoint`.
pub fn update_responsive_elements(document: &Document, viewport: Viewport, mobile_breakpoint: u32) {
    let is_mobile = viewport.width < mobile_breakpoint;
    tracing::debug!(width = viewport.width, is_mobile, "refreshing responsive layout");

    let toggles = [
        ("navbar", "navbar-expanded", !is_mobile),
        ("sidebar", "sidebar-collapsed", is_mobile),
    ];
    for (class, state_class, on) in toggles {
        if let Some(element) = document.find_by_class(class).into_iter().next() {
            let _ = document.toggle_class(element, state_class, on);
        }
    }
}

/// Hides every open modal. Returns how many were closed.
pub fn close_all_modals(document: &Document) -> usize {
    document
        .find_by_class(MODAL_CLASS)
        .into_iter()
        .filter(|modal| document.has_class(*modal, MODAL_OPEN_CLASS))
        .filter(|modal| document.remove_class(*modal, MODAL_OPEN_CLASS).is_ok())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, shared::domain::ElementId, shared::domain::ElementId) {
        let doc = Document::new();
        let nav = doc.append(doc.root(), "nav").expect("nav");
        doc.add_class(nav, "navbar").expect("class");
        let aside = doc.append(doc.root(), "aside").expect("aside");
        doc.add_class(aside, "sidebar").expect("class");
        (doc, nav, aside)
    }

    #[test]
    fn narrow_viewport_collapses_sidebar() {
        let (doc, nav, aside) = page();
        update_responsive_elements(&doc, Viewport { width: 500, height: 800 }, 768);
        assert!(!doc.has_class(nav, "navbar-expanded"));
        assert!(doc.has_class(aside, "sidebar-collapsed"));

        update_responsive_elements(&doc, Viewport { width: 768, height: 800 }, 768);
        assert!(doc.has_class(nav, "navbar-expanded"));
        assert!(!doc.has_class(aside, "sidebar-collapsed"));
    }

    #[test]
    fn missing_elements_are_ignored() {
        let doc = Document::new();
        update_responsive_elements(&doc, Viewport { width: 100, height: 100 }, 768);
    }

    #[test]
    fn closes_only_open_modals() {
        let doc = Document::new();
        let open = doc.append(doc.root(), "div").expect("modal");
        doc.add_class(open, MODAL_CLASS).expect("class");
        doc.add_class(open, MODAL_OPEN_CLASS).expect("class");
        let closed = doc.append(doc.root(), "div").expect("modal");
        doc.add_class(closed, MODAL_CLASS).expect("class");

        assert_eq!(close_all_modals(&doc), 1);
        assert!(!doc.has_class(open, MODAL_OPEN_CLASS));
        assert_eq!(close_all_modals(&doc), 0);
    }
}
