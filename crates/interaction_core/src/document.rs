//! In-process model of the page the interaction layer drives.
//!
//! Elements carry the attribute contract shared with the view templates
//! (`data-action`, `data-id`, `data-name`, `data-format`, `required`, `value`)
//! plus the bits of visual state the core mutates: label, disabled flag and
//! classes. `Document` is a cheap cloneable handle; all clones see the same tree.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use parking_lot::Mutex;
use shared::domain::ElementId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("element {0} is not attached to the document")]
    UnknownElement(ElementId),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    label: String,
    disabled: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: BTreeSet::new(),
            label: String::new(),
            disabled: false,
            parent,
            children: Vec::new(),
        }
    }
}

struct DocumentState {
    next_id: u64,
    root: ElementId,
    elements: HashMap<ElementId, Element>,
}

impl DocumentState {
    fn get(&self, id: ElementId) -> Result<&Element, DocumentError> {
        self.elements
            .get(&id)
            .ok_or(DocumentError::UnknownElement(id))
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, DocumentError> {
        self.elements
            .get_mut(&id)
            .ok_or(DocumentError::UnknownElement(id))
    }
}

/// Read-only view of one element handed to `closest`/`find` predicates.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    pub id: ElementId,
    element: &'a Element,
}

impl<'a> ElementRef<'a> {
    pub fn tag(&self) -> &'a str {
        &self.element.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.element.attributes.contains_key(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element.classes.contains(class)
    }
}

#[derive(Clone)]
pub struct Document {
    state: Arc<Mutex<DocumentState>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut elements = HashMap::new();
        elements.insert(root, Element::new("html", None));
        Self {
            state: Arc::new(Mutex::new(DocumentState {
                next_id: 1,
                root,
                elements,
            })),
        }
    }

    pub fn root(&self) -> ElementId {
        self.state.lock().root
    }

    pub fn append(&self, parent: ElementId, tag: &str) -> Result<ElementId, DocumentError> {
        let mut state = self.state.lock();
        state.get(parent)?;
        let id = ElementId(state.next_id);
        state.next_id += 1;
        state.elements.insert(id, Element::new(tag, Some(parent)));
        state.get_mut(parent)?.children.push(id);
        Ok(id)
    }

    pub fn is_connected(&self, id: ElementId) -> bool {
        self.state.lock().elements.contains_key(&id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.state.lock().elements.get(&id).and_then(|el| el.parent)
    }

    pub fn tag(&self, id: ElementId) -> Option<String> {
        self.state.lock().elements.get(&id).map(|el| el.tag.clone())
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.state
            .lock()
            .elements
            .get(&id)
            .and_then(|el| el.attributes.get(name).cloned())
    }

    pub fn set_attribute(
        &self,
        id: ElementId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state
            .get_mut(id)?
            .attributes
            .insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn remove_attribute(&self, id: ElementId, name: &str) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.get_mut(id)?.attributes.remove(name);
        Ok(())
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.state
            .lock()
            .elements
            .get(&id)
            .is_some_and(|el| el.classes.contains(class))
    }

    pub fn add_class(&self, id: ElementId, class: &str) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.get_mut(id)?.classes.insert(class.to_string());
        Ok(())
    }

    pub fn remove_class(&self, id: ElementId, class: &str) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.get_mut(id)?.classes.remove(class);
        Ok(())
    }

    /// Adds `class` when `on` is true and removes it otherwise.
    pub fn toggle_class(&self, id: ElementId, class: &str, on: bool) -> Result<(), DocumentError> {
        if on {
            self.add_class(id, class)
        } else {
            self.remove_class(id, class)
        }
    }

    pub fn label(&self, id: ElementId) -> Option<String> {
        self.state.lock().elements.get(&id).map(|el| el.label.clone())
    }

    pub fn set_label(&self, id: ElementId, label: impl Into<String>) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.get_mut(id)?.label = label.into();
        Ok(())
    }

    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.state
            .lock()
            .elements
            .get(&id)
            .is_some_and(|el| el.disabled)
    }

    pub fn set_disabled(&self, id: ElementId, disabled: bool) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        state.get_mut(id)?.disabled = disabled;
        Ok(())
    }

    /// Nearest ancestor of `id` (inclusive) accepted by `predicate`.
    pub fn closest<F>(&self, id: ElementId, predicate: F) -> Option<ElementId>
    where
        F: Fn(ElementRef<'_>) -> bool,
    {
        let state = self.state.lock();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let element = state.elements.get(&current)?;
            if predicate(ElementRef {
                id: current,
                element,
            }) {
                return Some(current);
            }
            cursor = element.parent;
        }
        None
    }

    pub fn closest_with_attribute(&self, id: ElementId, name: &str) -> Option<ElementId> {
        self.closest(id, |el| el.has_attribute(name))
    }

    /// Descendants of `id` (exclusive) in document order.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let state = self.state.lock();
        let mut out = Vec::new();
        let Some(element) = state.elements.get(&id) else {
            return out;
        };
        let mut stack: Vec<ElementId> = element.children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(child) = state.elements.get(&current) {
                stack.extend(child.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every element in the document accepted by `predicate`, in document order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<ElementId>
    where
        F: Fn(ElementRef<'_>) -> bool,
    {
        let root = self.root();
        let mut candidates = vec![root];
        candidates.extend(self.descendants(root));
        let state = self.state.lock();
        candidates
            .into_iter()
            .filter(|id| {
                state
                    .elements
                    .get(id)
                    .is_some_and(|element| predicate(ElementRef { id: *id, element }))
            })
            .collect()
    }

    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        self.find_all(|el| el.has_class(class))
    }

    /// First element whose `name` attribute equals `name`.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.find_all(|el| el.attribute("name") == Some(name))
            .into_iter()
            .next()
    }

    /// Detaches `id` and its whole subtree. The root cannot be removed.
    pub fn remove(&self, id: ElementId) -> Result<(), DocumentError> {
        let mut state = self.state.lock();
        if id == state.root {
            return Err(DocumentError::UnknownElement(id));
        }
        let parent = state.get(id)?.parent;
        if let Some(parent) = parent.and_then(|p| state.elements.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = state.elements.remove(&current) {
                stack.extend(element.children);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
