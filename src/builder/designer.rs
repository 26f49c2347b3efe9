//! Designer engine
//!
//! Owns the live draft of a form: the ordered elements and the current
//! selection. Every mutation keeps two invariants: element ids are unique and
//! the selection, when set, names a present element.

use super::document::FormDocument;
use super::drag::{DropCommand, Half, InsertAt};
use super::element::{ElementId, FieldElement, FieldTypeTag};
use super::registry::construct_new;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignerError {
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    #[error("element id {0} is already in use")]
    DuplicateId(ElementId),
    #[error("index {index} is out of bounds for {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("element {id} cannot change type from {from} to {to}")]
    TypeChanged {
        id: ElementId,
        from: FieldTypeTag,
        to: FieldTypeTag,
    },
}

/// Log and return an invariant violation
fn violation(err: DesignerError) -> DesignerError {
    error!("Designer rejected edit: {err}");
    err
}

#[derive(Debug, Clone, Default)]
pub struct Designer {
    document: FormDocument,
    dirty: bool,
}

impl Designer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from persisted content; a freshly loaded draft is clean
    pub fn from_elements(elements: Vec<FieldElement>) -> Result<Self, DesignerError> {
        let mut designer = Self::new();
        designer.set_elements(elements)?;
        designer.dirty = false;
        Ok(designer)
    }

    pub fn elements(&self) -> &[FieldElement] {
        &self.document.elements
    }

    pub fn selected(&self) -> Option<&ElementId> {
        self.document.selected.as_ref()
    }

    pub fn selected_element(&self) -> Option<&FieldElement> {
        self.document.selected_element()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Insert `element` at `index` (`0..=len`)
    pub fn add_element(
        &mut self,
        index: usize,
        element: FieldElement,
    ) -> Result<(), DesignerError> {
        let len = self.document.len();
        if index > len {
            return Err(violation(DesignerError::IndexOutOfBounds { index, len }));
        }
        if self.document.contains(&element.id) {
            return Err(violation(DesignerError::DuplicateId(element.id)));
        }
        self.document.elements.insert(index, element);
        self.dirty = true;
        Ok(())
    }

    /// Remove by id; a missing id is a no-op
    pub fn remove_element(&mut self, id: &ElementId) -> Option<FieldElement> {
        let index = self.document.position(id)?;
        let removed = self.document.elements.remove(index);
        if self.document.selected.as_ref() == Some(id) {
            self.document.selected = None;
        }
        self.dirty = true;
        Some(removed)
    }

    /// Replace the element `id` wholesale, keeping its position
    pub fn update_element(
        &mut self,
        id: &ElementId,
        element: FieldElement,
    ) -> Result<(), DesignerError> {
        let index = self
            .document
            .position(id)
            .ok_or_else(|| violation(DesignerError::ElementNotFound(id.clone())))?;
        let current = &self.document.elements[index];
        if current.tag() != element.tag() {
            return Err(violation(DesignerError::TypeChanged {
                id: id.clone(),
                from: current.tag(),
                to: element.tag(),
            }));
        }
        if element.id != *id && self.document.contains(&element.id) {
            return Err(violation(DesignerError::DuplicateId(element.id)));
        }
        if self.document.selected.as_ref() == Some(id) {
            self.document.selected = Some(element.id.clone());
        }
        self.document.elements[index] = element;
        self.dirty = true;
        Ok(())
    }

    /// Select an element, or clear the selection with `None`
    pub fn set_selected_element(&mut self, id: Option<ElementId>) -> Result<(), DesignerError> {
        if let Some(id) = &id {
            if !self.document.contains(id) {
                return Err(violation(DesignerError::ElementNotFound(id.clone())));
            }
        }
        self.document.selected = id;
        Ok(())
    }

    /// Replace the whole sequence; a selection that no longer resolves is cleared
    pub fn set_elements(&mut self, elements: Vec<FieldElement>) -> Result<(), DesignerError> {
        for (i, element) in elements.iter().enumerate() {
            if elements[..i].iter().any(|e| e.id == element.id) {
                return Err(violation(DesignerError::DuplicateId(element.id.clone())));
            }
        }
        self.document.elements = elements;
        if let Some(selected) = &self.document.selected {
            if !self.document.contains(selected) {
                self.document.selected = None;
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Move `id` next to `over`: before it for the top half, after it for
    /// the bottom half. Dropping an element on itself changes nothing.
    pub fn move_element(
        &mut self,
        id: &ElementId,
        over: &ElementId,
        half: Half,
    ) -> Result<(), DesignerError> {
        if id == over {
            return Ok(());
        }
        let from = self
            .document
            .position(id)
            .ok_or_else(|| violation(DesignerError::ElementNotFound(id.clone())))?;
        if !self.document.contains(over) {
            return Err(violation(DesignerError::ElementNotFound(over.clone())));
        }
        let moved = self.document.elements.remove(from);
        // Position of `over` in the sequence without the moved element
        let target = self.document.position(over).unwrap_or(self.document.len());
        let index = match half {
            Half::Top => target,
            Half::Bottom => target + 1,
        };
        self.document.elements.insert(index, moved);
        self.dirty = true;
        Ok(())
    }

    /// Apply a completed drag gesture. Returns the inserted or moved element.
    pub fn apply_drop(
        &mut self,
        command: DropCommand,
    ) -> Result<Option<ElementId>, DesignerError> {
        match command {
            DropCommand::InsertNew { tag, at } => {
                let index = match &at {
                    InsertAt::End => self.document.len(),
                    InsertAt::Before(x) => self.index_of(x)?,
                    InsertAt::After(x) => self.index_of(x)? + 1,
                };
                let element = construct_new(tag);
                let id = element.id.clone();
                self.add_element(index, element)?;
                Ok(Some(id))
            }
            DropCommand::MoveExisting { id, over, half } => {
                self.move_element(&id, &over, half)?;
                Ok(Some(id))
            }
        }
    }

    /// Keyboard reorder: swap the selection with its upper neighbour
    pub fn move_selected_up(&mut self) -> Result<bool, DesignerError> {
        let Some((id, index)) = self.selected_position() else {
            return Ok(false);
        };
        if index == 0 {
            return Ok(false);
        }
        let over = self.document.elements[index - 1].id.clone();
        self.move_element(&id, &over, Half::Top)?;
        Ok(true)
    }

    /// Keyboard reorder: swap the selection with its lower neighbour
    pub fn move_selected_down(&mut self) -> Result<bool, DesignerError> {
        let Some((id, index)) = self.selected_position() else {
            return Ok(false);
        };
        let Some(next) = self.document.elements.get(index + 1) else {
            return Ok(false);
        };
        let over = next.id.clone();
        self.move_element(&id, &over, Half::Bottom)?;
        Ok(true)
    }

    /// Move the selection to a neighbouring element, wrapping at both ends
    pub fn select_adjacent(&mut self, forward: bool) {
        if self.document.is_empty() {
            return;
        }
        let len = self.document.len();
        let next = match self.selected_position() {
            None if forward => 0,
            None => len - 1,
            Some((_, i)) if forward => (i + 1) % len,
            Some((_, i)) => (i + len - 1) % len,
        };
        self.document.selected = Some(self.document.elements[next].id.clone());
    }

    fn selected_position(&self) -> Option<(ElementId, usize)> {
        let id = self.document.selected.clone()?;
        let index = self.document.position(&id)?;
        Some((id, index))
    }

    fn index_of(&self, id: &ElementId) -> Result<usize, DesignerError> {
        self.document
            .position(id)
            .ok_or_else(|| violation(DesignerError::ElementNotFound(id.clone())))
    }
}
