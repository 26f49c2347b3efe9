//! Respondent-side value collection and validation
//!
//! A [`SubmissionSession`] holds the values typed into a published form.
//! Fields are checked when focus leaves them and all together on submit;
//! the store only ever sees a complete mapping that passed validation.

use super::element::{ElementId, FieldElement};
use super::fields::{accepts_date_char, accepts_number_char};
use super::registry::{behavior_of, EntryState, InputKind};
use super::value::{FieldValue, SubmissionValues};
use crate::store::{FormStore, StoreError};
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Filling,
    /// Terminal: values were handed to the store
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Fields that failed validation; nothing was sent
    Invalid(BTreeSet<ElementId>),
    Submitted,
}

#[derive(Debug, Clone)]
pub struct SubmissionSession {
    elements: Vec<FieldElement>,
    values: SubmissionValues,
    invalid: BTreeSet<ElementId>,
    /// Index into the elements that accept input
    focus: usize,
    /// Highlighted option of the focused choice field
    cursor: usize,
    status: SubmissionStatus,
}

impl SubmissionSession {
    pub fn new(elements: Vec<FieldElement>) -> Self {
        Self {
            elements,
            values: SubmissionValues::new(),
            invalid: BTreeSet::new(),
            focus: 0,
            cursor: 0,
            status: SubmissionStatus::Filling,
        }
    }

    pub fn elements(&self) -> &[FieldElement] {
        &self.elements
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn invalid(&self) -> &BTreeSet<ElementId> {
        &self.invalid
    }

    /// Current value, or the type's empty value when untouched
    pub fn value(&self, id: &ElementId) -> FieldValue {
        if let Some(value) = self.values.get(id) {
            return value.clone();
        }
        self.element(id)
            .map(|e| behavior_of(e).empty_value())
            .unwrap_or_default()
    }

    fn element(&self, id: &ElementId) -> Option<&FieldElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    fn input_elements(&self) -> impl Iterator<Item = &FieldElement> {
        self.elements
            .iter()
            .filter(|e| behavior_of(e).input_kind(e).accepts_input())
    }

    pub fn focused_id(&self) -> Option<&ElementId> {
        self.input_elements().nth(self.focus).map(|e| &e.id)
    }

    fn focused(&self) -> Option<(&FieldElement, InputKind)> {
        let element = self.input_elements().nth(self.focus)?;
        Some((element, behavior_of(element).input_kind(element)))
    }

    /// Input kind of the focused field
    pub fn focused_kind(&self) -> Option<InputKind> {
        self.focused().map(|(_, kind)| kind)
    }

    /// Render state for one element
    pub fn entry_state(&self, id: &ElementId) -> EntryState {
        let focused = self.focused_id() == Some(id);
        EntryState {
            focused,
            invalid: self.invalid.contains(id),
            cursor: if focused { self.cursor } else { 0 },
        }
    }

    /// Per-field change callback; a field marked invalid is cleared as soon
    /// as its new value passes
    pub fn set_value(&mut self, id: &ElementId, value: FieldValue) {
        if self.status == SubmissionStatus::Submitted {
            return;
        }
        self.values.insert(id.clone(), value);
        if self.invalid.contains(id) {
            self.validate_field(id);
        }
    }

    /// Check one field and update its invalid mark
    pub fn validate_field(&mut self, id: &ElementId) -> bool {
        let Some(element) = self.element(id) else {
            return true;
        };
        let valid = behavior_of(element).validate(element, &self.value(id));
        if valid {
            self.invalid.remove(id);
        } else {
            self.invalid.insert(id.clone());
        }
        valid
    }

    /// Validate every element; the complete mapping on success, the failing
    /// ids otherwise
    pub fn validate_all(&self) -> Result<SubmissionValues, BTreeSet<ElementId>> {
        let mut values = SubmissionValues::new();
        let mut failed = BTreeSet::new();
        for element in &self.elements {
            let value = self.value(&element.id);
            if !behavior_of(element).validate(element, &value) {
                failed.insert(element.id.clone());
            }
            values.insert(element.id.clone(), value);
        }
        if failed.is_empty() {
            Ok(values)
        } else {
            Err(failed)
        }
    }

    /// Validate and hand the values to the store exactly once
    pub async fn submit(
        &mut self,
        store: &dyn FormStore,
        token: &str,
    ) -> Result<SubmitOutcome, StoreError> {
        if self.status == SubmissionStatus::Submitted {
            return Ok(SubmitOutcome::Submitted);
        }
        let values = match self.validate_all() {
            Ok(values) => values,
            Err(failed) => {
                info!("Submission blocked by {} invalid fields", failed.len());
                self.invalid = failed.clone();
                return Ok(SubmitOutcome::Invalid(failed));
            }
        };
        if let Err(e) = store.record_submission(token, values).await {
            warn!("Failed to record submission: {e}");
            return Err(e);
        }
        self.invalid.clear();
        self.status = SubmissionStatus::Submitted;
        Ok(SubmitOutcome::Submitted)
    }

    /// Move focus to the next input field, checking the one being left
    pub fn focus_next(&mut self) {
        let count = self.input_elements().count();
        if count > 0 {
            self.move_focus((self.focus + 1) % count);
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.input_elements().count();
        if count > 0 {
            self.move_focus((self.focus + count - 1) % count);
        }
    }

    /// Focus a field directly
    pub fn focus_element(&mut self, id: &ElementId) {
        let found = self.input_elements().position(|e| &e.id == id);
        if let Some(index) = found {
            self.move_focus(index);
        }
    }

    fn move_focus(&mut self, index: usize) {
        if index == self.focus {
            return;
        }
        if let Some(id) = self.focused_id().cloned() {
            self.validate_field(&id);
        }
        self.focus = index;
        self.cursor = 0;
    }

    /// Type a character into the focused field. Space toggles the
    /// highlighted option of choice fields.
    pub fn input_char(&mut self, c: char) {
        let Some((element, kind)) = self.focused() else {
            return;
        };
        let id = element.id.clone();
        let mut value = self.value(&id);
        let text = value.as_text().to_string();
        let accepted = match kind {
            InputKind::None => false,
            InputKind::Text | InputKind::Multiline { .. } => true,
            InputKind::Number => accepts_number_char(&text, c),
            InputKind::Date => accepts_date_char(&text, c),
            InputKind::Choice(_) | InputKind::MultiChoice(_) => {
                if c == ' ' {
                    self.toggle_option();
                }
                return;
            }
        };
        if accepted {
            value = FieldValue::Text(format!("{text}{c}"));
            self.set_value(&id, value);
        }
    }

    /// Line break in multi-line fields
    pub fn newline(&mut self) {
        if let Some((element, InputKind::Multiline { .. })) = self.focused() {
            let id = element.id.clone();
            let text = format!("{}\n", self.value(&id).as_text());
            self.set_value(&id, FieldValue::Text(text));
        }
    }

    pub fn backspace(&mut self) {
        let Some((element, kind)) = self.focused() else {
            return;
        };
        if matches!(
            kind,
            InputKind::None | InputKind::Choice(_) | InputKind::MultiChoice(_)
        ) {
            return;
        }
        let id = element.id.clone();
        let mut text = self.value(&id).as_text().to_string();
        if text.pop().is_some() {
            self.set_value(&id, FieldValue::Text(text));
        }
    }

    /// Move the option highlight of the focused choice field
    pub fn move_cursor(&mut self, down: bool) {
        let Some((_, kind)) = self.focused() else {
            return;
        };
        let count = kind.options().len();
        if count == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % count
        } else {
            (self.cursor + count - 1) % count
        };
    }

    /// Pick (select) or toggle (checkbox) the highlighted option
    pub fn toggle_option(&mut self) {
        let Some((element, kind)) = self.focused() else {
            return;
        };
        let id = element.id.clone();
        let Some(option) = kind.options().get(self.cursor).cloned() else {
            return;
        };
        let value = match kind {
            InputKind::Choice(_) => FieldValue::Text(option),
            InputKind::MultiChoice(options) => {
                let mut value = self.value(&id);
                value.toggle(&option, &options);
                value
            }
            _ => return,
        };
        self.set_value(&id, value);
    }
}
