//! Dialog forms for creating and editing form metadata

use super::field::InputField;

pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 200;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.set_active_field((self.active_field() + 1) % count);
        }
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.set_active_field((self.active_field() + count - 1) % count);
        }
    }
}

/// What a dialog commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    NewForm,
    Rename,
    Description,
}

impl DialogKind {
    pub fn title(&self) -> &'static str {
        match self {
            DialogKind::NewForm => "Create form",
            DialogKind::Rename => "Rename form",
            DialogKind::Description => "Edit description",
        }
    }
}

/// Modal text dialog state
#[derive(Debug, Clone)]
pub struct FormDialog {
    pub kind: DialogKind,
    pub fields: Vec<InputField>,
    pub active_field_index: usize,
    /// Rejection from the store, shown under the fields
    pub error: Option<String>,
}

impl FormDialog {
    /// Name and description of a new form
    pub fn new_form() -> Self {
        Self::with_fields(
            DialogKind::NewForm,
            vec![
                InputField::text("name", "Name", NAME_MAX),
                InputField::text("description", "Description", DESCRIPTION_MAX).multiline(),
            ],
        )
    }

    pub fn rename(current: &str) -> Self {
        Self::with_fields(
            DialogKind::Rename,
            vec![InputField::text("name", "Name", NAME_MAX).with_value(current)],
        )
    }

    pub fn description(current: &str) -> Self {
        Self::with_fields(
            DialogKind::Description,
            vec![InputField::text("description", "Description", DESCRIPTION_MAX)
                .with_value(current)
                .multiline()],
        )
    }

    fn with_fields(kind: DialogKind, fields: Vec<InputField>) -> Self {
        Self {
            kind,
            fields,
            active_field_index: 0,
            error: None,
        }
    }

    pub fn get_active_field_mut(&mut self) -> Option<&mut InputField> {
        self.fields.get_mut(self.active_field_index)
    }

    /// Value of the field called `name`
    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(InputField::as_text)
            .unwrap_or("")
    }

    pub fn input_char(&mut self, c: char) {
        self.error = None;
        if let Some(field) = self.get_active_field_mut() {
            field.push_char(c);
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        if let Some(field) = self.get_active_field_mut() {
            field.pop_char();
        }
    }
}

impl Form for FormDialog {
    fn field_count(&self) -> usize {
        self.fields.len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index;
    }
}
