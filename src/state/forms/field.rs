//! Text input value objects

/// A single labelled text input of a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub is_multiline: bool,
    /// Maximum number of characters accepted
    pub max_len: usize,
}

impl InputField {
    /// Create an empty field
    pub fn text(name: &'static str, label: &'static str, max_len: usize) -> Self {
        Self {
            name,
            label,
            value: String::new(),
            is_multiline: false,
            max_len,
        }
    }

    /// Create a field pre-filled with `value`
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.chars().take(self.max_len).collect();
        self
    }

    pub fn multiline(mut self) -> Self {
        self.is_multiline = true;
        self
    }

    pub fn as_text(&self) -> &str {
        &self.value
    }

    /// Push a character, ignoring input past the length limit
    pub fn push_char(&mut self, c: char) {
        if self.value.chars().count() < self.max_len {
            self.value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.value.pop();
    }
}
