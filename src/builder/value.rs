//! Submitted field values

use super::element::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field's value: plain text or an ordered set of choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Set(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Set(items) => items.is_empty(),
        }
    }

    /// Text content (empty for sets)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Set(_) => "",
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        match self {
            FieldValue::Text(s) => s == item,
            FieldValue::Set(items) => items.iter().any(|i| i == item),
        }
    }

    /// Toggle membership of `item`, keeping the order given by `options`
    pub fn toggle(&mut self, item: &str, options: &[String]) {
        let mut items = match std::mem::take(self) {
            FieldValue::Set(items) => items,
            FieldValue::Text(s) if s.is_empty() => Vec::new(),
            FieldValue::Text(s) => vec![s],
        };
        if let Some(pos) = items.iter().position(|i| i == item) {
            items.remove(pos);
        } else {
            items.push(item.to_string());
        }
        items.sort_by_key(|i| options.iter().position(|o| o == i).unwrap_or(usize::MAX));
        *self = FieldValue::Set(items);
    }

    /// Value as shown in tables and summaries
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Set(items) => items.join(", "),
        }
    }
}

/// Complete value mapping handed over on submit
pub type SubmissionValues = BTreeMap<ElementId, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_text() {
        let value = FieldValue::default();
        assert!(value.is_empty());
        assert_eq!(value.as_text(), "");
    }

    #[test]
    fn test_toggle_keeps_option_order() {
        let options = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut value = FieldValue::Set(Vec::new());
        value.toggle("c", &options);
        value.toggle("a", &options);
        assert_eq!(value, FieldValue::Set(vec!["a".into(), "c".into()]));

        value.toggle("c", &options);
        assert_eq!(value, FieldValue::Set(vec!["a".into()]));
    }

    #[test]
    fn test_untagged_json_shape() {
        let text = serde_json::to_string(&FieldValue::Text("hi".into())).unwrap();
        assert_eq!(text, "\"hi\"");
        let set: FieldValue = serde_json::from_str("[\"x\",\"y\"]").unwrap();
        assert_eq!(set.display(), "x, y");
        assert!(set.contains("y"));
    }
}
