//! Form content as an ordered element sequence

use super::element::{ElementId, FieldElement};

/// Ordered elements of a form plus the ephemeral designer selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDocument {
    pub elements: Vec<FieldElement>,
    /// Never persisted; when set it names a present element
    pub selected: Option<ElementId>,
}

impl FormDocument {
    pub fn new(elements: Vec<FieldElement>) -> Self {
        Self {
            elements,
            selected: None,
        }
    }

    /// Parse persisted `content`; blank content is an empty form
    pub fn from_content_json(content: &str) -> Result<Self, serde_json::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(Self::new(serde_json::from_str(content)?))
    }

    pub fn to_content_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.elements)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn position(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&FieldElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.position(id).is_some()
    }

    pub fn selected_element(&self) -> Option<&FieldElement> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::element::FieldTypeTag;
    use crate::builder::registry::lookup;
    use pretty_assertions::assert_eq;

    fn sample() -> FormDocument {
        FormDocument::new(vec![
            lookup(FieldTypeTag::TitleField).construct(ElementId::from("t")),
            lookup(FieldTypeTag::TextField).construct(ElementId::from("name")),
            lookup(FieldTypeTag::SeparatorField).construct(ElementId::from("sep")),
            lookup(FieldTypeTag::CheckboxField).construct(ElementId::from("tags")),
        ])
    }

    #[test]
    fn test_blank_content_is_empty_form() {
        assert!(FormDocument::from_content_json("").unwrap().is_empty());
        assert!(FormDocument::from_content_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_content_json_keeps_order() {
        let doc = sample();
        let json = doc.to_content_json().unwrap();
        let back = FormDocument::from_content_json(&json).unwrap();
        assert_eq!(back.elements, doc.elements);
        assert_eq!(back.selected, None);
    }

    #[test]
    fn test_selection_is_not_persisted() {
        let mut doc = sample();
        doc.selected = Some(ElementId::from("name"));
        let json = doc.to_content_json().unwrap();
        assert!(!json.contains("selected"));
        assert_eq!(doc.selected_element().map(|e| e.tag()), Some(FieldTypeTag::TextField));
    }

    #[test]
    fn test_malformed_content_is_an_error() {
        assert!(FormDocument::from_content_json("{\"id\":1}").is_err());
    }
}
