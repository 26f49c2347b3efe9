//! Field type registry
//!
//! Every field kind supplies one [`FieldBehavior`] implementation. All
//! consumers (designer canvas, property panel, submission view, validator)
//! dispatch through [`lookup`] instead of branching on the element type.
//!
//! The tag set is a closed enum, so `lookup` is an exhaustive match: an
//! unknown tag cannot be represented, let alone looked up.

use super::element::{ElementId, FieldElement, FieldTypeTag};
use super::fields::{
    CheckboxField, DateField, NumberField, ParagraphField, SelectField, SeparatorField,
    SpacerField, SubTitleField, TextAreaField, TextField, TitleField,
};
use super::value::FieldValue;
use ratatui::text::Line;
use thiserror::Error;

/// Palette section a field kind is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteGroup {
    Layout,
    Input,
}

/// How the data-entry view accepts input for a field
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    /// Layout kinds, nothing to enter
    None,
    Text,
    Multiline { rows: u16 },
    Number,
    Date,
    Choice(Vec<String>),
    MultiChoice(Vec<String>),
}

impl InputKind {
    pub fn accepts_input(&self) -> bool {
        !matches!(self, InputKind::None)
    }

    pub fn options(&self) -> &[String] {
        match self {
            InputKind::Choice(options) | InputKind::MultiChoice(options) => options,
            _ => &[],
        }
    }
}

/// Render state of a field in the data-entry view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryState {
    pub focused: bool,
    pub invalid: bool,
    /// Highlighted option for choice fields
    pub cursor: usize,
}

/// Editable value of a single property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Flag(bool),
    Number(Option<f64>),
    Count(u16),
    List(Vec<String>),
}

impl PropertyValue {
    /// Raw text used to seed the property editor's input buffer
    pub fn to_input(&self) -> String {
        match self {
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Flag(b) => b.to_string(),
            PropertyValue::Number(Some(n)) => n.to_string(),
            PropertyValue::Number(None) => String::new(),
            PropertyValue::Count(n) => n.to_string(),
            PropertyValue::List(items) => items.join(", "),
        }
    }
}

/// One row of the property editor
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(
        key: &'static str,
        label: &'static str,
        description: &'static str,
        value: PropertyValue,
    ) -> Self {
        Self {
            key,
            label,
            description,
            value,
        }
    }
}

/// Rejected property edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("{label} must be between {min} and {max} characters")]
    Length {
        label: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{label} must be between {min} and {max}")]
    OutOfRange {
        label: &'static str,
        min: u16,
        max: u16,
    },
    #[error("minimum must not exceed maximum")]
    InvertedRange,
    #[error("options must not be blank")]
    BlankOption,
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
}

/// Behavior bundle of one field kind
pub trait FieldBehavior: Sync {
    fn tag(&self) -> FieldTypeTag;

    /// Text of the palette button
    fn palette_label(&self) -> &'static str;

    fn palette_group(&self) -> PaletteGroup {
        if self.tag().is_layout() {
            PaletteGroup::Layout
        } else {
            PaletteGroup::Input
        }
    }

    /// Whether the kind contributes a submission column
    fn is_input(&self) -> bool {
        !self.tag().is_layout()
    }

    /// New element with the kind's default attributes
    fn construct(&self, id: ElementId) -> FieldElement;

    /// Read-only preview drawn on the designer canvas
    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>>;

    /// Data-entry view shown to respondents
    fn entry_lines(
        &self,
        element: &FieldElement,
        value: &FieldValue,
        state: EntryState,
    ) -> Vec<Line<'static>>;

    fn input_kind(&self, element: &FieldElement) -> InputKind;

    /// Value a field holds before the respondent touches it
    fn empty_value(&self) -> FieldValue {
        FieldValue::Text(String::new())
    }

    /// Property editor rows
    fn properties(&self, element: &FieldElement) -> Vec<Property>;

    /// Commit one property edit, producing the replacement element
    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError>;

    /// Pure check of a submitted value
    fn validate(&self, element: &FieldElement, value: &FieldValue) -> bool;
}

/// Behavior bundle for `tag`
pub fn lookup(tag: FieldTypeTag) -> &'static dyn FieldBehavior {
    match tag {
        FieldTypeTag::TitleField => &TitleField,
        FieldTypeTag::SubTitleField => &SubTitleField,
        FieldTypeTag::ParagraphField => &ParagraphField,
        FieldTypeTag::SeparatorField => &SeparatorField,
        FieldTypeTag::SpacerField => &SpacerField,
        FieldTypeTag::TextField => &TextField,
        FieldTypeTag::TextAreaField => &TextAreaField,
        FieldTypeTag::NumberField => &NumberField,
        FieldTypeTag::DateField => &DateField,
        FieldTypeTag::SelectField => &SelectField,
        FieldTypeTag::CheckboxField => &CheckboxField,
    }
}

/// Behavior bundle for an element's own type
pub fn behavior_of(element: &FieldElement) -> &'static dyn FieldBehavior {
    lookup(element.tag())
}

/// Construct a new element of `tag` with a freshly generated id
pub fn construct_new(tag: FieldTypeTag) -> FieldElement {
    lookup(tag).construct(ElementId::generate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_covers_every_tag() {
        for tag in FieldTypeTag::ALL {
            assert_eq!(lookup(tag).tag(), tag);
        }
    }

    #[test]
    fn test_construct_is_deterministic_apart_from_id() {
        for tag in FieldTypeTag::ALL {
            let behavior = lookup(tag);
            let a = behavior.construct(ElementId::from("a"));
            let b = behavior.construct(ElementId::from("b"));
            assert_eq!(a.attributes, b.attributes);
            assert_eq!(a.id, ElementId::from("a"));
            assert_eq!(a.tag(), tag);
        }
    }

    #[test]
    fn test_palette_groups() {
        assert_eq!(
            lookup(FieldTypeTag::SeparatorField).palette_group(),
            PaletteGroup::Layout
        );
        assert_eq!(
            lookup(FieldTypeTag::NumberField).palette_group(),
            PaletteGroup::Input
        );
    }

    #[test]
    fn test_layout_kinds_have_no_input() {
        for tag in FieldTypeTag::ALL.into_iter().filter(|t| t.is_layout()) {
            let element = construct_new(tag);
            assert_eq!(behavior_of(&element).input_kind(&element), InputKind::None);
            assert!(behavior_of(&element).validate(&element, &FieldValue::default()));
        }
    }

    #[test]
    fn test_every_kind_renders_a_preview() {
        for tag in FieldTypeTag::ALL {
            let element = construct_new(tag);
            assert!(!behavior_of(&element).design_lines(&element).is_empty());
        }
    }

    #[test]
    fn test_property_value_to_input() {
        assert_eq!(PropertyValue::Flag(true).to_input(), "true");
        assert_eq!(PropertyValue::Number(None).to_input(), "");
        assert_eq!(PropertyValue::Number(Some(2.5)).to_input(), "2.5");
        assert_eq!(
            PropertyValue::List(vec!["a".into(), "b".into()]).to_input(),
            "a, b"
        );
    }
}
