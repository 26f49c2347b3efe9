//! Field elements and their typed attribute records
//!
//! A [`FieldElement`] pairs an id with a [`FieldAttributes`] variant. The
//! element's type is derived from the variant, so it can never change after
//! construction. On disk an element keeps the `{ id, type, extraAttributes }`
//! shape.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Identifier of an element, unique within its document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "StoredId", into = "String")]
pub struct ElementId(String);

/// Older documents stored ids as bare numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(u64),
}

impl From<StoredId> for ElementId {
    fn from(value: StoredId) -> Self {
        match value {
            StoredId::Text(s) => Self(s),
            StoredId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<ElementId> for String {
    fn from(value: ElementId) -> Self {
        value.0
    }
}

impl ElementId {
    /// Generate a fresh collision-resistant id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldTypeTag {
    TitleField,
    SubTitleField,
    ParagraphField,
    SeparatorField,
    SpacerField,
    TextField,
    TextAreaField,
    NumberField,
    DateField,
    SelectField,
    CheckboxField,
}

impl FieldTypeTag {
    /// Every tag, in palette order
    pub const ALL: [FieldTypeTag; 11] = [
        FieldTypeTag::TitleField,
        FieldTypeTag::SubTitleField,
        FieldTypeTag::ParagraphField,
        FieldTypeTag::SeparatorField,
        FieldTypeTag::SpacerField,
        FieldTypeTag::TextField,
        FieldTypeTag::TextAreaField,
        FieldTypeTag::NumberField,
        FieldTypeTag::DateField,
        FieldTypeTag::SelectField,
        FieldTypeTag::CheckboxField,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TitleField => "TitleField",
            Self::SubTitleField => "SubTitleField",
            Self::ParagraphField => "ParagraphField",
            Self::SeparatorField => "SeparatorField",
            Self::SpacerField => "SpacerField",
            Self::TextField => "TextField",
            Self::TextAreaField => "TextAreaField",
            Self::NumberField => "NumberField",
            Self::DateField => "DateField",
            Self::SelectField => "SelectField",
            Self::CheckboxField => "CheckboxField",
        }
    }

    /// Layout kinds carry no respondent input
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            Self::TitleField
                | Self::SubTitleField
                | Self::ParagraphField
                | Self::SeparatorField
                | Self::SpacerField
        )
    }
}

impl fmt::Display for FieldTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes shared by single-line inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    #[serde(rename = "placeHolder")]
    pub placeholder: String,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            label: "Text field".to_string(),
            helper_text: "Helper text".to_string(),
            required: false,
            placeholder: "Value here...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextAreaAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    #[serde(rename = "placeHolder")]
    pub placeholder: String,
    pub rows: u16,
}

impl Default for TextAreaAttributes {
    fn default() -> Self {
        Self {
            label: "Text area".to_string(),
            helper_text: "Helper text".to_string(),
            required: false,
            placeholder: "Value here...".to_string(),
            rows: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    #[serde(rename = "placeHolder")]
    pub placeholder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Default for NumberAttributes {
    fn default() -> Self {
        Self {
            label: "Number field".to_string(),
            helper_text: "Helper text".to_string(),
            required: false,
            placeholder: "0".to_string(),
            min: None,
            max: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
}

impl Default for DateAttributes {
    fn default() -> Self {
        Self {
            label: "Date field".to_string(),
            helper_text: "Pick a date".to_string(),
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    #[serde(rename = "placeHolder")]
    pub placeholder: String,
    pub options: Vec<String>,
}

impl Default for SelectAttributes {
    fn default() -> Self {
        Self {
            label: "Select field".to_string(),
            helper_text: "Helper text".to_string(),
            required: false,
            placeholder: "Value here...".to_string(),
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckboxAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    pub options: Vec<String>,
}

impl Default for CheckboxAttributes {
    fn default() -> Self {
        Self {
            label: "Checkbox field".to_string(),
            helper_text: "Helper text".to_string(),
            required: false,
            options: Vec::new(),
        }
    }
}

/// Title and subtitle text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingAttributes {
    pub title: String,
}

impl HeadingAttributes {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

impl Default for HeadingAttributes {
    fn default() -> Self {
        Self::new("Title field")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphAttributes {
    pub text: String,
}

impl Default for ParagraphAttributes {
    fn default() -> Self {
        Self {
            text: "Text here".to_string(),
        }
    }
}

/// Height is measured in terminal rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerAttributes {
    pub height: u16,
}

impl Default for SpacerAttributes {
    fn default() -> Self {
        Self { height: 2 }
    }
}

/// Type-specific attributes, one variant per [`FieldTypeTag`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAttributes {
    Title(HeadingAttributes),
    SubTitle(HeadingAttributes),
    Paragraph(ParagraphAttributes),
    Separator,
    Spacer(SpacerAttributes),
    Text(TextAttributes),
    TextArea(TextAreaAttributes),
    Number(NumberAttributes),
    Date(DateAttributes),
    Select(SelectAttributes),
    Checkbox(CheckboxAttributes),
}

impl FieldAttributes {
    pub fn tag(&self) -> FieldTypeTag {
        match self {
            Self::Title(_) => FieldTypeTag::TitleField,
            Self::SubTitle(_) => FieldTypeTag::SubTitleField,
            Self::Paragraph(_) => FieldTypeTag::ParagraphField,
            Self::Separator => FieldTypeTag::SeparatorField,
            Self::Spacer(_) => FieldTypeTag::SpacerField,
            Self::Text(_) => FieldTypeTag::TextField,
            Self::TextArea(_) => FieldTypeTag::TextAreaField,
            Self::Number(_) => FieldTypeTag::NumberField,
            Self::Date(_) => FieldTypeTag::DateField,
            Self::Select(_) => FieldTypeTag::SelectField,
            Self::Checkbox(_) => FieldTypeTag::CheckboxField,
        }
    }

    /// Label shown for input kinds, `None` for layout kinds
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Text(a) => Some(&a.label),
            Self::TextArea(a) => Some(&a.label),
            Self::Number(a) => Some(&a.label),
            Self::Date(a) => Some(&a.label),
            Self::Select(a) => Some(&a.label),
            Self::Checkbox(a) => Some(&a.label),
            _ => None,
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Self::Text(a) => a.required,
            Self::TextArea(a) => a.required,
            Self::Number(a) => a.required,
            Self::Date(a) => a.required,
            Self::Select(a) => a.required,
            Self::Checkbox(a) => a.required,
            _ => false,
        }
    }
}

/// One field instance inside a form
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ElementRecord")]
pub struct FieldElement {
    pub id: ElementId,
    pub attributes: FieldAttributes,
}

impl FieldElement {
    pub fn new(id: ElementId, attributes: FieldAttributes) -> Self {
        Self { id, attributes }
    }

    pub fn tag(&self) -> FieldTypeTag {
        self.attributes.tag()
    }

    /// Same element with its attributes replaced wholesale
    pub fn with_attributes(&self, attributes: FieldAttributes) -> Self {
        Self {
            id: self.id.clone(),
            attributes,
        }
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldElement", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.tag())?;
        match &self.attributes {
            FieldAttributes::Title(a) | FieldAttributes::SubTitle(a) => {
                state.serialize_field("extraAttributes", a)?
            }
            FieldAttributes::Paragraph(a) => state.serialize_field("extraAttributes", a)?,
            FieldAttributes::Separator => {
                state.serialize_field("extraAttributes", &serde_json::Map::new())?
            }
            FieldAttributes::Spacer(a) => state.serialize_field("extraAttributes", a)?,
            FieldAttributes::Text(a) => state.serialize_field("extraAttributes", a)?,
            FieldAttributes::TextArea(a) => state.serialize_field("extraAttributes", a)?,
            FieldAttributes::Number(a) => state.serialize_field("extraAttributes", a)?,
            FieldAttributes::Date(a) => state.serialize_field("extraAttributes", a)?,
            FieldAttributes::Select(a) => state.serialize_field("extraAttributes", a)?,
            FieldAttributes::Checkbox(a) => state.serialize_field("extraAttributes", a)?,
        }
        state.end()
    }
}

/// Persisted element shape before the attributes are narrowed to their type
#[derive(Deserialize)]
struct ElementRecord {
    id: ElementId,
    #[serde(rename = "type")]
    tag: FieldTypeTag,
    #[serde(rename = "extraAttributes", default)]
    extra_attributes: serde_json::Value,
}

impl TryFrom<ElementRecord> for FieldElement {
    type Error = serde_json::Error;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let raw = match record.extra_attributes {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            other => other,
        };
        let attributes = match record.tag {
            FieldTypeTag::TitleField => FieldAttributes::Title(serde_json::from_value(raw)?),
            FieldTypeTag::SubTitleField => FieldAttributes::SubTitle(serde_json::from_value(raw)?),
            FieldTypeTag::ParagraphField => {
                FieldAttributes::Paragraph(serde_json::from_value(raw)?)
            }
            FieldTypeTag::SeparatorField => FieldAttributes::Separator,
            FieldTypeTag::SpacerField => FieldAttributes::Spacer(serde_json::from_value(raw)?),
            FieldTypeTag::TextField => FieldAttributes::Text(serde_json::from_value(raw)?),
            FieldTypeTag::TextAreaField => FieldAttributes::TextArea(serde_json::from_value(raw)?),
            FieldTypeTag::NumberField => FieldAttributes::Number(serde_json::from_value(raw)?),
            FieldTypeTag::DateField => FieldAttributes::Date(serde_json::from_value(raw)?),
            FieldTypeTag::SelectField => FieldAttributes::Select(serde_json::from_value(raw)?),
            FieldTypeTag::CheckboxField => FieldAttributes::Checkbox(serde_json::from_value(raw)?),
        };
        Ok(Self {
            id: record.id,
            attributes,
        })
    }
}
