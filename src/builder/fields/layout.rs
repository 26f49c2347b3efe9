//! Layout-only field kinds

use super::{check_len, parse_count, LABEL_LEN};
use crate::builder::element::{
    ElementId, FieldAttributes, FieldElement, FieldTypeTag, HeadingAttributes,
    ParagraphAttributes, SpacerAttributes,
};
use crate::builder::registry::{
    EntryState, FieldBehavior, InputKind, Property, PropertyError, PropertyValue,
};
use crate::builder::value::FieldValue;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const PARAGRAPH_MAX: usize = 500;
const SPACER_HEIGHT: (u16, u16) = (1, 8);
const SEPARATOR_WIDTH: usize = 40;

fn title_property(title: &str) -> Vec<Property> {
    vec![Property::new(
        "title",
        "Title",
        "Heading text",
        PropertyValue::Text(title.to_string()),
    )]
}

fn apply_title(key: &str, raw: &str) -> Result<HeadingAttributes, PropertyError> {
    match key {
        "title" => Ok(HeadingAttributes {
            title: check_len("Title", raw, LABEL_LEN.0, LABEL_LEN.1)?,
        }),
        other => Err(PropertyError::UnknownProperty(other.to_string())),
    }
}

pub struct TitleField;

impl FieldBehavior for TitleField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::TitleField
    }

    fn palette_label(&self) -> &'static str {
        "Title"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Title(HeadingAttributes::new("Title field")))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Title);
        vec![
            Line::from(Span::styled("Title", Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                attrs.title.clone(),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
        ]
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        _value: &FieldValue,
        _state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Title);
        vec![Line::from(Span::styled(
            attrs.title.clone(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))]
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::None
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        title_property(&narrow!(element, Title).title)
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let _ = narrow!(element, Title);
        let attrs = apply_title(key, raw)?;
        Ok(element.with_attributes(FieldAttributes::Title(attrs)))
    }

    fn validate(&self, _element: &FieldElement, _value: &FieldValue) -> bool {
        true
    }
}

pub struct SubTitleField;

impl FieldBehavior for SubTitleField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::SubTitleField
    }

    fn palette_label(&self) -> &'static str {
        "Subtitle"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(
            id,
            FieldAttributes::SubTitle(HeadingAttributes::new("Subtitle field")),
        )
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, SubTitle);
        vec![
            Line::from(Span::styled("Subtitle", Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                attrs.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ]
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        _value: &FieldValue,
        _state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, SubTitle);
        vec![Line::from(Span::styled(
            attrs.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))]
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::None
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        title_property(&narrow!(element, SubTitle).title)
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let _ = narrow!(element, SubTitle);
        let attrs = apply_title(key, raw)?;
        Ok(element.with_attributes(FieldAttributes::SubTitle(attrs)))
    }

    fn validate(&self, _element: &FieldElement, _value: &FieldValue) -> bool {
        true
    }
}

pub struct ParagraphField;

impl FieldBehavior for ParagraphField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::ParagraphField
    }

    fn palette_label(&self) -> &'static str {
        "Paragraph"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Paragraph(ParagraphAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Paragraph);
        let mut lines = vec![Line::from(Span::styled(
            "Paragraph",
            Style::default().fg(Color::DarkGray),
        ))];
        lines.extend(attrs.text.lines().map(|l| Line::from(l.to_string())));
        lines
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        _value: &FieldValue,
        _state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Paragraph);
        attrs.text.lines().map(|l| Line::from(l.to_string())).collect()
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::None
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        vec![Property::new(
            "text",
            "Text",
            "Body text shown between fields",
            PropertyValue::Text(narrow!(element, Paragraph).text.clone()),
        )]
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let _ = narrow!(element, Paragraph);
        match key {
            "text" => Ok(element.with_attributes(FieldAttributes::Paragraph(ParagraphAttributes {
                text: check_len("Text", raw, 2, PARAGRAPH_MAX)?,
            }))),
            other => Err(PropertyError::UnknownProperty(other.to_string())),
        }
    }

    fn validate(&self, _element: &FieldElement, _value: &FieldValue) -> bool {
        true
    }
}

pub struct SeparatorField;

impl FieldBehavior for SeparatorField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::SeparatorField
    }

    fn palette_label(&self) -> &'static str {
        "Separator"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Separator)
    }

    fn design_lines(&self, _element: &FieldElement) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled("Separator", Style::default().fg(Color::DarkGray))),
            Line::from("─".repeat(SEPARATOR_WIDTH)),
        ]
    }

    fn entry_lines(
        &self,
        _element: &FieldElement,
        _value: &FieldValue,
        _state: EntryState,
    ) -> Vec<Line<'static>> {
        vec![Line::from(Span::styled(
            "─".repeat(SEPARATOR_WIDTH),
            Style::default().fg(Color::DarkGray),
        ))]
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::None
    }

    fn properties(&self, _element: &FieldElement) -> Vec<Property> {
        Vec::new()
    }

    fn apply_property(
        &self,
        _element: &FieldElement,
        key: &str,
        _raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        Err(PropertyError::UnknownProperty(key.to_string()))
    }

    fn validate(&self, _element: &FieldElement, _value: &FieldValue) -> bool {
        true
    }
}

pub struct SpacerField;

impl FieldBehavior for SpacerField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::SpacerField
    }

    fn palette_label(&self) -> &'static str {
        "Spacer"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Spacer(SpacerAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Spacer);
        vec![
            Line::from(Span::styled("Spacer", Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                format!("↕ {} rows", attrs.height),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        _value: &FieldValue,
        _state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Spacer);
        (0..attrs.height).map(|_| Line::default()).collect()
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::None
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        vec![Property::new(
            "height",
            "Height",
            "Blank rows between fields (1-8)",
            PropertyValue::Count(narrow!(element, Spacer).height),
        )]
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let _ = narrow!(element, Spacer);
        match key {
            "height" => Ok(element.with_attributes(FieldAttributes::Spacer(SpacerAttributes {
                height: parse_count("Height", raw, SPACER_HEIGHT.0, SPACER_HEIGHT.1)?,
            }))),
            other => Err(PropertyError::UnknownProperty(other.to_string())),
        }
    }

    fn validate(&self, _element: &FieldElement, _value: &FieldValue) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_property_edit() {
        let element = TitleField.construct(ElementId::from("t"));
        let updated = TitleField.apply_property(&element, "title", "Survey").unwrap();
        assert_eq!(
            updated.attributes,
            FieldAttributes::Title(HeadingAttributes::new("Survey"))
        );
        assert_eq!(updated.id, element.id);
    }

    #[test]
    fn test_title_rejects_short_text() {
        let element = TitleField.construct(ElementId::from("t"));
        assert!(matches!(
            TitleField.apply_property(&element, "title", "x"),
            Err(PropertyError::Length { .. })
        ));
    }

    #[test]
    fn test_spacer_entry_height_follows_attribute() {
        let element = SpacerField.construct(ElementId::from("s"));
        let updated = SpacerField.apply_property(&element, "height", "5").unwrap();
        let lines =
            SpacerField.entry_lines(&updated, &FieldValue::default(), EntryState::default());
        assert_eq!(lines.len(), 5);
        assert!(SpacerField.apply_property(&element, "height", "9").is_err());
    }

    #[test]
    fn test_separator_has_no_properties() {
        let element = SeparatorField.construct(ElementId::from("s"));
        assert!(SeparatorField.properties(&element).is_empty());
        assert_eq!(
            SeparatorField.apply_property(&element, "label", "x"),
            Err(PropertyError::UnknownProperty("label".into()))
        );
    }

    #[test]
    #[should_panic(expected = "Title behavior received")]
    fn test_mismatched_element_is_fatal() {
        let element = SpacerField.construct(ElementId::from("s"));
        TitleField.design_lines(&element);
    }
}
