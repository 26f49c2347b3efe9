//! Numeric input

use super::{
    common_properties, framed, helper_line, input_line, label_line, parse_optional_number,
    required_check, CommonInput,
};
use crate::builder::element::{
    ElementId, FieldAttributes, FieldElement, FieldTypeTag, NumberAttributes,
};
use crate::builder::registry::{
    EntryState, FieldBehavior, InputKind, Property, PropertyError, PropertyValue,
};
use crate::builder::value::FieldValue;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

pub struct NumberField;

impl NumberField {
    /// Hint such as `(suggested 1 to 10)`; bounds are advisory and never validated
    fn bounds_hint(attrs: &NumberAttributes) -> Option<Span<'static>> {
        let text = match (attrs.min, attrs.max) {
            (Some(min), Some(max)) => format!(" (suggested {min} to {max})"),
            (Some(min), None) => format!(" (suggested ≥ {min})"),
            (None, Some(max)) => format!(" (suggested ≤ {max})"),
            (None, None) => return None,
        };
        Some(Span::styled(text, Style::default().fg(Color::DarkGray)))
    }

    fn input(attrs: &NumberAttributes, value: &str, focused: bool, invalid: bool) -> Line<'static> {
        let mut line = input_line(value, &attrs.placeholder, focused, invalid);
        line.spans.extend(Self::bounds_hint(attrs));
        line
    }
}

impl FieldBehavior for NumberField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::NumberField
    }

    fn palette_label(&self) -> &'static str {
        "Number"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Number(NumberAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Number);
        framed(
            label_line(&attrs.label, attrs.required, false),
            vec![Self::input(attrs, "", false, false)],
            helper_line(&attrs.helper_text, false),
        )
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        value: &FieldValue,
        state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Number);
        framed(
            label_line(&attrs.label, attrs.required, state.invalid),
            vec![Self::input(
                attrs,
                value.as_text(),
                state.focused,
                state.invalid,
            )],
            helper_line(&attrs.helper_text, state.invalid),
        )
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::Number
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        let attrs = narrow!(element, Number);
        let mut props = common_properties(
            &attrs.label,
            &attrs.helper_text,
            attrs.required,
            Some(&attrs.placeholder),
        );
        props.push(Property::new(
            "min",
            "Minimum",
            "Suggested lowest value, shown as a hint and not enforced (blank for none)",
            PropertyValue::Number(attrs.min),
        ));
        props.push(Property::new(
            "max",
            "Maximum",
            "Suggested highest value, shown as a hint and not enforced (blank for none)",
            PropertyValue::Number(attrs.max),
        ));
        props
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let mut attrs = narrow!(element, Number).clone();
        match key {
            "min" => attrs.min = parse_optional_number("Minimum", raw)?,
            "max" => attrs.max = parse_optional_number("Maximum", raw)?,
            _ => {
                let handled = CommonInput {
                    label: &mut attrs.label,
                    helper_text: &mut attrs.helper_text,
                    required: &mut attrs.required,
                    placeholder: Some(&mut attrs.placeholder),
                }
                .apply(key, raw)?;
                if !handled {
                    return Err(PropertyError::UnknownProperty(key.to_string()));
                }
            }
        }
        if let (Some(min), Some(max)) = (attrs.min, attrs.max) {
            if min > max {
                return Err(PropertyError::InvertedRange);
            }
        }
        Ok(element.with_attributes(FieldAttributes::Number(attrs)))
    }

    fn validate(&self, element: &FieldElement, value: &FieldValue) -> bool {
        required_check(narrow!(element, Number).required, value)
    }
}

/// Whether `c` may be typed into a number field holding `current`
pub fn accepts_number_char(current: &str, c: char) -> bool {
    match c {
        '0'..='9' => true,
        '-' => current.is_empty(),
        '.' => !current.contains('.'),
        _ => false,
    }
}
