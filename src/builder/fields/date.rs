//! Calendar date input
//!
//! Values are stored as ISO dates (`YYYY-MM-DD`). Full RFC 3339 timestamps
//! are accepted when reading so older submissions still display.

use super::{
    common_properties, framed, helper_line, input_line, label_line, required_check,
    CommonInput,
};
use crate::builder::element::{
    DateAttributes, ElementId, FieldAttributes, FieldElement, FieldTypeTag,
};
use crate::builder::registry::{EntryState, FieldBehavior, InputKind, Property, PropertyError};
use crate::builder::value::FieldValue;
use chrono::{DateTime, NaiveDate};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

const DATE_PLACEHOLDER: &str = "YYYY-MM-DD";
const ISO_DATE_LEN: usize = 10;

/// Parse a stored date value
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// `dd/mm/yyyy` rendering used in tables; unparsable input is shown as is
pub fn format_date(value: &str) -> String {
    parse_date(value)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Whether `c` may be typed into a date field holding `current`
pub fn accepts_date_char(current: &str, c: char) -> bool {
    current.len() < ISO_DATE_LEN && (c.is_ascii_digit() || c == '-')
}

pub struct DateField;

impl DateField {
    fn input(value: &str, focused: bool, invalid: bool) -> Line<'static> {
        let mut line = input_line(value, DATE_PLACEHOLDER, focused, invalid);
        if let Some(date) = parse_date(value) {
            line.spans.push(Span::styled(
                format!(" {}", date.format("%a, %-d %b %Y")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        line
    }
}

impl FieldBehavior for DateField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::DateField
    }

    fn palette_label(&self) -> &'static str {
        "Date"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Date(DateAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Date);
        framed(
            label_line(&attrs.label, attrs.required, false),
            vec![Self::input("", false, false)],
            helper_line(&attrs.helper_text, false),
        )
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        value: &FieldValue,
        state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Date);
        framed(
            label_line(&attrs.label, attrs.required, state.invalid),
            vec![Self::input(value.as_text(), state.focused, state.invalid)],
            helper_line(&attrs.helper_text, state.invalid),
        )
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::Date
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        let attrs = narrow!(element, Date);
        common_properties(&attrs.label, &attrs.helper_text, attrs.required, None)
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let mut attrs = narrow!(element, Date).clone();
        let handled = CommonInput {
            label: &mut attrs.label,
            helper_text: &mut attrs.helper_text,
            required: &mut attrs.required,
            placeholder: None,
        }
        .apply(key, raw)?;
        if !handled {
            return Err(PropertyError::UnknownProperty(key.to_string()));
        }
        Ok(element.with_attributes(FieldAttributes::Date(attrs)))
    }

    fn validate(&self, element: &FieldElement, value: &FieldValue) -> bool {
        required_check(narrow!(element, Date).required, value)
    }
}
