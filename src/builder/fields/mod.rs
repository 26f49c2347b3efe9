//! Per-type behavior bundles
//!
//! - `layout`: title, subtitle, paragraph, separator, spacer
//! - `text`: single-line and multi-line text
//! - `number`: numeric input with optional bounds
//! - `date`: calendar date
//! - `choice`: select and checkbox group

/// Narrow an element's attributes to the variant a behavior owns.
///
/// Dispatch always goes through `lookup(element.tag())`, so a mismatch is a
/// broken invariant rather than bad input.
macro_rules! narrow {
    ($element:expr, $variant:ident) => {
        match &$element.attributes {
            $crate::builder::element::FieldAttributes::$variant(attrs) => attrs,
            other => panic!(
                "{} behavior received {} attributes",
                stringify!($variant),
                other.tag()
            ),
        }
    };
}

mod choice;
mod date;
mod layout;
mod number;
mod text;

pub use choice::{CheckboxField, SelectField};
pub use date::{accepts_date_char, format_date, parse_date, DateField};
pub use layout::{ParagraphField, SeparatorField, SpacerField, SubTitleField, TitleField};
pub use number::{accepts_number_char, NumberField};
pub use text::{TextAreaField, TextField};

use super::registry::{Property, PropertyError, PropertyValue};
use super::value::FieldValue;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub(crate) const LABEL_LEN: (usize, usize) = (2, 50);
pub(crate) const HELPER_TEXT_MAX: usize = 200;
pub(crate) const PLACEHOLDER_MAX: usize = 50;

/// Validate the character length of a text property
pub(crate) fn check_len(
    label: &'static str,
    raw: &str,
    min: usize,
    max: usize,
) -> Result<String, PropertyError> {
    let len = raw.chars().count();
    if len < min || len > max {
        return Err(PropertyError::Length { label, min, max });
    }
    Ok(raw.to_string())
}

pub(crate) fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "yes" | "1" | "on")
}

pub(crate) fn parse_optional_number(
    label: &'static str,
    raw: &str,
) -> Result<Option<f64>, PropertyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Some)
        .ok_or(PropertyError::NotANumber(label))
}

pub(crate) fn parse_count(
    label: &'static str,
    raw: &str,
    min: u16,
    max: u16,
) -> Result<u16, PropertyError> {
    let n = raw
        .trim()
        .parse::<u16>()
        .map_err(|_| PropertyError::NotANumber(label))?;
    if n < min || n > max {
        return Err(PropertyError::OutOfRange { label, min, max });
    }
    Ok(n)
}

/// Comma separated option list; empty input clears the list
pub(crate) fn parse_options(raw: &str) -> Result<Vec<String>, PropertyError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                Err(PropertyError::BlankOption)
            } else {
                Ok(item.to_string())
            }
        })
        .collect()
}

/// Required fields need a non-empty value, everything else passes
pub(crate) fn required_check(required: bool, value: &FieldValue) -> bool {
    !required || !value.is_empty()
}

/// Common editable attributes of input kinds
pub(crate) struct CommonInput<'a> {
    pub label: &'a mut String,
    pub helper_text: &'a mut String,
    pub required: &'a mut bool,
    pub placeholder: Option<&'a mut String>,
}

impl CommonInput<'_> {
    /// Apply `key` if it is one of the common properties; `Ok(false)` otherwise
    pub fn apply(&mut self, key: &str, raw: &str) -> Result<bool, PropertyError> {
        match key {
            "label" => *self.label = check_len("Label", raw, LABEL_LEN.0, LABEL_LEN.1)?,
            "helperText" => {
                *self.helper_text = check_len("Helper text", raw, 0, HELPER_TEXT_MAX)?
            }
            "required" => *self.required = parse_flag(raw),
            "placeHolder" => match self.placeholder.as_mut() {
                Some(placeholder) => {
                    **placeholder = check_len("Placeholder", raw, 0, PLACEHOLDER_MAX)?
                }
                None => return Ok(false),
            },
            _ => return Ok(false),
        }
        Ok(true)
    }
}

pub(crate) fn common_properties(
    label: &str,
    helper_text: &str,
    required: bool,
    placeholder: Option<&str>,
) -> Vec<Property> {
    let mut props = vec![Property::new(
        "label",
        "Label",
        "Shown above the field",
        PropertyValue::Text(label.to_string()),
    )];
    if let Some(placeholder) = placeholder {
        props.push(Property::new(
            "placeHolder",
            "Placeholder",
            "Shown while the field is empty",
            PropertyValue::Text(placeholder.to_string()),
        ));
    }
    props.push(Property::new(
        "helperText",
        "Helper text",
        "Shown below the field",
        PropertyValue::Text(helper_text.to_string()),
    ));
    props.push(Property::new(
        "required",
        "Required",
        "Respondents must fill this field",
        PropertyValue::Flag(required),
    ));
    props
}

fn error_style(invalid: bool, base: Style) -> Style {
    if invalid {
        base.fg(Color::Red)
    } else {
        base
    }
}

pub(crate) fn label_line(label: &str, required: bool, invalid: bool) -> Line<'static> {
    let style = error_style(invalid, Style::default().add_modifier(Modifier::BOLD));
    let mut spans = vec![Span::styled(label.to_string(), style)];
    if required {
        spans.push(Span::styled("*", style.fg(Color::Red)));
    }
    Line::from(spans)
}

pub(crate) fn helper_line(helper_text: &str, invalid: bool) -> Option<Line<'static>> {
    if helper_text.is_empty() {
        return None;
    }
    let style = error_style(invalid, Style::default().fg(Color::DarkGray));
    Some(Line::from(Span::styled(helper_text.to_string(), style)))
}

/// Single-line input box: the value, or the placeholder while empty
pub(crate) fn input_line(
    value: &str,
    placeholder: &str,
    focused: bool,
    invalid: bool,
) -> Line<'static> {
    let border = if invalid {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![Span::styled("[ ", border)];
    if value.is_empty() {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(value.to_string()));
    }
    if focused {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }
    spans.push(Span::styled(" ]", border));
    Line::from(spans)
}

/// Assemble label, body and helper text into one block of lines
pub(crate) fn framed(
    label: Line<'static>,
    body: Vec<Line<'static>>,
    helper: Option<Line<'static>>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(label);
    lines.extend(body);
    lines.extend(helper);
    lines
}
