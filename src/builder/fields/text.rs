//! Free text inputs

use super::{
    common_properties, framed, helper_line, input_line, label_line, parse_count,
    required_check, CommonInput,
};
use crate::builder::element::{
    ElementId, FieldAttributes, FieldElement, FieldTypeTag, TextAreaAttributes, TextAttributes,
};
use crate::builder::registry::{
    EntryState, FieldBehavior, InputKind, Property, PropertyError, PropertyValue,
};
use crate::builder::value::FieldValue;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

const ROWS_RANGE: (u16, u16) = (1, 10);

pub struct TextField;

impl FieldBehavior for TextField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::TextField
    }

    fn palette_label(&self) -> &'static str {
        "Text"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Text(TextAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Text);
        framed(
            label_line(&attrs.label, attrs.required, false),
            vec![input_line("", &attrs.placeholder, false, false)],
            helper_line(&attrs.helper_text, false),
        )
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        value: &FieldValue,
        state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Text);
        framed(
            label_line(&attrs.label, attrs.required, state.invalid),
            vec![input_line(
                value.as_text(),
                &attrs.placeholder,
                state.focused,
                state.invalid,
            )],
            helper_line(&attrs.helper_text, state.invalid),
        )
    }

    fn input_kind(&self, _element: &FieldElement) -> InputKind {
        InputKind::Text
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        let attrs = narrow!(element, Text);
        common_properties(
            &attrs.label,
            &attrs.helper_text,
            attrs.required,
            Some(&attrs.placeholder),
        )
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let mut attrs = narrow!(element, Text).clone();
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
        Ok(element.with_attributes(FieldAttributes::Text(attrs)))
    }

    fn validate(&self, element: &FieldElement, value: &FieldValue) -> bool {
        required_check(narrow!(element, Text).required, value)
    }
}

pub struct TextAreaField;

impl TextAreaField {
    fn body(
        attrs: &TextAreaAttributes,
        value: &str,
        focused: bool,
        invalid: bool,
    ) -> Vec<Line<'static>> {
        let border = if invalid {
            Style::default().fg(Color::Red)
        } else if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let rows = usize::from(attrs.rows.max(1));
        let mut text_lines: Vec<String> = value.split('\n').map(str::to_string).collect();
        let shows_placeholder = value.is_empty();
        if shows_placeholder {
            text_lines = vec![attrs.placeholder.clone()];
        }
        // Keep the tail visible while typing past the configured height
        let skip = text_lines.len().saturating_sub(rows);
        let mut lines: Vec<Line<'static>> = text_lines
            .into_iter()
            .skip(skip)
            .map(|text| {
                let content = if shows_placeholder {
                    Span::styled(text, Style::default().fg(Color::DarkGray))
                } else {
                    Span::raw(text)
                };
                Line::from(vec![Span::styled("│ ", border), content])
            })
            .collect();
        if focused {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled("▌", Style::default().fg(Color::Cyan)));
            }
        }
        while lines.len() < rows {
            lines.push(Line::from(Span::styled("│ ", border)));
        }
        lines
    }
}

impl FieldBehavior for TextAreaField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::TextAreaField
    }

    fn palette_label(&self) -> &'static str {
        "Text area"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::TextArea(TextAreaAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, TextArea);
        framed(
            label_line(&attrs.label, attrs.required, false),
            Self::body(attrs, "", false, false),
            helper_line(&attrs.helper_text, false),
        )
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        value: &FieldValue,
        state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, TextArea);
        framed(
            label_line(&attrs.label, attrs.required, state.invalid),
            Self::body(attrs, value.as_text(), state.focused, state.invalid),
            helper_line(&attrs.helper_text, state.invalid),
        )
    }

    fn input_kind(&self, element: &FieldElement) -> InputKind {
        InputKind::Multiline {
            rows: narrow!(element, TextArea).rows,
        }
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        let attrs = narrow!(element, TextArea);
        let mut props = common_properties(
            &attrs.label,
            &attrs.helper_text,
            attrs.required,
            Some(&attrs.placeholder),
        );
        props.push(Property::new(
            "rows",
            "Rows",
            "Visible height of the text area (1-10)",
            PropertyValue::Count(attrs.rows),
        ));
        props
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let mut attrs = narrow!(element, TextArea).clone();
        if key == "rows" {
            attrs.rows = parse_count("Rows", raw, ROWS_RANGE.0, ROWS_RANGE.1)?;
        } else {
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
        Ok(element.with_attributes(FieldAttributes::TextArea(attrs)))
    }

    fn validate(&self, element: &FieldElement, value: &FieldValue) -> bool {
        required_check(narrow!(element, TextArea).required, value)
    }
}
