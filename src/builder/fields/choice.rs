//! Select and checkbox group

use super::{
    common_properties, framed, helper_line, input_line, label_line, parse_options,
    required_check, CommonInput,
};
use crate::builder::element::{
    CheckboxAttributes, ElementId, FieldAttributes, FieldElement, FieldTypeTag, SelectAttributes,
};
use crate::builder::registry::{
    EntryState, FieldBehavior, InputKind, Property, PropertyError, PropertyValue,
};
use crate::builder::value::FieldValue;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

fn options_property(options: &[String]) -> Property {
    Property::new(
        "options",
        "Options",
        "Comma separated list of choices",
        PropertyValue::List(options.to_vec()),
    )
}

/// One option row; `marker` is the already formatted check or radio mark
fn option_line(marker: &str, option: &str, highlighted: bool) -> Line<'static> {
    let style = if highlighted {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("  {marker} "), style),
        Span::styled(option.to_string(), style),
    ])
}

fn no_options_line() -> Line<'static> {
    Line::from(Span::styled(
        "  (no options)",
        Style::default().fg(Color::DarkGray),
    ))
}

pub struct SelectField;

impl FieldBehavior for SelectField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::SelectField
    }

    fn palette_label(&self) -> &'static str {
        "Select"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Select(SelectAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Select);
        let mut input = input_line("", &attrs.placeholder, false, false);
        input.spans.push(Span::styled(
            format!(" ▾ {} options", attrs.options.len()),
            Style::default().fg(Color::DarkGray),
        ));
        framed(
            label_line(&attrs.label, attrs.required, false),
            vec![input],
            helper_line(&attrs.helper_text, false),
        )
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        value: &FieldValue,
        state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Select);
        let mut body = vec![input_line(
            value.as_text(),
            &attrs.placeholder,
            state.focused,
            state.invalid,
        )];
        // Options are only listed while the field has focus
        if state.focused {
            if attrs.options.is_empty() {
                body.push(no_options_line());
            }
            for (idx, option) in attrs.options.iter().enumerate() {
                let marker = if value.as_text() == option { "(•)" } else { "( )" };
                body.push(option_line(marker, option, idx == state.cursor));
            }
        }
        framed(
            label_line(&attrs.label, attrs.required, state.invalid),
            body,
            helper_line(&attrs.helper_text, state.invalid),
        )
    }

    fn input_kind(&self, element: &FieldElement) -> InputKind {
        InputKind::Choice(narrow!(element, Select).options.clone())
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        let attrs = narrow!(element, Select);
        let mut props = common_properties(
            &attrs.label,
            &attrs.helper_text,
            attrs.required,
            Some(&attrs.placeholder),
        );
        props.push(options_property(&attrs.options));
        props
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let mut attrs = narrow!(element, Select).clone();
        if key == "options" {
            attrs.options = parse_options(raw)?;
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
        Ok(element.with_attributes(FieldAttributes::Select(attrs)))
    }

    fn validate(&self, element: &FieldElement, value: &FieldValue) -> bool {
        required_check(narrow!(element, Select).required, value)
    }
}

pub struct CheckboxField;

impl FieldBehavior for CheckboxField {
    fn tag(&self) -> FieldTypeTag {
        FieldTypeTag::CheckboxField
    }

    fn palette_label(&self) -> &'static str {
        "Checkbox"
    }

    fn construct(&self, id: ElementId) -> FieldElement {
        FieldElement::new(id, FieldAttributes::Checkbox(CheckboxAttributes::default()))
    }

    fn design_lines(&self, element: &FieldElement) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Checkbox);
        let mut body: Vec<Line<'static>> = attrs
            .options
            .iter()
            .map(|option| option_line("[ ]", option, false))
            .collect();
        if body.is_empty() {
            body.push(no_options_line());
        }
        framed(
            label_line(&attrs.label, attrs.required, false),
            body,
            helper_line(&attrs.helper_text, false),
        )
    }

    fn entry_lines(
        &self,
        element: &FieldElement,
        value: &FieldValue,
        state: EntryState,
    ) -> Vec<Line<'static>> {
        let attrs = narrow!(element, Checkbox);
        let mut body: Vec<Line<'static>> = attrs
            .options
            .iter()
            .enumerate()
            .map(|(idx, option)| {
                let marker = if value.contains(option) { "[x]" } else { "[ ]" };
                option_line(marker, option, state.focused && idx == state.cursor)
            })
            .collect();
        if body.is_empty() {
            body.push(no_options_line());
        }
        framed(
            label_line(&attrs.label, attrs.required, state.invalid),
            body,
            helper_line(&attrs.helper_text, state.invalid),
        )
    }

    fn input_kind(&self, element: &FieldElement) -> InputKind {
        InputKind::MultiChoice(narrow!(element, Checkbox).options.clone())
    }

    fn empty_value(&self) -> FieldValue {
        FieldValue::Set(Vec::new())
    }

    fn properties(&self, element: &FieldElement) -> Vec<Property> {
        let attrs = narrow!(element, Checkbox);
        let mut props = common_properties(&attrs.label, &attrs.helper_text, attrs.required, None);
        props.push(options_property(&attrs.options));
        props
    }

    fn apply_property(
        &self,
        element: &FieldElement,
        key: &str,
        raw: &str,
    ) -> Result<FieldElement, PropertyError> {
        let mut attrs = narrow!(element, Checkbox).clone();
        if key == "options" {
            attrs.options = parse_options(raw)?;
        } else {
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
        }
        Ok(element.with_attributes(FieldAttributes::Checkbox(attrs)))
    }

    fn validate(&self, element: &FieldElement, value: &FieldValue) -> bool {
        required_check(narrow!(element, Checkbox).required, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_select_options_edit() {
        let element = SelectField.construct(ElementId::from("s"));
        let updated = SelectField
            .apply_property(&element, "options", "Red, Green")
            .unwrap();
        assert_eq!(
            SelectField.input_kind(&updated),
            InputKind::Choice(vec!["Red".into(), "Green".into()])
        );
    }

    #[test]
    fn test_select_lists_options_only_when_focused() {
        let element = SelectField.construct(ElementId::from("s"));
        let element = SelectField
            .apply_property(&element, "options", "Red, Green")
            .unwrap();
        let value = FieldValue::Text("Green".into());
        let unfocused = SelectField.entry_lines(&element, &value, EntryState::default());
        let focused = SelectField.entry_lines(
            &element,
            &value,
            EntryState {
                focused: true,
                ..Default::default()
            },
        );
        assert_eq!(focused.len(), unfocused.len() + 2);
        assert_eq!(line_text(&focused[3]), "  (•) Green");
    }

    #[test]
    fn test_checkbox_empty_value_is_a_set() {
        assert_eq!(CheckboxField.empty_value(), FieldValue::Set(Vec::new()));
    }

    #[test]
    fn test_required_checkbox_needs_a_choice() {
        let element = CheckboxField.construct(ElementId::from("c"));
        let element = CheckboxField
            .apply_property(&element, "required", "true")
            .unwrap();
        assert!(!CheckboxField.validate(&element, &FieldValue::Set(Vec::new())));
        assert!(CheckboxField.validate(&element, &FieldValue::Set(vec!["a".into()])));
    }

    #[test]
    fn test_checkbox_marks_checked_options() {
        let element = CheckboxField.construct(ElementId::from("c"));
        let element = CheckboxField
            .apply_property(&element, "options", "a, b")
            .unwrap();
        let value = FieldValue::Set(vec!["b".into()]);
        let lines = CheckboxField.entry_lines(&element, &value, EntryState::default());
        assert_eq!(line_text(&lines[1]), "  [ ] a");
        assert_eq!(line_text(&lines[2]), "  [x] b");
    }

    #[test]
    fn test_blank_option_rejected() {
        let element = CheckboxField.construct(ElementId::from("c"));
        assert_eq!(
            CheckboxField.apply_property(&element, "options", "a, ,b"),
            Err(PropertyError::BlankOption)
        );
    }
}
