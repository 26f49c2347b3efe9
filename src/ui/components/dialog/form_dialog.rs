//! Create / rename / description dialog

use super::super::input::draw_input;
use super::base::{centered_rect, dialog_block, hint_spans};
use crate::platform::SAVE_SHORTCUT;
use crate::state::{Form, FormDialog};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render a text dialog centered over the current view
pub fn render_form_dialog(frame: &mut Frame, dialog: &FormDialog) {
    let field_heights: Vec<u16> = dialog
        .fields
        .iter()
        .map(|f| if f.is_multiline { 6 } else { 3 })
        .collect();
    // title + fields + error + hint + borders
    let height = 2 + field_heights.iter().sum::<u16>() + 2 + 2;
    let area = centered_rect(frame.area(), 60, height);
    let block = dialog_block(frame, area, Color::Cyan).title(Span::styled(
        format!(" {} ", dialog.kind.title()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(field_heights.iter().map(|h| Constraint::Length(*h)));
    constraints.push(Constraint::Length(1)); // error
    constraints.push(Constraint::Min(1)); // hint
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, field) in dialog.fields.iter().enumerate() {
        draw_input(
            frame,
            chunks[index + 1],
            field,
            index == dialog.active_field(),
        );
    }

    let count = dialog.field_count();
    if let Some(error) = &dialog.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            chunks[count + 1],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(hint_spans(&hint_pairs(dialog)))),
        chunks[count + 2],
    );
}

/// Key hints; Enter inserts a newline once a multi-line field is present
fn hint_pairs(dialog: &FormDialog) -> Vec<(&'static str, &'static str)> {
    let mut pairs = vec![("Enter", "save"), ("Esc", "cancel")];
    if dialog.field_count() > 1 {
        pairs.insert(0, ("Tab", "next"));
    }
    if dialog.fields.iter().any(|f| f.is_multiline) {
        let at = pairs.len() - 2;
        pairs[at] = (SAVE_SHORTCUT, "save");
    }
    pairs
}
