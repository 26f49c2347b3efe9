//! Confirmation dialog component for destructive actions

use super::base::{centered_rect, dialog_block, hint_spans};
use crate::state::PendingDelete;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render a confirmation dialog for deleting a form
pub fn render_confirm_dialog(frame: &mut Frame, action: &PendingDelete) {
    let dialog_width = 50u16;
    let dialog_height = 10u16;
    let dialog_area = centered_rect(frame.area(), dialog_width, dialog_height);
    let block = dialog_block(frame, dialog_area, Color::Red);

    let max_display_len = (dialog_width - 10) as usize;
    let display_text = truncate_string(&action.name, max_display_len);

    let mut content = vec![
        Line::from(Span::styled(
            "Confirm Delete",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Delete this form and all its submissions?",
            Style::default().fg(Color::White),
        )),
        Line::from(vec![
            Span::styled(
                format!("#{} ", action.form_id),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(display_text, Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];

    let options = [(false, "Cancel", Color::White), (true, "Delete", Color::Red)];
    for (is_delete, label, base_color) in options {
        let is_selected = action.selected_option == is_delete;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(base_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        content.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    content.push(Line::from(""));
    content.push(Line::from(hint_spans(&[
        ("↑↓", "select"),
        ("Enter", "confirm"),
        ("Esc", "cancel"),
    ])));

    let dialog = Paragraph::new(content)
        .block(block)
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
