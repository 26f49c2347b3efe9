//! Text input rendering

use crate::state::InputField;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw a bordered input with its label as title
pub fn draw_input(frame: &mut Frame, area: Rect, field: &InputField, is_active: bool) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let value = field.as_text();
    let display_value = if value.is_empty() && !is_active {
        "(empty)"
    } else {
        value
    };

    let cursor = if is_active { "▌" } else { "" };

    let mut lines: Vec<Line> = if field.is_multiline {
        display_value
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect()
    } else {
        vec![Line::from(Span::styled(display_value.to_string(), style))]
    };
    if is_active {
        match lines.last_mut() {
            Some(last) => last
                .spans
                .push(Span::styled(cursor, Style::default().fg(Color::Cyan))),
            None => lines.push(Line::from(Span::styled(
                cursor,
                Style::default().fg(Color::Cyan),
            ))),
        }
    }

    let counter = format!(" {}/{} ", value.chars().count(), field.max_len);
    let block = Block::default()
        .title(format!(" {} ", field.label))
        .title_bottom(Line::from(counter).right_aligned())
        .borders(Borders::ALL)
        .border_style(style);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
