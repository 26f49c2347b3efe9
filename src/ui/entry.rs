//! Data-entry view shared by preview and public submission

use super::components::{hint_spans, render_button, render_dialog, DialogConfig, BUTTON_HEIGHT};
use crate::app::App;
use crate::builder::registry::behavior_of;
use crate::builder::SubmissionSession;
use crate::platform::SAVE_SHORTCUT;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let Some(session) = &state.session else {
        return;
    };
    let is_preview = state.current_view == View::Preview;
    let (name, description) = if is_preview {
        state
            .current_form
            .as_ref()
            .map(|f| (f.name.as_str(), f.description.as_str()))
            .unwrap_or(("Preview", ""))
    } else {
        state
            .published
            .as_ref()
            .map(|f| (f.name.as_str(), f.description.as_str()))
            .unwrap_or(("Form", ""))
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(BUTTON_HEIGHT),
        ])
        .split(area);

    let title = if is_preview {
        format!(" {name} (preview) ")
    } else {
        format!(" {name} ")
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_preview {
            Color::Magenta
        } else {
            Color::Cyan
        }));
    let body = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let (mut lines, mut focus) = entry_document(session);
    if !description.is_empty() {
        let header = vec![
            Line::from(Span::styled(
                description.to_string(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
        ];
        let offset = header.len();
        lines.splice(0..0, header);
        focus = focus.map(|(start, end)| (start + offset, end + offset));
    }
    render_body(frame, body, lines, focus);

    let invalid = session.invalid().len();
    if invalid > 0 {
        let noun = if invalid == 1 { "field" } else { "fields" };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" Please fix {invalid} highlighted {noun}"),
                Style::default().fg(Color::Red),
            )),
            chunks[1],
        );
    }

    let button_area = Rect {
        width: chunks[2].width.min(30),
        ..chunks[2]
    };
    if is_preview {
        render_button(frame, button_area, "Submit (disabled in preview)", false, false);
    } else {
        render_button(
            frame,
            button_area,
            &format!("Submit  {SAVE_SHORTCUT}"),
            true,
            true,
        );
    }
}

fn render_body(
    frame: &mut Frame,
    area: Rect,
    lines: Vec<Line<'static>>,
    focus: Option<(usize, usize)>,
) {
    let scroll = scroll_for(focus, area.height as usize);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

/// Entry lines of every element, one blank line apart, plus the line range
/// of the focused element
fn entry_document(session: &SubmissionSession) -> (Vec<Line<'static>>, Option<(usize, usize)>) {
    let mut lines = Vec::new();
    let mut focus = None;
    for element in session.elements() {
        let state = session.entry_state(&element.id);
        let value = session.value(&element.id);
        let start = lines.len();
        lines.extend(behavior_of(element).entry_lines(element, &value, state));
        if state.focused {
            focus = Some((start, lines.len()));
        }
        lines.push(Line::from(""));
    }
    (lines, focus)
}

/// First visible line that keeps the focused range on screen
fn scroll_for(focus: Option<(usize, usize)>, height: usize) -> usize {
    match focus {
        Some((start, end)) if end > height => (end - height).min(start),
        _ => 0,
    }
}

/// Thank-you screen after a successful submission
pub fn draw_submitted(frame: &mut Frame) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Form submitted",
            title_color: Color::Green,
            border_color: Color::Green,
            message: "Thank you for submitting the form, you can close this page now.",
            hint: Some(hint_spans(&[("q", "quit")])),
            max_width: 50,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::registry::lookup;
    use crate::builder::{ElementId, FieldTypeTag};

    fn session() -> SubmissionSession {
        SubmissionSession::new(vec![
            lookup(FieldTypeTag::TitleField).construct(ElementId::from("title")),
            lookup(FieldTypeTag::TextField).construct(ElementId::from("name")),
            lookup(FieldTypeTag::TextField).construct(ElementId::from("city")),
        ])
    }

    #[test]
    fn test_focus_range_points_at_first_input() {
        let session = session();
        let (lines, focus) = entry_document(&session);
        let (start, end) = focus.unwrap();
        assert!(start > 0, "the title comes first");
        assert!(end > start);
        assert!(end <= lines.len());
    }

    #[test]
    fn test_focus_moves_with_session() {
        let mut session = session();
        let (_, first) = entry_document(&session);
        session.focus_next();
        let (_, second) = entry_document(&session);
        assert!(second.unwrap().0 > first.unwrap().0);
    }

    #[test]
    fn test_scroll_for() {
        assert_eq!(scroll_for(None, 10), 0);
        assert_eq!(scroll_for(Some((2, 5)), 10), 0);
        assert_eq!(scroll_for(Some((12, 15)), 10), 5);
        // Taller than the screen: keep its start visible
        assert_eq!(scroll_for(Some((12, 30)), 10), 12);
    }
}
