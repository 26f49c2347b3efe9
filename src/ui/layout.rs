//! Layout components (header, status bar)

use super::components::{hint_spans, render_dialog, DialogConfig};
use crate::app::App;
use crate::platform::SAVE_SHORTCUT;
use crate::state::canvas::{HEADER_HEIGHT, STATUS_BAR_HEIGHT};
use crate::state::{DesignerPane, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header with breadcrumb and acting user
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let mut crumbs: Vec<String> = Vec::new();
    match state.current_view {
        View::Dashboard | View::NewForm => crumbs.push("Dashboard".to_string()),
        View::FormDetail | View::Designer | View::Preview => {
            crumbs.push("Dashboard".to_string());
            if let Some(form) = &state.current_form {
                crumbs.push(form.name.clone());
            }
            if state.current_view != View::FormDetail {
                crumbs.push(state.current_view.title().to_string());
            }
        }
        View::Submit | View::Submitted => {
            crumbs.push(
                state
                    .published
                    .as_ref()
                    .map(|f| f.name.clone())
                    .unwrap_or_else(|| "Form".to_string()),
            );
        }
        View::Admin | View::NotFound => crumbs.push(state.current_view.title().to_string()),
    }

    let mut spans = vec![Span::raw(" ")];
    let last = crumbs.len().saturating_sub(1);
    for (i, crumb) in crumbs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == last {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(crumb, style));
    }

    let block = Block::default()
        .title(" formsmith ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);

    if let Some(actor) = &app.actor {
        let label = if actor.is_admin {
            format!("{} (admin) ", actor.id)
        } else {
            format!("{} ", actor.id)
        };
        frame.render_widget(
            Paragraph::new(Line::from(label).right_aligned())
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let mut spans = vec![];

    // Save indicator
    if state.current_view == View::Designer {
        let indicator = if state.saves_in_flight > 0 {
            Span::styled(" ◌ saving ", Style::default().fg(Color::Yellow))
        } else if state.designer.is_dirty() {
            Span::styled(" ● unsaved ", Style::default().fg(Color::Yellow))
        } else {
            Span::styled(" ● saved ", Style::default().fg(Color::Green))
        };
        spans.push(indicator);
    } else {
        spans.push(Span::raw(" "));
    }

    let hints = get_view_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(status) = &state.status {
        let color = if status.is_error {
            Color::Red
        } else {
            Color::Green
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(status.text.as_str(), Style::default().fg(color)));
    }

    if let Some(msg) = &app.copy_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        width: (quit_hint.len() as u16).min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    let state = &app.state;
    match state.current_view {
        View::Dashboard => {
            let admin = if app.actor.as_ref().is_some_and(|a| a.is_admin) {
                "  a:admin"
            } else {
                ""
            };
            format!("j/k:nav  Enter:open  n:new  r:refresh{admin}  q:quit")
        }
        View::NewForm => format!("Tab:next  {SAVE_SHORTCUT}:create  Esc:cancel"),
        View::FormDetail => {
            "o:designer  e:rename  d:description  P:publish  y:copy link  j/k:scroll  Esc:back"
                .to_string()
        }
        View::Designer => {
            if state.drag.is_dragging() {
                return "Release to drop  Esc:cancel drag".to_string();
            }
            if state.property_edit.is_some() {
                return "Enter:apply  Esc:cancel".to_string();
            }
            let pane = match state.designer_pane {
                DesignerPane::Palette => "j/k:nav  Enter:add",
                DesignerPane::Canvas => "j/k:select  J/K:move  x:remove",
                DesignerPane::Properties => "j/k:nav  Enter:edit",
            };
            format!("Tab:pane  {pane}  {SAVE_SHORTCUT}:save  p:preview  P:publish  Esc:back")
        }
        View::Preview => "Tab:next field  ↑↓:option  Space:toggle  Esc:back".to_string(),
        View::Submit => {
            format!("Tab:next field  ↑↓:option  Space:toggle  {SAVE_SHORTCUT}:submit  Esc:quit")
        }
        View::Submitted | View::NotFound => "q:quit".to_string(),
        View::Admin => "j/k:nav  Enter:open  D:delete  r:refresh  Esc:back".to_string(),
    }
}

/// Centered message shown when there is nothing to display
pub fn draw_not_found(frame: &mut Frame, app: &App) {
    let message = if app.actor.is_none() && app.state.share_token.is_none() {
        "No user is configured. Start formsmith with --actor <ID> or set \
         `actor_id` in the config file."
    } else {
        "The form you are looking for does not exist or is not published."
    };
    render_dialog(
        frame,
        DialogConfig {
            title: "Not found",
            title_color: Color::Yellow,
            border_color: Color::Yellow,
            message,
            hint: Some(hint_spans(&[("q", "quit")])),
            max_width: 60,
        },
    );
}
