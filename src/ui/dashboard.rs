//! Dashboard: stats cards and the actor's forms

use super::widgets::{format_percent, relative_time, render_scrollable_list, render_stat_card};
use crate::app::App;
use crate::store::FormStats;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Height of the stats card row
const CARDS_HEIGHT: u16 = 4;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CARDS_HEIGHT), Constraint::Min(0)])
        .split(area);

    draw_stat_cards(frame, chunks[0], &app.state.stats);
    draw_forms_list(frame, chunks[1], app);
}

/// Four cards: visits, submissions, submission rate, bounce rate
pub fn draw_stat_cards(frame: &mut Frame, area: Rect, stats: &FormStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    render_stat_card(
        frame,
        cards[0],
        "Total visits",
        &stats.visits.to_string(),
        "All time form visits",
    );
    render_stat_card(
        frame,
        cards[1],
        "Total submissions",
        &stats.submissions.to_string(),
        "All time form submissions",
    );
    render_stat_card(
        frame,
        cards[2],
        "Submission rate",
        &format_percent(stats.submission_rate),
        "Visits that result in a submission",
    );
    render_stat_card(
        frame,
        cards[3],
        "Bounce rate",
        &format_percent(stats.bounce_rate()),
        "Visits that leave without submitting",
    );
}

fn draw_forms_list(frame: &mut Frame, area: Rect, app: &App) {
    let forms = &app.state.forms;
    let block = Block::default()
        .title(format!(" Your forms ({}) ", forms.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if forms.is_empty() {
        let content = Paragraph::new("No forms yet.\nPress 'n' to create a new form.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let now = Utc::now();
    let items: Vec<ListItem> = forms
        .iter()
        .enumerate()
        .map(|(idx, form)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let (badge, badge_color) = if form.published {
                ("[published]", Color::Green)
            } else {
                ("[draft]", Color::Yellow)
            };
            let name_style = if is_selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(prefix, Style::default().fg(Color::Cyan)),
                Span::styled(form.name.as_str(), name_style),
                Span::raw(" "),
                Span::styled(badge, Style::default().fg(badge_color)),
                Span::styled(
                    format!("  {}", relative_time(form.created_at, now)),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if form.published {
                spans.push(Span::styled(
                    format!(
                        "  {} visits  {} submissions ({})",
                        form.visits,
                        form.submissions,
                        format_percent(form.submission_rate())
                    ),
                    Style::default().fg(Color::Gray),
                ));
            }
            let mut lines = vec![Line::from(spans)];
            if !form.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", form.description.lines().next().unwrap_or("")),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(block);
    render_scrollable_list(frame, area, list, app.state.selected_index);
}
