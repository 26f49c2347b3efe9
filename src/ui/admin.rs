//! Admin view: every owner's forms, totals and daily creation counts

use super::widgets::{relative_time, truncate_str};
use crate::app::App;
use crate::store::DailyCount;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

const SIDE_PANEL_WIDTH: u16 = 30;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(area);

    draw_forms_table(frame, chunks[0], app);
    draw_side_panel(frame, chunks[1], app);
}

fn draw_forms_table(frame: &mut Frame, area: Rect, app: &App) {
    let forms = &app.state.all_forms;
    let block = Block::default()
        .title(" All forms ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if forms.is_empty() {
        frame.render_widget(
            Paragraph::new("No forms have been created yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let now = Utc::now();
    let header = Row::new(
        ["#", "Owner", "Name", "Status", "Visits", "Subs", "Created"]
            .into_iter()
            .map(|t| Cell::from(t).style(Style::default().fg(Color::Cyan))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = forms
        .iter()
        .map(|form| {
            let (status, color) = if form.published {
                ("published", Color::Green)
            } else {
                ("draft", Color::Yellow)
            };
            Row::new(vec![
                Cell::from(form.id.to_string()),
                Cell::from(truncate_str(&form.owner_id, 16)),
                Cell::from(form.name.clone()),
                Cell::from(Span::styled(status, Style::default().fg(color))),
                Cell::from(form.visits.to_string()),
                Cell::from(form.submissions.to_string()),
                Cell::from(relative_time(form.created_at, now)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(16),
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(15),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    let mut table_state = TableState::default().with_selected(Some(app.state.selected_index));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn draw_side_panel(frame: &mut Frame, area: Rect, app: &App) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled("Total forms", dim)),
        Line::from(Span::styled(
            app.state.form_count.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Created in the last 7 days", dim)),
    ];
    lines.extend(daily_lines(&app.state.forms_per_day));

    let block = Block::default()
        .title(" Overview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One line per day, newest last
fn daily_lines(days: &[DailyCount]) -> Vec<Line<'static>> {
    days.iter()
        .map(|day| {
            let count_style = if day.count > 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(
                    day.date.format("%a %d/%m").to_string(),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw("  "),
                Span::styled(day.count.to_string(), count_style),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_daily_lines_one_per_day() {
        let days = vec![
            DailyCount {
                date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
                count: 0,
            },
            DailyCount {
                date: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
                count: 3,
            },
        ];
        let lines = daily_lines(&days);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[0].content, "Tue 07/05");
        assert_eq!(lines[1].spans[2].content, "3");
    }
}
