//! Form detail: metadata, share link, stats and submissions

use super::dashboard::draw_stat_cards;
use super::widgets::relative_time;
use crate::app::App;
use crate::builder::fields::format_date;
use crate::builder::registry::behavior_of;
use crate::builder::{FieldElement, FieldTypeTag, FieldValue};
use crate::store::{FormRecord, FormStats, SubmissionRecord};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

const INFO_HEIGHT: u16 = 7;
const CARDS_HEIGHT: u16 = 4;
const SUBMITTED_AT: &str = "Submitted at";

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = &app.state.current_form else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INFO_HEIGHT),
            Constraint::Length(CARDS_HEIGHT),
            Constraint::Min(0),
        ])
        .split(area);

    draw_info(frame, chunks[0], app, form);
    draw_stat_cards(
        frame,
        chunks[1],
        &FormStats::new(form.visits, form.submissions),
    );
    draw_submissions(frame, chunks[2], app, form);
}

fn draw_info(frame: &mut Frame, area: Rect, app: &App, form: &FormRecord) {
    let dim = Style::default().fg(Color::DarkGray);
    let (status, status_color) = if form.published {
        ("Published", Color::Green)
    } else {
        ("Draft", Color::Yellow)
    };

    let description = if form.description.is_empty() {
        Span::styled("No description", dim)
    } else {
        Span::raw(form.description.as_str())
    };

    let share = if form.published {
        Line::from(vec![
            Span::styled("Share link: ", dim),
            Span::styled(
                app.config.share_link(&form.share_token),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled("  (y to copy)", dim),
        ])
    } else {
        Line::from(Span::styled("Publish the form (P) to share it", dim))
    };

    let content = vec![
        Line::from(vec![
            Span::styled(
                form.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(status, Style::default().fg(status_color)),
        ]),
        Line::from(description),
        Line::from(""),
        share,
        Line::from(Span::styled(
            format!(
                "Created {} · {} elements",
                relative_time(form.created_at, Utc::now()),
                form.content.len()
            ),
            dim,
        )),
    ];

    let block = Block::default()
        .title(format!(" Form #{} ", form.id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_submissions(frame: &mut Frame, area: Rect, app: &App, form: &FormRecord) {
    let block = Block::default()
        .title(format!(" Submissions ({}) ", app.state.submissions.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let columns = input_columns(&form.content);
    if app.state.submissions.is_empty() {
        let message = if form.published {
            "No submissions yet."
        } else {
            "No submissions yet. Publish the form to start collecting them."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let now = Utc::now();
    let header = Row::new(
        column_titles(&columns)
            .into_iter()
            .map(|t| Cell::from(t).style(Style::default().fg(Color::Cyan))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .state
        .submissions
        .iter()
        .skip(app.state.scroll_offset)
        .map(|record| Row::new(submission_cells(&columns, record, now)))
        .collect();

    let widths = vec![Constraint::Fill(1); columns.len() + 1];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(block);
    frame.render_widget(table, area);
}

/// Input elements in document order; layout kinds never get a column
fn input_columns(content: &[FieldElement]) -> Vec<&FieldElement> {
    content
        .iter()
        .filter(|e| behavior_of(e).is_input())
        .collect()
}

fn column_titles(columns: &[&FieldElement]) -> Vec<String> {
    let mut titles: Vec<String> = columns
        .iter()
        .map(|e| {
            e.attributes
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| e.tag().to_string())
        })
        .collect();
    titles.push(SUBMITTED_AT.to_string());
    titles
}

/// One table row: each column's value, then the relative submission time
fn submission_cells(
    columns: &[&FieldElement],
    record: &SubmissionRecord,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut cells: Vec<String> = columns
        .iter()
        .map(|element| match record.content.get(&element.id) {
            None => String::new(),
            Some(value) => format_cell(element.tag(), value),
        })
        .collect();
    cells.push(relative_time(record.created_at, now));
    cells
}

fn format_cell(tag: FieldTypeTag, value: &FieldValue) -> String {
    match (tag, value) {
        (FieldTypeTag::DateField, FieldValue::Text(text)) if !text.is_empty() => {
            format_date(text)
        }
        _ => value.display().replace('\n', " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::registry::lookup;
    use crate::builder::{ElementId, SubmissionValues};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn element(tag: FieldTypeTag, id: &str) -> FieldElement {
        lookup(tag).construct(ElementId::from(id))
    }

    fn content() -> Vec<FieldElement> {
        vec![
            element(FieldTypeTag::TitleField, "title"),
            element(FieldTypeTag::TextField, "name"),
            element(FieldTypeTag::SeparatorField, "sep"),
            element(FieldTypeTag::DateField, "born"),
            element(FieldTypeTag::CheckboxField, "pets"),
        ]
    }

    #[test]
    fn test_layout_kinds_have_no_column() {
        let content = content();
        let ids: Vec<&str> = input_columns(&content)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["name", "born", "pets"]);
    }

    #[test]
    fn test_column_titles_use_labels() {
        let content = content();
        assert_eq!(
            column_titles(&input_columns(&content)),
            vec!["Text field", "Date field", "Checkbox field", "Submitted at"]
        );
    }

    #[test]
    fn test_submission_cells_formatting() {
        let content = content();
        let now = Utc::now();
        let mut values = SubmissionValues::new();
        values.insert(ElementId::from("born"), FieldValue::Text("2024-03-09".into()));
        values.insert(
            ElementId::from("pets"),
            FieldValue::Set(vec!["cat".into(), "dog".into()]),
        );
        let record = SubmissionRecord {
            id: 1,
            form_id: 1,
            created_at: now - Duration::minutes(3),
            content: values,
        };

        assert_eq!(
            submission_cells(&input_columns(&content), &record, now),
            vec!["", "09/03/2024", "cat, dog", "3 minutes ago"]
        );
    }

    #[test]
    fn test_unparsable_date_shown_as_is() {
        assert_eq!(
            format_cell(FieldTypeTag::DateField, &FieldValue::Text("soon".into())),
            "soon"
        );
        assert_eq!(
            format_cell(FieldTypeTag::TextAreaField, &FieldValue::Text("a\nb".into())),
            "a b"
        );
    }
}
