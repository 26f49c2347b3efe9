//! Designer view: palette | canvas | properties
//!
//! Geometry comes from [`DesignerLayout`], the same value mouse handling
//! hit-tests against, so what is drawn is what can be dropped on.

use crate::app::App;
use crate::builder::registry::{behavior_of, lookup, PaletteGroup};
use crate::builder::{DragState, DropTarget, FieldElement, Half};
use crate::state::canvas::{inner, ElementSlot};
use crate::state::{DesignerLayout, DesignerPane, PropertyEdit};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn pane_border(app: &App, pane: DesignerPane) -> Style {
    if app.state.designer_pane == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let layout = DesignerLayout::compute(frame.area(), &state.designer, state.canvas_scroll);

    draw_palette(frame, &layout, app);
    draw_canvas(frame, &layout, app);
    draw_properties(frame, layout.properties, app);
}

fn draw_palette(frame: &mut Frame, layout: &DesignerLayout, app: &App) {
    let block = Block::default()
        .title(" Elements ")
        .borders(Borders::ALL)
        .border_style(pane_border(app, DesignerPane::Palette));
    frame.render_widget(block, layout.palette);

    let area = inner(layout.palette);
    for (group, y) in &layout.palette_sections {
        let title = match group {
            PaletteGroup::Layout => "Layout elements",
            PaletteGroup::Input => "Form elements",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                title,
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            )),
            Rect {
                y: *y,
                height: 1,
                ..area
            },
        );
    }

    let dragging_tag = match app.state.drag.state() {
        DragState::DraggingNew { tag, .. } => Some(*tag),
        _ => None,
    };
    let focused = app.state.designer_pane == DesignerPane::Palette;
    for (index, (tag, rect)) in layout.palette_buttons.iter().enumerate() {
        let highlighted = focused && index == app.state.palette_index;
        let style = if dragging_tag == Some(*tag) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else if highlighted {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let prefix = if highlighted { "▸ " } else { "  " };
        frame.render_widget(
            Paragraph::new(format!("{prefix}{}", lookup(*tag).palette_label())).style(style),
            *rect,
        );
    }
}

fn draw_canvas(frame: &mut Frame, layout: &DesignerLayout, app: &App) {
    let state = &app.state;
    let hovered = state.drag.hovered();
    let canvas_hovered = matches!(hovered, Some(DropTarget::Canvas));

    let dirty = if state.designer.is_dirty() { " *" } else { "" };
    let border = if canvas_hovered {
        Style::default().fg(Color::Yellow)
    } else {
        pane_border(app, DesignerPane::Canvas)
    };
    let mut block = Block::default()
        .title(format!(" Canvas{dirty} "))
        .borders(Borders::ALL)
        .border_style(border);
    let content_height = layout.content_height();
    let clip = layout.canvas_inner();
    if content_height > clip.height {
        block = block.title_bottom(
            Line::from(format!(
                " {}/{} ",
                state.canvas_scroll.min(content_height),
                content_height
            ))
            .right_aligned(),
        );
    }
    frame.render_widget(block, layout.canvas);

    if layout.slots.is_empty() {
        let style = if state.drag.is_dragging() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from("Drop here").centered(),
                Line::from("Drag an element from the palette").centered(),
            ])
            .style(style),
            clip,
        );
        return;
    }

    for (slot, element) in layout.slots.iter().zip(state.designer.elements()) {
        draw_element(frame, clip, slot, element, app);
    }
}

fn draw_element(
    frame: &mut Frame,
    clip: Rect,
    slot: &ElementSlot,
    element: &FieldElement,
    app: &App,
) {
    let Some((area, hidden_above)) = slot.visible(clip) else {
        return;
    };
    let state = &app.state;
    let selected = state.designer.selected() == Some(&element.id);
    let being_moved = matches!(
        state.drag.state(),
        DragState::DraggingExisting { id, .. } if id == &element.id
    );
    let hover = state
        .drag
        .hovered()
        .and_then(|t| t.element())
        .filter(|(id, _)| *id == &element.id)
        .map(|(_, half)| half);

    let border_style = if hover.is_some() {
        Style::default().fg(Color::Yellow)
    } else if being_moved {
        Style::default().fg(Color::DarkGray)
    } else if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    // Clipped boxes lose the border on the clipped side
    let hidden_below = slot.height.saturating_sub(hidden_above + area.height);
    let mut borders = Borders::LEFT | Borders::RIGHT;
    if hidden_above == 0 {
        borders |= Borders::TOP;
    }
    if hidden_below == 0 {
        borders |= Borders::BOTTOM;
    }

    let behavior = behavior_of(element);
    let required = if element.attributes.is_required() {
        " · required"
    } else {
        ""
    };
    let mut block = Block::default()
        .borders(borders)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {}{required} ", behavior.palette_label()),
            Style::default().fg(Color::DarkGray),
        ));
    match hover {
        Some(Half::Top) => {
            block = block.title(Line::from("▲ insert above ").right_aligned());
        }
        Some(Half::Bottom) => {
            block = block.title_bottom(Line::from("▼ insert below ").right_aligned());
        }
        None => {}
    }

    let mut paragraph = Paragraph::new(behavior.design_lines(element)).block(block);
    if being_moved {
        paragraph = paragraph.style(Style::default().add_modifier(Modifier::DIM));
    }
    let skipped_content = hidden_above.saturating_sub(1);
    frame.render_widget(paragraph.scroll((skipped_content, 0)), area);
}

fn draw_properties(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let block = Block::default()
        .title(" Properties ")
        .borders(Borders::ALL)
        .border_style(pane_border(app, DesignerPane::Properties));

    let Some(element) = state.designer.selected_element() else {
        frame.render_widget(
            Paragraph::new("Select an element to edit its properties.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
        return;
    };

    let dim = Style::default().fg(Color::DarkGray);
    let focused = state.designer_pane == DesignerPane::Properties;
    let properties = behavior_of(element).properties(element);
    let mut lines = vec![
        Line::from(Span::styled(
            behavior_of(element).palette_label(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("id {}", element.id), dim)),
        Line::from(""),
    ];

    if properties.is_empty() {
        lines.push(Line::from(Span::styled("No properties", dim)));
    }

    for (index, property) in properties.iter().enumerate() {
        let highlighted = focused && index == state.property_index;
        let label_style = if highlighted {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let prefix = if highlighted { "▸ " } else { "  " };
        lines.push(Line::from(Span::styled(
            format!("{prefix}{}", property.label),
            label_style,
        )));

        match state.property_edit.as_ref().filter(|e| e.key == property.key) {
            Some(edit) => lines.extend(edit_lines(edit)),
            None => {
                let value = property.value.to_input();
                let shown = if value.is_empty() {
                    Span::styled("    (empty)", dim)
                } else {
                    Span::raw(format!("    {value}"))
                };
                lines.push(Line::from(shown));
            }
        }
        if highlighted {
            lines.push(Line::from(Span::styled(
                format!("    {}", property.description),
                dim,
            )));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn edit_lines(edit: &PropertyEdit) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("    ", Style::default()),
        Span::styled(edit.buffer.clone(), Style::default().fg(Color::Yellow)),
        Span::styled("▌", Style::default().fg(Color::Cyan)),
    ])];
    if let Some(error) = &edit.error {
        lines.push(Line::from(Span::styled(
            format!("    {error}"),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}
