//! UI module for rendering the TUI

mod admin;
mod components;
mod dashboard;
mod designer;
mod entry;
mod form_detail;
mod layout;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_dialog, render_form_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    match app.state.current_view {
        View::Dashboard | View::NewForm => dashboard::draw(frame, main_area, app),
        View::FormDetail => form_detail::draw(frame, main_area, app),
        View::Designer => designer::draw(frame, app),
        View::Preview | View::Submit => entry::draw(frame, main_area, app),
        View::Submitted => entry::draw_submitted(frame),
        View::Admin => admin::draw(frame, main_area, app),
        View::NotFound => layout::draw_not_found(frame, app),
    }

    // Modal overlays
    if let Some(dialog) = &app.state.dialog {
        render_form_dialog(frame, dialog);
    }
    if let Some(action) = &app.state.pending_delete {
        render_confirm_dialog(frame, action);
    }

    layout::draw_status_bar(frame, status_area, app);
}
