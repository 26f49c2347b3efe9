//! Dialog components for TUI

mod base;
mod confirm_dialog;
mod form_dialog;

pub use base::{centered_rect, hint_spans, render_dialog, DialogConfig};
pub use confirm_dialog::render_confirm_dialog;
pub use form_dialog::render_form_dialog;
