//! Reusable UI components

mod button;
mod dialog;
mod input;

pub use button::{render_button, BUTTON_HEIGHT};
pub use dialog::{
    centered_rect, hint_spans, render_confirm_dialog, render_dialog, render_form_dialog,
    DialogConfig,
};
