//! Application state module

mod app_state;
pub mod canvas;
mod forms;

pub use app_state::*;
pub use canvas::DesignerLayout;
pub use forms::*;
