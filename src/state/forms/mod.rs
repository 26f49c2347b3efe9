//! Dialog input layer
//!
//! Text inputs for the create, rename and description dialogs.

mod field;
mod form_state;

pub use field::InputField;
pub use form_state::{DialogKind, Form, FormDialog, DESCRIPTION_MAX, NAME_MAX};
