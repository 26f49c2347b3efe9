//! Form builder core
//!
//! Everything that gives a form its shape and behavior, independent of the
//! terminal host:
//! - `element`: field elements and their typed attribute records
//! - `value`: submitted values
//! - `registry` / `fields`: per-type behavior bundles
//! - `document`: persisted form content
//! - `designer`: the live draft and its insert/move/remove algorithm
//! - `drag`: pointer gesture state machine producing drop commands
//! - `submission`: respondent value collection and validation

pub mod designer;
pub mod document;
pub mod drag;
pub mod element;
pub mod fields;
pub mod registry;
pub mod submission;
pub mod value;

pub use designer::Designer;
pub use document::FormDocument;
pub use drag::{
    DragCoordinator, DragSource, DragState, DropCommand, DropTarget, Half, InsertAt, PointerEvent,
};
pub use element::{ElementId, FieldElement, FieldTypeTag};
pub use registry::{InputKind, PropertyValue};
pub use submission::{SubmissionSession, SubmissionStatus, SubmitOutcome};
pub use value::{FieldValue, SubmissionValues};
