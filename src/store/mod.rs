//! Form persistence
//!
//! [`FormStore`] is the async seam between the app and wherever forms live.
//! [`JsonFileStore`] keeps everything in a single JSON database file.

mod error;
mod json_store;
mod model;
mod traits;

pub use error::StoreError;
pub use json_store::JsonFileStore;
pub use model::{DailyCount, FormId, FormRecord, FormStats, PublishedForm, SubmissionRecord};
pub use traits::FormStore;

#[cfg(test)]
pub use traits::MockFormStore;
