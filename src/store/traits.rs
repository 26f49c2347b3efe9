//! Trait abstraction for form persistence to enable mocking in tests

use super::error::StoreError;
use super::model::{DailyCount, FormId, FormRecord, FormStats, PublishedForm, SubmissionRecord};
use crate::builder::{FieldElement, SubmissionValues};
use crate::identity::Actor;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Persistence operations. Owner-scoped calls take the acting user; admins
/// see every form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Create an unpublished form with a fresh share token
    async fn create_form(
        &self,
        actor: &Actor,
        name: &str,
        description: &str,
    ) -> Result<FormId, StoreError>;

    /// The actor's own forms, newest first
    async fn list_forms(&self, actor: &Actor) -> Result<Vec<FormRecord>, StoreError>;

    /// Every form of every owner, newest first (admin only)
    async fn list_all_forms(&self, actor: &Actor) -> Result<Vec<FormRecord>, StoreError>;

    async fn load_form(&self, actor: &Actor, id: FormId) -> Result<FormRecord, StoreError>;

    /// Replace the form's element sequence
    async fn save_form_content(
        &self,
        actor: &Actor,
        id: FormId,
        elements: Vec<FieldElement>,
    ) -> Result<(), StoreError>;

    async fn set_published(
        &self,
        actor: &Actor,
        id: FormId,
        published: bool,
    ) -> Result<(), StoreError>;

    async fn rename_form(&self, actor: &Actor, id: FormId, name: &str) -> Result<(), StoreError>;

    async fn update_description(
        &self,
        actor: &Actor,
        id: FormId,
        description: &str,
    ) -> Result<(), StoreError>;

    /// Open a published form by share token, counting the visit
    async fn load_published_form(&self, token: &str) -> Result<PublishedForm, StoreError>;

    /// Store one submission and bump the form's submission counter
    async fn record_submission(
        &self,
        token: &str,
        values: SubmissionValues,
    ) -> Result<(), StoreError>;

    /// Submissions of one form, newest first
    async fn list_submissions(
        &self,
        actor: &Actor,
        id: FormId,
    ) -> Result<Vec<SubmissionRecord>, StoreError>;

    /// Visits and submissions summed over the actor's forms
    async fn form_stats(&self, actor: &Actor) -> Result<FormStats, StoreError>;

    /// Delete a form and its submissions (admin only)
    async fn delete_form(&self, actor: &Actor, id: FormId) -> Result<(), StoreError>;

    /// Total number of forms (admin only)
    async fn count_forms(&self, actor: &Actor) -> Result<u64, StoreError>;

    /// Forms created per day over an inclusive date range (admin only)
    async fn forms_created_per_day(
        &self,
        actor: &Actor,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCount>, StoreError>;
}
