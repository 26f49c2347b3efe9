//! Persisted records and read models

use crate::builder::{FieldElement, SubmissionValues};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type FormId = u64;

/// A form definition with its counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub id: FormId,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub published: bool,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Stored as JSON text
    #[serde(default, with = "content_json")]
    pub content: Vec<FieldElement>,
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub submissions: u64,
    /// Public token respondents open the form with
    pub share_token: String,
}

impl FormRecord {
    /// Share of visits that ended in a submission, in percent
    pub fn submission_rate(&self) -> f64 {
        submission_rate(self.visits, self.submissions)
    }
}

mod content_json {
    use crate::builder::{FieldElement, FormDocument};
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        elements: &[FieldElement],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let json = FormDocument::new(elements.to_vec())
            .to_content_json()
            .map_err(ser::Error::custom)?;
        serializer.serialize_str(&json)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<FieldElement>, D::Error> {
        let text = String::deserialize(deserializer)?;
        FormDocument::from_content_json(&text)
            .map(|doc| doc.elements)
            .map_err(de::Error::custom)
    }
}

/// What a respondent gets to see of a published form
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedForm {
    pub id: FormId,
    pub name: String,
    pub description: String,
    pub content: Vec<FieldElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: u64,
    pub form_id: FormId,
    pub created_at: DateTime<Utc>,
    pub content: SubmissionValues,
}

/// Counters summed over an actor's forms
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormStats {
    pub visits: u64,
    pub submissions: u64,
    pub submission_rate: f64,
}

impl FormStats {
    pub fn new(visits: u64, submissions: u64) -> Self {
        Self {
            visits,
            submissions,
            submission_rate: submission_rate(visits, submissions),
        }
    }

    pub fn bounce_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            100.0 - self.submission_rate
        }
    }
}

/// Forms created on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

fn submission_rate(visits: u64, submissions: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    submissions as f64 / visits as f64 * 100.0
}
