//! Single-file JSON database
//!
//! All forms and submissions live in `forms.json` inside the data directory.
//! The whole database is held in memory behind a mutex; each mutation is
//! applied to a copy, written to a temporary file and renamed over the old
//! one before the in-memory state is replaced.

use super::error::StoreError;
use super::model::{DailyCount, FormId, FormRecord, FormStats, PublishedForm, SubmissionRecord};
use super::traits::FormStore;
use crate::builder::{FieldElement, SubmissionValues};
use crate::identity::Actor;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

const DB_FILE: &str = "forms.json";
const NAME_LEN: (usize, usize) = (4, 50);
const DESCRIPTION_MAX: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Database {
    next_form_id: FormId,
    next_submission_id: u64,
    forms: Vec<FormRecord>,
    submissions: Vec<SubmissionRecord>,
}

impl Database {
    fn form(&self, actor: &Actor, id: FormId) -> Result<&FormRecord, StoreError> {
        self.forms
            .iter()
            .find(|f| f.id == id && can_see(actor, f))
            .ok_or(StoreError::NotFound)
    }

    fn form_mut(&mut self, actor: &Actor, id: FormId) -> Result<&mut FormRecord, StoreError> {
        self.forms
            .iter_mut()
            .find(|f| f.id == id && can_see(actor, f))
            .ok_or(StoreError::NotFound)
    }

    fn published_mut(&mut self, token: &str) -> Result<&mut FormRecord, StoreError> {
        let form = self
            .forms
            .iter_mut()
            .find(|f| f.share_token == token)
            .ok_or(StoreError::NotFound)?;
        if !form.published {
            return Err(StoreError::NotPublished);
        }
        Ok(form)
    }
}

fn can_see(actor: &Actor, form: &FormRecord) -> bool {
    actor.is_admin || form.owner_id == actor.id
}

fn require_admin(actor: &Actor) -> Result<(), StoreError> {
    if actor.is_admin {
        Ok(())
    } else {
        warn!("Actor {} attempted an admin action", actor.id);
        Err(StoreError::Unauthorized)
    }
}

fn validate_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    let len = name.chars().count();
    if len < NAME_LEN.0 || len > NAME_LEN.1 {
        return Err(StoreError::InvalidInput(format!(
            "Name must be between {} and {} characters",
            NAME_LEN.0, NAME_LEN.1
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: &str) -> Result<String, StoreError> {
    let description = description.trim();
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(StoreError::InvalidInput(format!(
            "Description must be at most {DESCRIPTION_MAX} characters"
        )));
    }
    Ok(description.to_string())
}

fn newest_first(mut forms: Vec<FormRecord>) -> Vec<FormRecord> {
    forms.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    forms
}

pub struct JsonFileStore {
    path: PathBuf,
    db: Mutex<Database>,
}

impl JsonFileStore {
    /// Open the database in `data_dir`, creating the directory when missing
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(DB_FILE);
        let db = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Database::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Database::default(),
            Err(e) => return Err(e.into()),
        };
        info!("Opened form store at {}", path.display());
        Ok(Self {
            path,
            db: Mutex::new(db),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, db: &Database) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(db)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `f` to a copy of the database and commit it once written
    async fn update<T>(
        &self,
        f: impl FnOnce(&mut Database) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut db = self.db.lock().await;
        let mut next = db.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *db = next;
        Ok(out)
    }
}

#[async_trait]
impl FormStore for JsonFileStore {
    async fn create_form(
        &self,
        actor: &Actor,
        name: &str,
        description: &str,
    ) -> Result<FormId, StoreError> {
        let name = validate_name(name)?;
        let description = validate_description(description)?;
        let id = self
            .update(|db| {
                db.next_form_id += 1;
                let id = db.next_form_id;
                db.forms.push(FormRecord {
                    id,
                    owner_id: actor.id.clone(),
                    created_at: Utc::now(),
                    published: false,
                    name,
                    description,
                    content: Vec::new(),
                    visits: 0,
                    submissions: 0,
                    share_token: uuid::Uuid::new_v4().to_string(),
                });
                Ok(id)
            })
            .await?;
        info!("Form {id} created by {}", actor.id);
        Ok(id)
    }

    async fn list_forms(&self, actor: &Actor) -> Result<Vec<FormRecord>, StoreError> {
        let db = self.db.lock().await;
        let own = db
            .forms
            .iter()
            .filter(|f| f.owner_id == actor.id)
            .cloned()
            .collect();
        Ok(newest_first(own))
    }

    async fn list_all_forms(&self, actor: &Actor) -> Result<Vec<FormRecord>, StoreError> {
        require_admin(actor)?;
        let db = self.db.lock().await;
        Ok(newest_first(db.forms.clone()))
    }

    async fn load_form(&self, actor: &Actor, id: FormId) -> Result<FormRecord, StoreError> {
        let db = self.db.lock().await;
        db.form(actor, id).cloned()
    }

    async fn save_form_content(
        &self,
        actor: &Actor,
        id: FormId,
        elements: Vec<FieldElement>,
    ) -> Result<(), StoreError> {
        let count = elements.len();
        self.update(|db| {
            db.form_mut(actor, id)?.content = elements;
            Ok(())
        })
        .await?;
        info!("Saved {count} elements to form {id}");
        Ok(())
    }

    async fn set_published(
        &self,
        actor: &Actor,
        id: FormId,
        published: bool,
    ) -> Result<(), StoreError> {
        self.update(|db| {
            db.form_mut(actor, id)?.published = published;
            Ok(())
        })
        .await?;
        info!("Form {id} published: {published}");
        Ok(())
    }

    async fn rename_form(&self, actor: &Actor, id: FormId, name: &str) -> Result<(), StoreError> {
        let name = validate_name(name)?;
        self.update(|db| {
            db.form_mut(actor, id)?.name = name;
            Ok(())
        })
        .await?;
        info!("Form {id} renamed");
        Ok(())
    }

    async fn update_description(
        &self,
        actor: &Actor,
        id: FormId,
        description: &str,
    ) -> Result<(), StoreError> {
        let description = validate_description(description)?;
        self.update(|db| {
            db.form_mut(actor, id)?.description = description;
            Ok(())
        })
        .await?;
        info!("Form {id} description updated");
        Ok(())
    }

    async fn load_published_form(&self, token: &str) -> Result<PublishedForm, StoreError> {
        self.update(|db| {
            let form = db.published_mut(token)?;
            form.visits += 1;
            Ok(PublishedForm {
                id: form.id,
                name: form.name.clone(),
                description: form.description.clone(),
                content: form.content.clone(),
            })
        })
        .await
    }

    async fn record_submission(
        &self,
        token: &str,
        values: SubmissionValues,
    ) -> Result<(), StoreError> {
        let form_id = self
            .update(|db| {
                let form = db.published_mut(token)?;
                form.submissions += 1;
                let form_id = form.id;
                db.next_submission_id += 1;
                db.submissions.push(SubmissionRecord {
                    id: db.next_submission_id,
                    form_id,
                    created_at: Utc::now(),
                    content: values,
                });
                Ok(form_id)
            })
            .await?;
        info!("Recorded submission for form {form_id}");
        Ok(())
    }

    async fn list_submissions(
        &self,
        actor: &Actor,
        id: FormId,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        let db = self.db.lock().await;
        db.form(actor, id)?;
        let mut submissions: Vec<SubmissionRecord> = db
            .submissions
            .iter()
            .filter(|s| s.form_id == id)
            .cloned()
            .collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(submissions)
    }

    async fn form_stats(&self, actor: &Actor) -> Result<FormStats, StoreError> {
        let db = self.db.lock().await;
        let (visits, submissions) = db
            .forms
            .iter()
            .filter(|f| f.owner_id == actor.id)
            .fold((0, 0), |(v, s), f| (v + f.visits, s + f.submissions));
        Ok(FormStats::new(visits, submissions))
    }

    async fn delete_form(&self, actor: &Actor, id: FormId) -> Result<(), StoreError> {
        require_admin(actor)?;
        self.update(|db| {
            let before = db.forms.len();
            db.forms.retain(|f| f.id != id);
            if db.forms.len() == before {
                return Err(StoreError::NotFound);
            }
            db.submissions.retain(|s| s.form_id != id);
            Ok(())
        })
        .await?;
        info!("Form {id} deleted by {}", actor.id);
        Ok(())
    }

    async fn count_forms(&self, actor: &Actor) -> Result<u64, StoreError> {
        require_admin(actor)?;
        let db = self.db.lock().await;
        Ok(db.forms.len() as u64)
    }

    async fn forms_created_per_day(
        &self,
        actor: &Actor,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCount>, StoreError> {
        require_admin(actor)?;
        if start > end {
            return Err(StoreError::InvalidInput(
                "Start date must not be after end date".to_string(),
            ));
        }
        let db = self.db.lock().await;
        Ok(start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|date| DailyCount {
                date,
                count: db
                    .forms
                    .iter()
                    .filter(|f| f.created_at.date_naive() == date)
                    .count() as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ElementId, FieldTypeTag, FieldValue};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("formsmith-test-{}", uuid::Uuid::new_v4()))
    }

    fn user(id: &str) -> Actor {
        Actor {
            id: id.to_string(),
            is_admin: false,
        }
    }

    fn admin() -> Actor {
        Actor {
            id: "root".to_string(),
            is_admin: true,
        }
    }

    async fn published_form(store: &JsonFileStore, actor: &Actor) -> FormRecord {
        let id = store.create_form(actor, "Survey", "").await.unwrap();
        store.set_published(actor, id, true).await.unwrap();
        store.load_form(actor, id).await.unwrap()
    }

    mod forms {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_create_and_list_newest_first() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            let alice = user("alice");
            let first = store.create_form(&alice, "First form", "").await.unwrap();
            let second = store.create_form(&alice, "Second form", "desc").await.unwrap();
            store.create_form(&user("bob"), "Bob's form", "").await.unwrap();

            let forms = store.list_forms(&alice).await.unwrap();
            let ids: Vec<FormId> = forms.iter().map(|f| f.id).collect();
            assert_eq!(ids, vec![second, first]);
            assert!(!forms[0].published);
            assert_ne!(forms[0].share_token, forms[1].share_token);
        }

        #[tokio::test]
        async fn test_name_and_description_limits() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            let alice = user("alice");
            assert!(matches!(
                store.create_form(&alice, "abc", "").await,
                Err(StoreError::InvalidInput(_))
            ));
            assert!(matches!(
                store.create_form(&alice, "Valid", &"x".repeat(201)).await,
                Err(StoreError::InvalidInput(_))
            ));
        }

        #[tokio::test]
        async fn test_other_owners_forms_are_not_found() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            let id = store.create_form(&user("alice"), "Private", "").await.unwrap();
            assert!(matches!(
                store.load_form(&user("bob"), id).await,
                Err(StoreError::NotFound)
            ));
            assert!(store.load_form(&admin(), id).await.is_ok());
        }

        #[tokio::test]
        async fn test_content_survives_reopen() {
            let dir = temp_dir();
            let alice = user("alice");
            let element =
                crate::builder::registry::lookup(FieldTypeTag::TextField).construct(ElementId::from("e1"));
            let id = {
                let store = JsonFileStore::open(&dir).await.unwrap();
                let id = store.create_form(&alice, "Persisted", "").await.unwrap();
                store
                    .save_form_content(&alice, id, vec![element.clone()])
                    .await
                    .unwrap();
                store.rename_form(&alice, id, "Renamed").await.unwrap();
                id
            };
            let store = JsonFileStore::open(&dir).await.unwrap();
            let form = store.load_form(&alice, id).await.unwrap();
            assert_eq!(form.content, vec![element]);
            assert_eq!(form.name, "Renamed");
        }
    }

    mod publishing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_unpublished_form_is_closed() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            let alice = user("alice");
            let id = store.create_form(&alice, "Draft form", "").await.unwrap();
            let token = store.load_form(&alice, id).await.unwrap().share_token;
            assert!(matches!(
                store.load_published_form(&token).await,
                Err(StoreError::NotPublished)
            ));
            assert!(matches!(
                store.record_submission(&token, SubmissionValues::new()).await,
                Err(StoreError::NotPublished)
            ));
            assert!(matches!(
                store.load_published_form("nope").await,
                Err(StoreError::NotFound)
            ));
        }

        #[tokio::test]
        async fn test_visits_submissions_and_stats() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            let alice = user("alice");
            let form = published_form(&store, &alice).await;

            for _ in 0..4 {
                store.load_published_form(&form.share_token).await.unwrap();
            }
            let mut values = SubmissionValues::new();
            values.insert(ElementId::from("e1"), FieldValue::Text("hi".into()));
            store
                .record_submission(&form.share_token, values.clone())
                .await
                .unwrap();

            let stats = store.form_stats(&alice).await.unwrap();
            assert_eq!(stats, FormStats::new(4, 1));
            assert_eq!(stats.submission_rate, 25.0);

            let submissions = store.list_submissions(&alice, form.id).await.unwrap();
            assert_eq!(submissions.len(), 1);
            assert_eq!(submissions[0].content, values);
        }
    }

    mod admin_calls {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_admin_only_calls_reject_users() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            let alice = user("alice");
            let id = store.create_form(&alice, "Mine", "").await.unwrap();
            assert!(matches!(
                store.list_all_forms(&alice).await,
                Err(StoreError::Unauthorized)
            ));
            assert!(matches!(
                store.count_forms(&alice).await,
                Err(StoreError::Unauthorized)
            ));
            assert!(matches!(
                store.delete_form(&alice, id).await,
                Err(StoreError::Unauthorized)
            ));
        }

        #[tokio::test]
        async fn test_delete_removes_submissions() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            let alice = user("alice");
            let form = published_form(&store, &alice).await;
            store
                .record_submission(&form.share_token, SubmissionValues::new())
                .await
                .unwrap();
            store.delete_form(&admin(), form.id).await.unwrap();
            assert_eq!(store.count_forms(&admin()).await.unwrap(), 0);
            assert!(matches!(
                store.delete_form(&admin(), form.id).await,
                Err(StoreError::NotFound)
            ));
        }

        #[tokio::test]
        async fn test_forms_per_day_is_zero_filled() {
            let store = JsonFileStore::open(&temp_dir()).await.unwrap();
            store.create_form(&user("alice"), "Today", "").await.unwrap();
            store.create_form(&user("bob"), "Also today", "").await.unwrap();
            let today = Utc::now().date_naive();
            let start = today - chrono::Days::new(6);

            let days = store
                .forms_created_per_day(&admin(), start, today)
                .await
                .unwrap();
            assert_eq!(days.len(), 7);
            assert_eq!(days[0], DailyCount { date: start, count: 0 });
            assert_eq!(days[6], DailyCount { date: today, count: 2 });
            assert!(store
                .forms_created_per_day(&admin(), today, start)
                .await
                .is_err());
        }
    }
}
