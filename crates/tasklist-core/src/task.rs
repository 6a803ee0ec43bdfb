use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// List a task lands in when the caller does not name one.
pub const DEFAULT_LIST_TYPE: &str = "Personal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub list_type: String,
    pub completed: bool,
    /// Pinned flag.
    pub priority: bool,
    pub notes: String,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_time: Option<NaiveTime>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
}

impl CreateTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            list_type: None,
        }
    }

    pub fn with_list_type(mut self, list_type: impl Into<String>) -> Self {
        self.list_type = Some(list_type.into());
        self
    }

    /// Resolve the title and list type to insert. A missing title is
    /// rejected; an empty one is accepted as-is.
    pub fn resolve(&self) -> Result<(&str, &str), CoreError> {
        let title = self
            .title
            .as_deref()
            .ok_or(CoreError::MissingField("title"))?;
        let list_type = self.list_type.as_deref().unwrap_or(DEFAULT_LIST_TYPE);
        Ok((title, list_type))
    }
}

/// Sparse patch over a task.
///
/// Every field is tri-state: `None` leaves the column untouched,
/// `Some(None)` writes NULL, `Some(Some(v))` writes `v`. Only the reminder
/// fields, `notes` and `due_date` may be nulled; see [`UpdateTask::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub reminder_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub list_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self.completed.is_none()
            && self.reminder_date.is_none()
            && self.reminder_time.is_none()
            && self.title.is_none()
            && self.notes.is_none()
            && self.priority.is_none()
            && self.list_type.is_none()
            && self.due_date.is_none()
    }

    /// Reject explicit nulls on columns that are NOT NULL in storage.
    pub fn validate(&self) -> Result<(), CoreError> {
        if matches!(self.completed, Some(None)) {
            return Err(CoreError::NullField("completed"));
        }
        if matches!(self.title, Some(None)) {
            return Err(CoreError::NullField("title"));
        }
        if matches!(self.priority, Some(None)) {
            return Err(CoreError::NullField("priority"));
        }
        if matches!(self.list_type, Some(None)) {
            return Err(CoreError::NullField("list_type"));
        }
        Ok(())
    }
}

// A present key always yields `Some`, so `null` becomes `Some(None)` instead
// of collapsing into "absent".
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
