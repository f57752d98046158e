use serde::{Deserialize, Serialize};

use crate::calendar::adapters::normalize_date;
use crate::model::{RecordId, Role, ValidationError, lenient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEventRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomEvent {
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCustomEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if normalize_date(&self.date).is_none() {
            return Err(ValidationError::OutOfRange {
                field: "date",
                expected: "a YYYY-MM-DD date",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub target: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub current: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Kpi {
    pub fn attainment_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.current / self.target * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewKpi {
    pub name: String,
    pub target: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl NewKpi {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if !(self.target.is_finite() && self.target > 0.0) {
            return Err(ValidationError::OutOfRange {
                field: "target",
                expected: "a positive number",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::percent")]
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Okr {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub objective: String,
    #[serde(default, alias = "keyResults", deserialize_with = "lenient::null_as_default")]
    pub key_results: Vec<KeyResult>,
}

impl Okr {
    /// Mean progress of the key results; an OKR without key results is at 0.
    pub fn progress(&self) -> u8 {
        if self.key_results.is_empty() {
            return 0;
        }
        let sum: u32 = self.key_results.iter().map(|kr| u32::from(kr.progress)).sum();
        (sum / self.key_results.len() as u32) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOkr {
    pub objective: String,
    pub key_results: Vec<KeyResult>,
}

impl NewOkr {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.objective.trim().is_empty() {
            return Err(ValidationError::MissingField("objective"));
        }
        if self.key_results.iter().any(|kr| kr.title.trim().is_empty()) {
            return Err(ValidationError::MissingField("key result title"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub read: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub task_updates: bool,
    pub project_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            task_updates: true,
            project_updates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: RecordId,
    #[serde(default, alias = "taskId")]
    pub task_id: Option<RecordId>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub minutes: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTimeEntry {
    pub task_id: RecordId,
    pub date: String,
    pub minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTimeEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.minutes == 0 {
            return Err(ValidationError::OutOfRange {
                field: "minutes",
                expected: "greater than zero",
            });
        }
        if normalize_date(&self.date).is_none() {
            return Err(ValidationError::OutOfRange {
                field: "date",
                expected: "a YYYY-MM-DD date",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: RecordId,
    #[serde(default, alias = "filename", deserialize_with = "lenient::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub size: u64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "uploadedAt")]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub email: String,
    pub role: Role,
}
