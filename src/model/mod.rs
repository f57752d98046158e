pub mod task;
pub mod project;
pub mod role;
pub mod records;
pub mod lenient;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use task::{Priority, Task, TaskStatus, TaskUpdate};
pub use project::{Project, TaskCounts};
pub use role::{Permission, Role, RolePermission};
pub use records::{
    CustomEventRecord, FileRecord, KeyResult, Kpi, NewCustomEvent, NewKpi, NewOkr, NewTimeEntry,
    Notification, NotificationSettings, Okr, TimeEntry, User,
};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be {expected}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
    },
}

/// Identifier of a remote record.
///
/// The API is not consistent about id types: some resources use numeric ids,
/// others strings. Both deserialize into the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct RecordId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for RecordId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        id: RecordId,
    }

    #[test]
    fn numeric_and_text_ids_deserialize_to_same_form() {
        let numeric: Holder = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        let text: Holder = serde_json::from_str(r#"{"id": "5"}"#).unwrap();

        assert_eq!(numeric.id, text.id);
        assert_eq!(numeric.id.as_str(), "5");
    }

    #[test]
    fn record_id_serializes_as_string() {
        let json = serde_json::to_string(&RecordId::from(42)).unwrap();
        assert_eq!(json, r#""42""#);
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = ValidationError::MissingField("name");
        assert_eq!(err.to_string(), "name is required");
    }
}
