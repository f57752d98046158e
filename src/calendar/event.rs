use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Deadline,
    Task,
    Custom,
    Meeting,
    Review,
}

impl EventKind {
    /// Unknown labels fall back to `Custom`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "deadline" => EventKind::Deadline,
            "task" => EventKind::Task,
            "meeting" => EventKind::Meeting,
            "review" => EventKind::Review,
            _ => EventKind::Custom,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            EventKind::Deadline => '!',
            EventKind::Task => '*',
            EventKind::Custom => '+',
            EventKind::Meeting => '@',
            EventKind::Review => '?',
        }
    }
}

/// One entry on the unified calendar, projected from a project, a task or a
/// custom event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub kind: EventKind,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub color: String,
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == Some(date)
    }

    pub fn hour(&self) -> Option<u32> {
        self.time.map(|t| t.hour())
    }

    pub fn minute(&self) -> Option<u32> {
        self.time.map(|t| t.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event(id: &str, date: Option<NaiveDate>, time: Option<NaiveTime>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            kind: EventKind::Custom,
            title: "Test Event".to_string(),
            date,
            time,
            color: "purple".to_string(),
            description: None,
        }
    }

    #[test]
    fn unknown_labels_are_custom() {
        assert_eq!(EventKind::from_label("Meeting"), EventKind::Meeting);
        assert_eq!(EventKind::from_label("review"), EventKind::Review);
        assert_eq!(EventKind::from_label("birthday"), EventKind::Custom);
    }

    #[test]
    fn event_is_on_its_own_date_only() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let event = create_test_event("e1", Some(day), None);

        assert!(event.is_on(day));
        assert!(!event.is_on(day.succ_opt().unwrap()));
    }

    #[test]
    fn undated_event_is_on_no_day() {
        let event = create_test_event("e1", None, None);
        assert!(!event.is_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn hour_and_minute_come_from_time() {
        let event = create_test_event("e1", None, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(event.hour(), Some(9));
        assert_eq!(event.minute(), Some(30));
    }
}
