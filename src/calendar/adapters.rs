use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::calendar::{CalendarEvent, EventKind};
use crate::model::{CustomEventRecord, Project, Task};

pub const PROJECT_COLOR: &str = "red";
pub const TASK_COLOR: &str = "blue";
pub const CUSTOM_COLOR: &str = "purple";

/// Time of day given to events whose source record carries no time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterDefaults {
    pub project_time: NaiveTime,
    pub task_time: NaiveTime,
}

impl Default for AdapterDefaults {
    fn default() -> Self {
        Self {
            project_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            task_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Extracts the calendar day from `YYYY-MM-DD` or any ISO timestamp that
/// starts with one. The date portion is taken literally, without timezone
/// conversion.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DATE_RE.get_or_init(|| {
        Regex::new(r"^\s*(\d{4})-(\d{2})-(\d{2})").expect("invalid date prefix regex")
    });

    let caps = re.captures(raw)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

pub fn project_event(project: &Project, defaults: &AdapterDefaults) -> CalendarEvent {
    CalendarEvent {
        id: format!("project-{}", project.id),
        kind: EventKind::Deadline,
        title: project.name.clone(),
        date: project.due_day(),
        time: Some(defaults.project_time),
        color: PROJECT_COLOR.to_string(),
        description: project.description.clone(),
    }
}

pub fn task_event(task: &Task, defaults: &AdapterDefaults) -> CalendarEvent {
    CalendarEvent {
        id: format!("task-{}", task.id),
        kind: EventKind::Task,
        title: task.title.clone(),
        date: task.due_day(),
        time: Some(defaults.task_time),
        color: TASK_COLOR.to_string(),
        description: task.description.clone(),
    }
}

pub fn custom_event(record: &CustomEventRecord) -> CalendarEvent {
    CalendarEvent {
        id: record.id.to_string(),
        kind: record
            .kind
            .as_deref()
            .map(EventKind::from_label)
            .unwrap_or(EventKind::Custom),
        title: record.title.clone(),
        date: record.date.as_deref().and_then(normalize_date),
        time: record.time.as_deref().and_then(parse_time),
        color: record
            .color
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| CUSTOM_COLOR.to_string()),
        description: record.description.clone(),
    }
}

pub fn project_events(projects: &[Project], defaults: &AdapterDefaults) -> Vec<CalendarEvent> {
    projects.iter().map(|p| project_event(p, defaults)).collect()
}

pub fn task_events(tasks: &[Task], defaults: &AdapterDefaults) -> Vec<CalendarEvent> {
    tasks.iter().map(|t| task_event(t, defaults)).collect()
}

pub fn custom_events(records: &[CustomEventRecord]) -> Vec<CalendarEvent> {
    records.iter().map(custom_event).collect()
}
