use chrono::NaiveDate;

use crate::calendar::adapters::{self, AdapterDefaults};
use crate::calendar::CalendarEvent;
use crate::model::{CustomEventRecord, Project, Task};

/// Concatenates the three normalized sources: all project deadlines, then all
/// tasks, then all custom events.
pub fn aggregate(
    projects: &[CalendarEvent],
    tasks: &[CalendarEvent],
    custom: &[CalendarEvent],
) -> Vec<CalendarEvent> {
    projects
        .iter()
        .chain(tasks)
        .chain(custom)
        .cloned()
        .collect()
}

/// Linear scan; undated events never match.
pub fn events_for_day(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| e.is_on(date)).collect()
}

/// Holds the latest normalized list of each source and the merged projection.
/// Every source update recomputes the projection from scratch.
#[derive(Debug, Clone, Default)]
pub struct CalendarAggregator {
    defaults: AdapterDefaults,
    projects: Vec<CalendarEvent>,
    tasks: Vec<CalendarEvent>,
    custom: Vec<CalendarEvent>,
    events: Vec<CalendarEvent>,
}

impl CalendarAggregator {
    pub fn new(defaults: AdapterDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn set_projects(&mut self, projects: &[Project]) {
        self.projects = adapters::project_events(projects, &self.defaults);
        self.recompute();
    }

    pub fn set_tasks(&mut self, tasks: &[Task]) {
        self.tasks = adapters::task_events(tasks, &self.defaults);
        self.recompute();
    }

    pub fn set_custom_events(&mut self, records: &[CustomEventRecord]) {
        self.custom = adapters::custom_events(records);
        self.recompute();
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn events_for_day(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        events_for_day(&self.events, date)
    }

    pub fn has_events_on(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|e| e.is_on(date))
    }

    pub fn undated(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter().filter(|e| e.date.is_none())
    }

    fn recompute(&mut self) {
        self.events = aggregate(&self.projects, &self.tasks, &self.custom);
        tracing::debug!(
            "Calendar recomputed: {} projects, {} tasks, {} custom",
            self.projects.len(),
            self.tasks.len(),
            self.custom.len()
        );
    }
}
