use chrono::NaiveDate;
use crate::app::AppState;
use crate::calendar::{CalendarEvent, EventKind};

#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub is_today: bool,
    pub untimed: Vec<EventEntry>,
    pub hours: Vec<HourBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourBlock {
    pub hour: u32,
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub event_id: String,
    pub title: String,
    pub kind: EventKind,
    pub color: String,
    pub start_minute: Option<u32>,
    pub description: Option<String>,
}

impl From<&CalendarEvent> for EventEntry {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            kind: event.kind,
            color: event.color.clone(),
            start_minute: event.minute(),
            description: event.description.clone(),
        }
    }
}

pub fn calculate_layout(state: &AppState) -> DayLayout {
    let date = state.selected_date;
    let today = chrono::Local::now().date_naive();
    let events = state.get_events_for_date(date);

    DayLayout {
        date,
        is_today: date == today,
        untimed: events
            .iter()
            .filter(|e| e.time.is_none())
            .map(|e| EventEntry::from(*e))
            .collect(),
        hours: build_hour_blocks(&events),
    }
}

fn build_hour_blocks(events: &[&CalendarEvent]) -> Vec<HourBlock> {
    (0..24)
        .map(|hour| HourBlock {
            hour,
            events: events
                .iter()
                .filter(|e| e.hour() == Some(hour))
                .map(|e| EventEntry::from(*e))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Task, TaskStatus};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn state_on(selected: NaiveDate) -> AppState {
        let mut state = AppState::new();
        state.selected_date = selected;
        state
    }

    fn project_due(day: &str) -> Project {
        Project {
            id: 3.into(),
            name: "Website relaunch".to_string(),
            description: Some("Public launch".to_string()),
            status: None,
            due_date: Some(day.to_string()),
            progress: 40,
        }
    }

    fn task_due(day: &str) -> Task {
        Task {
            id: 8.into(),
            title: "QA pass".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: Default::default(),
            progress: 50,
            assignee: None,
            due_date: Some(day.to_string()),
            project_id: Some(3.into()),
        }
    }

    #[test]
    fn day_layout_has_24_hours_in_order() {
        let layout = calculate_layout(&state_on(date(2025, 1, 15)));

        assert_eq!(layout.date, date(2025, 1, 15));
        assert_eq!(layout.hours.len(), 24);
        for (i, hour_block) in layout.hours.iter().enumerate() {
            assert_eq!(hour_block.hour, i as u32);
        }
    }

    #[test]
    fn deadlines_and_tasks_land_on_default_hours() {
        let mut state = state_on(date(2025, 1, 15));
        state.calendar.set_projects(&[project_due("2025-01-15")]);
        state.calendar.set_tasks(&[task_due("2025-01-15T18:30:00Z")]);

        let layout = calculate_layout(&state);

        let deadline = &layout.hours[9].events[0];
        assert_eq!(deadline.event_id, "project-3");
        assert_eq!(deadline.kind, EventKind::Deadline);
        assert_eq!(deadline.description.as_deref(), Some("Public launch"));
        assert_eq!(deadline.start_minute, Some(0));

        let task = &layout.hours[10].events[0];
        assert_eq!(task.event_id, "task-8");
        assert_eq!(task.color, "blue");
    }

    #[test]
    fn empty_hours_have_no_events() {
        let layout = calculate_layout(&state_on(date(2025, 1, 15)));

        assert!(layout.hours.iter().all(|h| h.events.is_empty()));
        assert!(layout.untimed.is_empty());
    }

    #[test]
    fn is_today_flag_set_correctly() {
        let mut state = AppState::new();
        state.go_to_today();
        assert!(calculate_layout(&state).is_today);

        assert!(!calculate_layout(&state_on(date(2025, 1, 1))).is_today);
    }
}
