use chrono::{NaiveDate, Weekday};
use crate::app::AppState;
use crate::calendar::{CalendarEvent, EventKind};
use crate::ui::month_view::column_of;

#[derive(Debug, Clone, PartialEq)]
pub struct WeekLayout {
    pub week_start: NaiveDate,
    pub days: Vec<DayColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
    pub untimed: Vec<EventBlock>,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    pub hour: u32,
    pub events: Vec<EventBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBlock {
    pub event_id: String,
    pub title: String,
    pub kind: EventKind,
    pub color: String,
    pub start_minute: Option<u32>,
}

impl From<&CalendarEvent> for EventBlock {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            kind: event.kind,
            color: event.color.clone(),
            start_minute: event.minute(),
        }
    }
}

/// First day of the week containing `date`.
pub fn week_of_date(date: NaiveDate, start: Weekday) -> NaiveDate {
    date.checked_sub_days(chrono::Days::new(column_of(date, start) as u64))
        .unwrap_or(date)
}

pub fn calculate_layout(state: &AppState) -> WeekLayout {
    let week_start = week_of_date(state.selected_date, state.week_start);
    let today = chrono::Local::now().date_naive();

    let mut days = Vec::new();

    for day_offset in 0..7u64 {
        let Some(date) = week_start.checked_add_days(chrono::Days::new(day_offset)) else {
            continue;
        };
        let events = state.get_events_for_date(date);

        days.push(DayColumn {
            date,
            is_selected: date == state.selected_date,
            is_today: date == today,
            untimed: events
                .iter()
                .filter(|e| e.time.is_none())
                .map(|e| EventBlock::from(*e))
                .collect(),
            slots: build_time_slots(&events),
        });
    }

    WeekLayout { week_start, days }
}

fn build_time_slots(events: &[&CalendarEvent]) -> Vec<TimeSlot> {
    let mut slots = Vec::new();

    for hour in 0..24 {
        let hour_events: Vec<EventBlock> = events
            .iter()
            .filter(|e| e.hour() == Some(hour))
            .map(|e| EventBlock::from(*e))
            .collect();

        if !hour_events.is_empty() {
            slots.push(TimeSlot {
                hour,
                events: hour_events,
            });
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use crate::model::CustomEventRecord;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn event(id: &str, day: &str, time: Option<&str>) -> CustomEventRecord {
        CustomEventRecord {
            id: id.into(),
            title: format!("Event {}", id),
            date: Some(day.to_string()),
            time: time.map(str::to_string),
            kind: Some("review".to_string()),
            color: None,
            description: None,
        }
    }

    fn state_on(selected: NaiveDate) -> AppState {
        let mut state = AppState::new();
        state.selected_date = selected;
        state
    }

    #[test]
    fn week_of_date_returns_monday() {
        let monday = week_of_date(date(2025, 1, 15), Weekday::Mon);
        assert_eq!(monday, date(2025, 1, 13));
        assert_eq!(monday.weekday(), Weekday::Mon);
    }

    #[test]
    fn week_of_date_for_sunday_returns_previous_monday() {
        assert_eq!(week_of_date(date(2025, 1, 19), Weekday::Mon), date(2025, 1, 13));
    }

    #[test]
    fn week_of_date_honours_sunday_start() {
        assert_eq!(week_of_date(date(2025, 1, 15), Weekday::Sun), date(2025, 1, 12));
        assert_eq!(week_of_date(date(2025, 1, 19), Weekday::Sun), date(2025, 1, 19));
    }

    #[test]
    fn week_layout_spans_seven_days_from_week_start() {
        let mut state = state_on(date(2025, 1, 15));
        state.week_start = Weekday::Sat;

        let layout = calculate_layout(&state);

        assert_eq!(layout.days.len(), 7);
        assert_eq!(layout.days[0].date, date(2025, 1, 11));
        assert_eq!(layout.days[6].date.weekday(), Weekday::Fri);
    }

    #[test]
    fn selected_date_is_marked() {
        let layout = calculate_layout(&state_on(date(2025, 1, 15)));

        let selected_days: Vec<_> = layout.days.iter()
            .filter(|d| d.is_selected)
            .collect();

        assert_eq!(selected_days.len(), 1);
        assert_eq!(selected_days[0].date, date(2025, 1, 15));
    }

    #[test]
    fn timed_events_are_organized_by_hour() {
        let mut state = state_on(date(2025, 1, 15));
        state.calendar.set_custom_events(&[
            event("e2", "2025-01-15", Some("14:00")),
            event("e1", "2025-01-15", Some("09:45")),
            event("e3", "2025-01-15", Some("09:00")),
        ]);

        let layout = calculate_layout(&state);
        let slots = &layout.days[2].slots;

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].hour, 9);
        assert_eq!(slots[0].events.len(), 2);
        assert_eq!(slots[0].events[0].event_id, "e3");
        assert_eq!(slots[0].events[1].start_minute, Some(45));
        assert_eq!(slots[1].hour, 14);
    }

    #[test]
    fn untimed_events_are_listed_separately() {
        let mut state = state_on(date(2025, 1, 15));
        state.calendar.set_custom_events(&[event("all-day", "2025-01-15", None)]);

        let layout = calculate_layout(&state);
        let wednesday = &layout.days[2];

        assert!(wednesday.slots.is_empty());
        assert_eq!(wednesday.untimed.len(), 1);
        assert_eq!(wednesday.untimed[0].kind, EventKind::Review);
    }
}
