use chrono::{Datelike, NaiveDate, Weekday};
use crate::app::AppState;
use crate::calendar::EventKind;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub weekdays: Vec<Weekday>,
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Week {
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
    pub is_current_month: bool,
    /// Kinds of the events on this day, in display order.
    pub markers: Vec<EventKind>,
}

impl DayCell {
    pub fn has_events(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// Column offset of `date` in a week starting on `start`.
pub fn column_of(date: NaiveDate, start: Weekday) -> u32 {
    (7 + date.weekday().num_days_from_monday() - start.num_days_from_monday()) % 7
}

pub fn calculate_layout(state: &AppState) -> MonthLayout {
    let year = state.selected_date.year();
    let month = state.selected_date.month();
    let today = chrono::Local::now().date_naive();

    let weekdays: Vec<Weekday> = std::iter::successors(Some(state.week_start), |d| Some(d.succ()))
        .take(7)
        .collect();

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthLayout { year, month, weekdays, weeks: Vec::new() };
    };

    let lead = column_of(first_day, state.week_start) as u64;
    let Some(mut current) = first_day.checked_sub_days(chrono::Days::new(lead)) else {
        return MonthLayout { year, month, weekdays, weeks: Vec::new() };
    };

    let mut weeks = Vec::new();
    loop {
        let mut days = Vec::with_capacity(7);
        for _ in 0..7 {
            days.push(DayCell {
                date: current,
                is_selected: current == state.selected_date,
                is_today: current == today,
                is_current_month: current.month() == month && current.year() == year,
                markers: state
                    .get_events_for_date(current)
                    .iter()
                    .map(|e| e.kind)
                    .collect(),
            });
            let Some(next) = current.succ_opt() else { break };
            current = next;
        }
        weeks.push(Week { days });

        if current.month() != month || current.year() != year {
            break;
        }
    }

    MonthLayout { year, month, weekdays, weeks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CustomEventRecord;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn meeting_on(id: &str, day: &str) -> CustomEventRecord {
        CustomEventRecord {
            id: id.into(),
            title: "Sync".to_string(),
            date: Some(day.to_string()),
            time: Some("10:00".to_string()),
            kind: Some("meeting".to_string()),
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
    fn month_layout_has_correct_year_and_month() {
        let layout = calculate_layout(&state_on(date(2025, 1, 15)));

        assert_eq!(layout.year, 2025);
        assert_eq!(layout.month, 1);
    }

    #[test]
    fn selected_date_is_marked_in_layout() {
        let layout = calculate_layout(&state_on(date(2025, 1, 15)));

        let selected_cells: Vec<_> = layout.weeks.iter()
            .flat_map(|w| &w.days)
            .filter(|c| c.is_selected)
            .collect();

        assert_eq!(selected_cells.len(), 1);
        assert_eq!(selected_cells[0].date, date(2025, 1, 15));
    }

    #[test]
    fn cells_with_events_carry_markers() {
        let mut state = state_on(date(2025, 1, 15));
        state.calendar.set_custom_events(&[meeting_on("m1", "2025-01-10")]);

        let layout = calculate_layout(&state);

        let marked: Vec<_> = layout.weeks.iter()
            .flat_map(|w| &w.days)
            .filter(|c| c.has_events())
            .collect();

        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].date, date(2025, 1, 10));
        assert_eq!(marked[0].markers, vec![EventKind::Meeting]);
    }

    #[test]
    fn each_week_has_seven_days() {
        let layout = calculate_layout(&state_on(date(2025, 1, 15)));

        assert_eq!(layout.weeks.len(), 5);
        for week in &layout.weeks {
            assert_eq!(week.days.len(), 7);
        }
    }

    #[test]
    fn monday_start_pads_with_previous_month() {
        let layout = calculate_layout(&state_on(date(2025, 1, 15)));

        let first_week = &layout.weeks[0];
        assert_eq!(first_week.days[0].date, date(2024, 12, 30));
        assert!(!first_week.days[0].is_current_month);
        assert_eq!(first_week.days[2].date, date(2025, 1, 1));
    }

    #[test]
    fn sunday_start_shifts_columns() {
        let mut state = state_on(date(2025, 6, 10));
        state.week_start = Weekday::Sun;

        let layout = calculate_layout(&state);

        assert_eq!(layout.weekdays[0], Weekday::Sun);
        assert_eq!(layout.weekdays[6], Weekday::Sat);
        assert_eq!(layout.weeks[0].days[0].date, date(2025, 6, 1));
        assert!(layout.weeks.iter().all(|w| w.days[0].date.weekday() == Weekday::Sun));
    }

    #[test]
    fn column_of_wraps_around_week_start() {
        assert_eq!(column_of(date(2025, 1, 13), Weekday::Mon), 0);
        assert_eq!(column_of(date(2025, 1, 19), Weekday::Mon), 6);
        assert_eq!(column_of(date(2025, 1, 19), Weekday::Sun), 0);
        assert_eq!(column_of(date(2025, 1, 13), Weekday::Sun), 1);
    }
}
