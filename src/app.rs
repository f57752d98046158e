use chrono::{Datelike, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarAggregator, CalendarEvent};
use crate::storage::config::{Config, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Month,
    Week,
    Day,
}

impl ViewType {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "month" => Some(ViewType::Month),
            "week" => Some(ViewType::Week),
            "day" => Some(ViewType::Day),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Synced,
    Syncing,
    Offline,
    Error(String),
}

/// Calendar page state: the aggregated events plus what is being looked at.
pub struct AppState {
    pub view: ViewType,
    pub selected_date: NaiveDate,
    pub week_start: Weekday,
    pub calendar: CalendarAggregator,
    pub sync_status: SyncStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: ViewType::Month,
            selected_date: Local::now().date_naive(),
            week_start: Weekday::Mon,
            calendar: CalendarAggregator::default(),
            sync_status: SyncStatus::Offline,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let view = ViewType::parse(&config.calendar.default_view).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "calendar.default_view",
                value: config.calendar.default_view.clone(),
            }
        })?;

        Ok(Self {
            view,
            week_start: config.calendar.week_start()?,
            calendar: CalendarAggregator::new(config.calendar.adapter_defaults()?),
            ..Self::new()
        })
    }

    /// Events on `date`, untimed first, then by time. Ties keep aggregation
    /// order.
    pub fn get_events_for_date(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        let mut events = self.calendar.events_for_day(date);
        events.sort_by_key(|e| e.time);
        events
    }

    pub fn go_to_today(&mut self) {
        self.selected_date = Local::now().date_naive();
    }

    pub fn next_period(&mut self) {
        self.shift_period(true);
    }

    pub fn prev_period(&mut self) {
        self.shift_period(false);
    }

    fn shift_period(&mut self, forward: bool) {
        let date = self.selected_date;
        let shifted = match (self.view, forward) {
            (ViewType::Month, true) => date.checked_add_months(Months::new(1)),
            (ViewType::Month, false) => date.checked_sub_months(Months::new(1)),
            (ViewType::Week, true) => date.checked_add_days(chrono::Days::new(7)),
            (ViewType::Week, false) => date.checked_sub_days(chrono::Days::new(7)),
            (ViewType::Day, true) => date.succ_opt(),
            (ViewType::Day, false) => date.pred_opt(),
        };
        if let Some(shifted) = shifted {
            self.selected_date = shifted;
        }
    }

    /// Title for the header of the current view.
    pub fn period_label(&self) -> String {
        match self.view {
            ViewType::Month => self.selected_date.format("%B %Y").to_string(),
            ViewType::Week => {
                let start = crate::ui::week_view::week_of_date(self.selected_date, self.week_start);
                format!("Week of {}", start.format("%b %-d, %Y"))
            }
            ViewType::Day => format!(
                "{}, {}",
                self.selected_date.weekday(),
                self.selected_date.format("%b %-d, %Y")
            ),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
