pub mod event;
pub mod adapters;
pub mod aggregator;
pub mod sources;

pub use event::{CalendarEvent, EventKind};
pub use adapters::AdapterDefaults;
pub use aggregator::{CalendarAggregator, aggregate, events_for_day};
pub use sources::refresh_calendar;
