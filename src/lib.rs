pub mod model;
pub mod calendar;
pub mod kanban;
pub mod access;
pub mod filter;
pub mod app;
pub mod ui;
pub mod sync;
pub mod storage;

pub use app::{AppState, SyncStatus, ViewType};
pub use calendar::{CalendarAggregator, CalendarEvent, EventKind};
pub use kanban::{KanbanBoard, MoveOutcome, MoveRequest};
pub use sync::{RefreshBus, RequestScope, Signal, Topic};
