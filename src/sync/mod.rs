pub mod api;
pub mod scope;
pub mod listeners;
pub mod refresh_bus;
pub mod session;
pub mod notifications;
pub mod sync_engine;

pub use api::{ApiError, DashboardApi, RestClient};
pub use refresh_bus::{RefreshBus, Signal, TaskChange, Topic};
pub use scope::{Cancelled, RequestScope};
pub use session::{AuthError, Session};
