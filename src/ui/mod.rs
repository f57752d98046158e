pub mod month_view;
pub mod week_view;
pub mod day_view;
