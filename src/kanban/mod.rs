pub mod board;
pub mod progress;

pub use board::{BoardError, KanbanBoard, MoveOutcome, MoveRequest, tasks_by_status};
pub use progress::progress_for_move;
