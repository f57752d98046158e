use crate::model::TaskStatus;

/// Progress a task must take when it is moved into `target`, or `None` when
/// the move leaves progress alone.
///
/// | target      | current progress | result    |
/// |-------------|------------------|-----------|
/// | Completed   | any              | 100       |
/// | In Progress | 0                | 25        |
/// | In Progress | non-zero         | unchanged |
/// | Todo        | any              | unchanged |
pub fn progress_for_move(target: TaskStatus, current: u8) -> Option<u8> {
    match target {
        TaskStatus::Completed => Some(100),
        TaskStatus::InProgress if current == 0 => Some(25),
        TaskStatus::InProgress | TaskStatus::Todo => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn completed_forces_full_progress() {
        assert_eq!(progress_for_move(TaskStatus::Completed, 10), Some(100));
    }

    #[test]
    fn starting_work_bumps_zero_to_25() {
        assert_eq!(progress_for_move(TaskStatus::InProgress, 0), Some(25));
    }

    #[test]
    fn started_work_keeps_its_progress() {
        assert_eq!(progress_for_move(TaskStatus::InProgress, 60), None);
    }

    #[test]
    fn todo_never_touches_progress() {
        assert_eq!(progress_for_move(TaskStatus::Todo, 0), None);
        assert_eq!(progress_for_move(TaskStatus::Todo, 100), None);
    }

    proptest! {
        #[test]
        fn completed_is_always_100(current in 0u8..=100) {
            prop_assert_eq!(progress_for_move(TaskStatus::Completed, current), Some(100));
        }

        #[test]
        fn in_progress_only_fires_from_zero(current in 1u8..=100) {
            prop_assert_eq!(progress_for_move(TaskStatus::InProgress, current), None);
        }
    }
}
