use std::collections::HashMap;

use thiserror::Error;

use crate::kanban::progress::progress_for_move;
use crate::model::{RecordId, Task, TaskStatus, TaskUpdate};
use crate::sync::api::{ApiError, DashboardApi};
use crate::sync::refresh_bus::{RefreshBus, Signal, TaskChange};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Task not found: {0}")]
    TaskNotFound(RecordId),
    #[error("Task {task_id} is not in column {expected}")]
    WrongColumn { task_id: RecordId, expected: TaskStatus },
    #[error("Failed to save task move: {0}")]
    Persist(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub task_id: RecordId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub destination_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Dropped back where it was picked up.
    Ignored,
    /// Reordered within its column; nothing is persisted.
    Reordered,
    /// Status changed and saved. `progress` is set when a progress rule fired.
    Moved { progress: Option<u8> },
}

/// Groups tasks by status, keeping their relative order. Every task lands in
/// exactly one bucket.
pub fn tasks_by_status(tasks: &[Task]) -> HashMap<TaskStatus, Vec<&Task>> {
    let mut buckets: HashMap<TaskStatus, Vec<&Task>> = TaskStatus::ALL
        .into_iter()
        .map(|status| (status, Vec::new()))
        .collect();

    for task in tasks {
        buckets.entry(task.status).or_default().push(task);
    }
    buckets
}

/// Column state of the task board. Holds an optimistic copy of the tasks;
/// the server copy is authoritative and arrives through [`KanbanBoard::reload`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KanbanBoard {
    columns: [Vec<Task>; 3],
}

impl KanbanBoard {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = Self::default();
        board.reload(tasks);
        board
    }

    pub async fn load<A>(api: &A) -> Result<Self, ApiError>
    where
        A: DashboardApi + ?Sized,
    {
        Ok(Self::from_tasks(api.list_tasks().await?))
    }

    pub fn reload(&mut self, tasks: Vec<Task>) {
        self.columns = Default::default();
        for task in tasks {
            self.columns[task.status.index()].push(task);
        }
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        &self.columns[status.index()]
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, task_id: &RecordId) -> Option<&Task> {
        self.tasks().find(|t| &t.id == task_id)
    }

    /// Applies a drag-and-drop move.
    ///
    /// A status change is applied locally first, then saved with
    /// `{status, progress?}`. On success a `TaskUpdated` signal is published;
    /// on failure the board is restored to its state before the move and the
    /// error is returned.
    pub async fn move_task<A>(
        &mut self,
        api: &A,
        bus: &RefreshBus,
        request: MoveRequest,
    ) -> Result<MoveOutcome, BoardError>
    where
        A: DashboardApi + ?Sized,
    {
        let source = request.from.index();
        let position = self.position(&request.task_id, request.from)?;

        if request.from == request.to {
            if position == request.destination_index {
                return Ok(MoveOutcome::Ignored);
            }
            let task = self.columns[source].remove(position);
            let index = request.destination_index.min(self.columns[source].len());
            self.columns[source].insert(index, task);
            return Ok(MoveOutcome::Reordered);
        }

        let snapshot = self.columns.clone();

        let mut task = self.columns[source].remove(position);
        let progress = progress_for_move(request.to, task.progress);
        task.status = request.to;
        if let Some(progress) = progress {
            task.progress = progress;
        }
        let change = TaskChange {
            task_id: task.id.clone(),
            status: task.status,
            progress: task.progress,
        };

        let target = &mut self.columns[request.to.index()];
        let index = request.destination_index.min(target.len());
        target.insert(index, task);

        let update = TaskUpdate {
            status: Some(request.to),
            progress,
        };

        match api.update_task(&request.task_id, &update).await {
            Ok(()) => {
                tracing::info!(
                    "Moved task {} from {} to {}",
                    request.task_id,
                    request.from,
                    request.to
                );
                bus.publish(Signal::TaskUpdated(Some(change)));
                Ok(MoveOutcome::Moved { progress })
            }
            Err(e) => {
                tracing::error!("Failed to move task {}: {}", request.task_id, e);
                self.columns = snapshot;
                Err(BoardError::Persist(e))
            }
        }
    }

    fn position(&self, task_id: &RecordId, status: TaskStatus) -> Result<usize, BoardError> {
        if let Some(position) = self.column(status).iter().position(|t| &t.id == task_id) {
            return Ok(position);
        }

        if self.find(task_id).is_some() {
            Err(BoardError::WrongColumn {
                task_id: task_id.clone(),
                expected: status,
            })
        } else {
            Err(BoardError::TaskNotFound(task_id.clone()))
        }
    }
}
