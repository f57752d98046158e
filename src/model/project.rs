use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::adapters::normalize_date;
use crate::model::{RecordId, Task, TaskStatus, lenient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    #[serde(default, alias = "title", deserialize_with = "lenient::null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::percent")]
    pub progress: u8,
}

impl Project {
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(normalize_date)
    }
}

/// Per-status task totals shown on a project card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn for_project(project_id: &RecordId, tasks: &[Task]) -> Self {
        tasks
            .iter()
            .filter(|t| t.project_id.as_ref() == Some(project_id))
            .fold(Self::default(), |mut counts, task| {
                match task.status {
                    TaskStatus::Todo => counts.todo += 1,
                    TaskStatus::InProgress => counts.in_progress += 1,
                    TaskStatus::Completed => counts.completed += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.completed
    }

    /// Share of completed tasks, rounded down to a whole percent.
    pub fn completion_percent(&self) -> u8 {
        match self.total() {
            0 => 0,
            total => ((self.completed * 100) / total) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, project: i64, status: TaskStatus) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {}", id),
            description: None,
            status,
            priority: Default::default(),
            progress: 0,
            assignee: None,
            due_date: None,
            project_id: Some(project.into()),
        }
    }

    #[test]
    fn project_accepts_title_alias() {
        let project: Project =
            serde_json::from_str(r#"{"id": 3, "title": "Website", "due_date": "2024-05-10"}"#).unwrap();

        assert_eq!(project.name, "Website");
        assert_eq!(project.due_day(), NaiveDate::from_ymd_opt(2024, 5, 10));
    }

    #[test]
    fn counts_only_tasks_of_the_project() {
        let tasks = vec![
            task(1, 1, TaskStatus::Todo),
            task(2, 1, TaskStatus::Completed),
            task(3, 1, TaskStatus::Completed),
            task(4, 2, TaskStatus::InProgress),
        ];

        let counts = TaskCounts::for_project(&RecordId::from(1), &tasks);

        assert_eq!(counts.todo, 1);
        assert_eq!(counts.in_progress, 0);
        assert_eq!(counts.completed, 2);
        assert_eq!(counts.completion_percent(), 66);
    }

    #[test]
    fn empty_project_is_zero_percent_complete() {
        let counts = TaskCounts::for_project(&RecordId::from(9), &[]);
        assert_eq!(counts.completion_percent(), 0);
    }
}
