use std::cmp::Ordering;

use crate::model::{Priority, RecordId, Task, TaskStatus};

/// Criteria for the task list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub project_id: Option<RecordId>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status
            && task.status != status
        {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }
        if let Some(assignee) = &self.assignee
            && task.assignee.as_deref() != Some(assignee.as_str())
        {
            return false;
        }
        if let Some(project_id) = &self.project_id
            && task.project_id.as_ref() != Some(project_id)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                task.title.to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Earliest first, undated last.
    #[default]
    DueDate,
    /// High first.
    Priority,
    Title,
    /// Most advanced first.
    Progress,
}

impl TaskSort {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "due" | "due_date" | "duedate" => Some(TaskSort::DueDate),
            "priority" => Some(TaskSort::Priority),
            "title" => Some(TaskSort::Title),
            "progress" => Some(TaskSort::Progress),
            _ => None,
        }
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            TaskSort::DueDate => match (a.due_day(), b.due_day()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            TaskSort::Priority => b.priority.cmp(&a.priority),
            TaskSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            TaskSort::Progress => b.progress.cmp(&a.progress),
        }
    }
}

/// Stable sort, so ties keep their fetch order.
pub fn sort_tasks(tasks: &mut [&Task], sort: TaskSort) {
    tasks.sort_by(|a, b| sort.compare(a, b));
}
