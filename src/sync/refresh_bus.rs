use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{RecordId, TaskStatus};
use crate::sync::listeners::{Listeners, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    TaskUpdated,
    ProjectUpdated,
    FileUploaded,
    ProjectsNeedRefresh,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::TaskUpdated,
        Topic::ProjectUpdated,
        Topic::FileUploaded,
        Topic::ProjectsNeedRefresh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Topic::TaskUpdated => "taskUpdated",
            Topic::ProjectUpdated => "projectUpdated",
            Topic::FileUploaded => "fileUploaded",
            Topic::ProjectsNeedRefresh => "projectsNeedRefresh",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskChange {
    pub task_id: RecordId,
    pub status: TaskStatus,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    TaskUpdated(Option<TaskChange>),
    ProjectUpdated(Option<RecordId>),
    FileUploaded(Option<String>),
    ProjectsNeedRefresh,
}

impl Signal {
    pub fn topic(&self) -> Topic {
        match self {
            Signal::TaskUpdated(_) => Topic::TaskUpdated,
            Signal::ProjectUpdated(_) => Topic::ProjectUpdated,
            Signal::FileUploaded(_) => Topic::FileUploaded,
            Signal::ProjectsNeedRefresh => Topic::ProjectsNeedRefresh,
        }
    }
}

/// In-process publish/subscribe used to tell mounted views to refetch.
///
/// Publishing is fire-and-forget: subscribers registered at publish time are
/// called synchronously, in registration order; nothing is replayed to later
/// subscribers. A view subscribes on mount and keeps the returned
/// [`Subscription`] for as long as it is mounted.
#[derive(Clone)]
pub struct RefreshBus {
    topics: Arc<HashMap<Topic, Listeners<Signal>>>,
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshBus {
    pub fn new() -> Self {
        let topics = Topic::ALL
            .into_iter()
            .map(|topic| (topic, Listeners::new()))
            .collect();
        Self {
            topics: Arc::new(topics),
        }
    }

    pub fn subscribe<F>(&self, topic: Topic, callback: F) -> Subscription
    where
        F: Fn(&Signal) + Send + Sync + 'static,
    {
        tracing::debug!("Subscribing to {}", topic.name());
        self.listeners(topic).add(callback)
    }

    pub fn publish(&self, signal: Signal) -> usize {
        let topic = signal.topic();
        let delivered = self.listeners(topic).notify(&signal);
        tracing::debug!("Published {} to {} subscriber(s)", topic.name(), delivered);
        delivered
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.listeners(topic).len()
    }

    fn listeners(&self, topic: Topic) -> &Listeners<Signal> {
        // Every topic is inserted in `new`.
        &self.topics[&topic]
    }
}

impl std::fmt::Debug for RefreshBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for topic in Topic::ALL {
            map.entry(&topic.name(), &self.subscriber_count(topic));
        }
        map.finish()
    }
}
