use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Notify;

use crate::access::PermissionTable;
use crate::app::{AppState, SyncStatus};
use crate::calendar::refresh_calendar;
use crate::kanban::{BoardError, KanbanBoard, MoveOutcome, MoveRequest};
use crate::model::{CustomEventRecord, NewCustomEvent, RecordId, TaskStatus};
use crate::storage::config::{Config, ConfigError};
use crate::sync::api::{ApiError, RestClient};
use crate::sync::notifications::{NotificationFeed, poll_notifications};
use crate::sync::refresh_bus::{RefreshBus, Signal, Topic};
use crate::sync::scope::{Cancelled, RequestScope};
use crate::sync::session::{AuthError, Session};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Board error: {0}")]
    BoardError(#[from] BoardError),
    #[error("Request cancelled")]
    Cancelled(#[from] Cancelled),
}

/// Wires the configured REST client, the current session token and the
/// shared refresh bus together for the dashboard pages.
pub struct SyncEngine {
    config: Config,
    client: RestClient,
    bus: RefreshBus,
}

impl SyncEngine {
    /// An expired token is an error; a missing one yields an anonymous
    /// client, which the backend answers with 401 on protected routes.
    pub fn new(config: Config, session: &Session) -> Result<Self, SyncError> {
        let mut client = RestClient::from_config(&config.api)?;

        match session.valid_token() {
            Ok(token) => client = client.with_token(token.access_token),
            Err(AuthError::NotSignedIn) => {
                tracing::warn!("No session token, requests are sent anonymously");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: RestClient) -> Self {
        Self {
            config,
            client,
            bus: RefreshBus::new(),
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn bus(&self) -> &RefreshBus {
        &self.bus
    }

    pub async fn load_calendar(&self, scope: &RequestScope) -> Result<AppState, SyncError> {
        let mut state = AppState::from_config(&self.config)?;
        state.sync_status = SyncStatus::Syncing;
        refresh_calendar(&self.client, &mut state.calendar, scope).await?;
        state.sync_status = SyncStatus::Synced;
        Ok(state)
    }

    pub async fn load_board(&self) -> Result<KanbanBoard, SyncError> {
        Ok(KanbanBoard::load(&self.client).await?)
    }

    /// Refetches the calendar sources every time a task or project change is
    /// published on the bus, until `scope` is cancelled. Returns the number of
    /// completed refreshes.
    pub async fn watch_calendar(&self, state: &mut AppState, scope: &RequestScope) -> usize {
        let notify = Arc::new(Notify::new());
        let _subscriptions: Vec<_> = [Topic::TaskUpdated, Topic::ProjectUpdated, Topic::ProjectsNeedRefresh]
            .into_iter()
            .map(|topic| {
                let notify = Arc::clone(&notify);
                self.bus.subscribe(topic, move |_: &Signal| notify.notify_one())
            })
            .collect();

        let mut refreshes = 0;
        loop {
            tokio::select! {
                biased;
                _ = scope.cancelled() => break,
                _ = notify.notified() => {}
            }

            state.sync_status = SyncStatus::Syncing;
            if refresh_calendar(&self.client, &mut state.calendar, scope).await.is_err() {
                break;
            }
            state.sync_status = SyncStatus::Synced;
            refreshes += 1;
        }

        tracing::debug!("Calendar watch stopped after {} refresh(es)", refreshes);
        refreshes
    }

    /// Moves a task to the end of the `to` column. Dropping a task on its own
    /// column is ignored.
    pub async fn move_task(
        &self,
        board: &mut KanbanBoard,
        task_id: &RecordId,
        to: TaskStatus,
    ) -> Result<MoveOutcome, SyncError> {
        let from = board
            .find(task_id)
            .map(|task| task.status)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.clone()))?;
        if from == to {
            return Ok(MoveOutcome::Ignored);
        }
        let destination_index = board.column(to).len();

        let request = MoveRequest {
            task_id: task_id.clone(),
            from,
            to,
            destination_index,
        };
        Ok(board.move_task(&self.client, &self.bus, request).await?)
    }

    pub async fn create_custom_event(&self, event: &NewCustomEvent) -> Result<CustomEventRecord, SyncError> {
        let created = self.client.create_custom_event(event).await?;
        self.bus.publish(Signal::ProjectsNeedRefresh);
        Ok(created)
    }

    pub async fn delete_custom_event(&self, event_id: &RecordId) -> Result<(), SyncError> {
        self.client.delete_custom_event(event_id).await?;
        self.bus.publish(Signal::ProjectsNeedRefresh);
        Ok(())
    }

    /// Publishes the file-list change so mounted file views refetch.
    pub async fn delete_file(&self, file_id: &RecordId) -> Result<(), SyncError> {
        self.client.delete_file(file_id).await?;
        self.bus.publish(Signal::FileUploaded(Some(file_id.to_string())));
        Ok(())
    }

    pub async fn load_permissions(&self) -> Result<PermissionTable, SyncError> {
        Ok(PermissionTable::load(&self.client).await?)
    }

    pub async fn watch_notifications(&self, feed: &mut NotificationFeed, scope: &RequestScope) -> usize {
        let interval = Duration::from_secs(self.config.notifications.poll_interval_seconds.max(1));
        poll_notifications(&self.client, feed, scope, interval).await
    }
}
