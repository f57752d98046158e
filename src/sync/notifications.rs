use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::model::Notification;
use crate::storage::local_store::{LocalStore, StoreError, keys};
use crate::sync::api::DashboardApi;
use crate::sync::scope::RequestScope;

/// Notification list mirrored into the local store so it is available before
/// the first poll completes.
pub struct NotificationFeed {
    store: Arc<LocalStore>,
    notifications: Vec<Notification>,
}

impl NotificationFeed {
    pub fn load_cached(store: Arc<LocalStore>) -> Self {
        let notifications = match store.get::<Vec<Notification>>(keys::NOTIFICATIONS) {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached notifications: {}", e);
                Vec::new()
            }
        };
        Self {
            store,
            notifications,
        }
    }

    pub fn replace(&mut self, notifications: Vec<Notification>) -> Result<(), StoreError> {
        self.store.set(keys::NOTIFICATIONS, &notifications)?;
        self.notifications = notifications;
        Ok(())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}

/// Refetches notifications every `interval` until `scope` is cancelled.
/// A failed poll keeps the previous list. A zero interval is raised to one
/// millisecond. Returns the number of successful polls.
pub async fn poll_notifications<A>(
    api: &A,
    feed: &mut NotificationFeed,
    scope: &RequestScope,
    interval: Duration,
) -> usize
where
    A: DashboardApi + ?Sized,
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut polls = 0;

    loop {
        tokio::select! {
            biased;
            _ = scope.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match scope.run(api.list_notifications()).await {
            Err(_) => break,
            Ok(Ok(list)) => {
                if let Err(e) = feed.replace(list) {
                    tracing::warn!("Failed to cache notifications: {}", e);
                }
                polls += 1;
                tracing::debug!("Notifications polled: {} unread", feed.unread_count());
            }
            Ok(Err(e)) => {
                tracing::warn!("Notification poll failed: {}", e);
            }
        }
    }

    tracing::info!("Notification polling stopped after {} polls", polls);
    polls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::api::{ApiError, MockDashboardApi};

    fn notification(id: i64, read: bool) -> Notification {
        Notification {
            id: id.into(),
            title: format!("Notification {}", id),
            message: None,
            read,
            created_at: None,
        }
    }

    fn store() -> Arc<LocalStore> {
        Arc::new(LocalStore::in_memory().unwrap())
    }

    #[test]
    fn unread_count_ignores_read_items() {
        let mut feed = NotificationFeed::load_cached(store());
        feed.replace(vec![notification(1, false), notification(2, true), notification(3, false)])
            .unwrap();

        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn cached_list_is_loaded_on_start() {
        let backing = store();
        NotificationFeed::load_cached(Arc::clone(&backing))
            .replace(vec![notification(1, false)])
            .unwrap();

        let feed = NotificationFeed::load_cached(backing);

        assert_eq!(feed.notifications().len(), 1);
    }

    #[tokio::test]
    async fn polls_until_cancelled() {
        let mut api = MockDashboardApi::new();
        api.expect_list_notifications()
            .returning(|| Ok(vec![notification(1, false)]));

        let mut feed = NotificationFeed::load_cached(store());
        let scope = RequestScope::new();
        let canceller = scope.clone();

        let (polls, _) = tokio::join!(
            poll_notifications(&api, &mut feed, &scope, Duration::from_millis(10)),
            async move {
                tokio::time::sleep(Duration::from_millis(45)).await;
                canceller.cancel();
            }
        );

        assert!(polls >= 2);
        assert_eq!(feed.unread_count(), 1);
    }

    #[tokio::test]
    async fn failed_poll_keeps_previous_list() {
        let mut api = MockDashboardApi::new();
        api.expect_list_notifications()
            .returning(|| Err(ApiError::RequestError("down".to_string())));

        let mut feed = NotificationFeed::load_cached(store());
        feed.replace(vec![notification(1, false)]).unwrap();
        let scope = RequestScope::new();
        let canceller = scope.clone();

        let (polls, _) = tokio::join!(
            poll_notifications(&api, &mut feed, &scope, Duration::from_millis(10)),
            async move {
                tokio::time::sleep(Duration::from_millis(25)).await;
                canceller.cancel();
            }
        );

        assert_eq!(polls, 0);
        assert_eq!(feed.notifications().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_scope_never_polls() {
        let mut api = MockDashboardApi::new();
        api.expect_list_notifications().never();

        let mut feed = NotificationFeed::load_cached(store());
        let scope = RequestScope::new();
        scope.cancel();

        let polls = poll_notifications(&api, &mut feed, &scope, Duration::from_millis(10)).await;

        assert_eq!(polls, 0);
    }

    #[tokio::test]
    async fn zero_interval_polls_instead_of_panicking() {
        let mut api = MockDashboardApi::new();
        api.expect_list_notifications()
            .returning(|| Ok(vec![notification(1, true)]));

        let mut feed = NotificationFeed::load_cached(store());
        let scope = RequestScope::new();
        let canceller = scope.clone();

        let (polls, _) = tokio::join!(
            poll_notifications(&api, &mut feed, &scope, Duration::ZERO),
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                canceller.cancel();
            }
        );

        assert!(polls >= 1);
        assert_eq!(feed.notifications().len(), 1);
    }
}
