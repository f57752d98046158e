use std::future::Future;

use thiserror::Error;
use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("request cancelled")]
pub struct Cancelled;

/// Lifetime of a view. Requests started through a scope resolve to
/// [`Cancelled`] once the scope is cancelled, so a late response can never
/// reach state that belongs to a view that is gone.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    token: CancellationToken,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child scopes are cancelled with their parent but can also be
    /// cancelled on their own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Cancels the scope when the returned guard is dropped.
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    pub async fn run<F, T>(&self, fut: F) -> Result<T, Cancelled>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn run_returns_output_when_not_cancelled() {
        let scope = RequestScope::new();
        let result = scope.run(async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn cancelled_scope_short_circuits() {
        let scope = RequestScope::new();
        scope.cancel();

        let result = scope.run(async { 42 }).await;

        assert_eq!(result, Err(Cancelled));
    }

    #[tokio::test]
    async fn cancel_during_flight_discards_late_response() {
        let scope = RequestScope::new();
        let canceller = scope.clone();

        let (result, _) = tokio::join!(
            scope.run(async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                "stale"
            }),
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                canceller.cancel();
            }
        );

        assert_eq!(result, Err(Cancelled));
    }

    #[test]
    fn cancelled_future_wakes_on_cancel() {
        let scope = RequestScope::new();
        let mut waiting = tokio_test::task::spawn(scope.cancelled());

        tokio_test::assert_pending!(waiting.poll());

        scope.cancel();

        assert!(waiting.is_woken());
        tokio_test::assert_ready!(waiting.poll());
    }

    #[test]
    fn parent_cancels_children() {
        let parent = RequestScope::new();
        let child = parent.child();

        parent.cancel();

        assert!(child.is_cancelled());
    }

    #[test]
    fn child_cancel_leaves_parent_alive() {
        let parent = RequestScope::new();
        let child = parent.child();

        child.cancel();

        assert!(!parent.is_cancelled());
    }

    #[test]
    fn dropping_guard_cancels_scope() {
        let scope = RequestScope::new();
        {
            let _guard = scope.drop_guard();
        }
        assert!(scope.is_cancelled());
    }
}
