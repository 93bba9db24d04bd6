//! A backend request running in the background.

use std::future::Future;

use tokio::task::JoinHandle;

use crate::error::BackendError;

/// At most one outstanding request of a given kind.
///
/// `is_pending()` is true from `start` until the result has been taken.
#[derive(Debug)]
pub struct PendingRequest<T> {
    task: Option<JoinHandle<Result<T, BackendError>>>,
}

impl<T: Send + 'static> PendingRequest<T> {
    pub fn new() -> Self {
        Self { task: None }
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    /// Spawn `request`. Returns false (and drops `request` unpolled) if one is already outstanding.
    pub fn start<F>(&mut self, request: F) -> bool
    where
        F: Future<Output = Result<T, BackendError>> + Send + 'static,
    {
        if self.is_pending() {
            return false;
        }
        self.task = Some(tokio::spawn(request));
        true
    }

    /// Take the result if the request has completed, without waiting.
    pub async fn poll(&mut self) -> Option<Result<T, BackendError>> {
        let finished = self.task.as_ref().is_some_and(|task| task.is_finished());
        if !finished {
            return None;
        }
        self.settle().await
    }

    /// Wait for the outstanding request, if any, and take its result.
    pub async fn settle(&mut self) -> Option<Result<T, BackendError>> {
        let task = self.task.take()?;
        Some(match task.await {
            Ok(result) => result,
            Err(join_err) => Err(join_err.into()),
        })
    }
}

impl<T: Send + 'static> Default for PendingRequest<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_start_is_rejected_while_pending() {
        let mut pending: PendingRequest<u32> = PendingRequest::new();
        assert!(pending.start(async { Ok(1) }));
        assert!(!pending.start(async { Ok(2) }));

        let result = pending.settle().await.unwrap().unwrap();
        assert_eq!(result, 1);
        assert!(!pending.is_pending());
        assert!(pending.start(async { Ok(3) }));
    }

    #[tokio::test]
    async fn test_settle_with_nothing_outstanding() {
        let mut pending: PendingRequest<()> = PendingRequest::new();
        assert!(pending.settle().await.is_none());
        assert!(pending.poll().await.is_none());
    }

    #[tokio::test]
    async fn test_poll_waits_for_completion() {
        let gate = std::sync::Arc::new(tokio::sync::Notify::new());
        let release = gate.clone();

        let mut pending: PendingRequest<&'static str> = PendingRequest::new();
        pending.start(async move {
            gate.notified().await;
            Ok("done")
        });

        tokio::task::yield_now().await;
        assert!(pending.poll().await.is_none());
        assert!(pending.is_pending());

        release.notify_one();
        assert_eq!(pending.settle().await.unwrap().unwrap(), "done");
    }

    #[tokio::test]
    async fn test_panicking_request_becomes_task_error() {
        let mut pending: PendingRequest<()> = PendingRequest::new();
        pending.start(async {
            if true {
                panic!("boom");
            }
            Ok(())
        });
        let err = pending.settle().await.unwrap().unwrap_err();
        assert!(matches!(err, BackendError::Task(_)));
    }
}
