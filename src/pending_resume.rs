use std::sync::{Arc, Weak};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::{Error, ResumeAction, Result, internal::PausedDirectory};

/// Receiving end of a paused execution's single-slot handoff.
///
/// Returned by [`BreakpointManager::pause`](crate::BreakpointManager::pause).
/// Await [`wait`](Self::wait) to block until the controller decides how the
/// execution continues.
///
/// Dropping the handle without receiving a decision withdraws the execution
/// from the paused directory, so an abandoned waiter does not linger there.
pub struct PendingResume {
    execution_id: Arc<str>,
    token: Uuid,
    receiver: Option<oneshot::Receiver<ResumeAction>>,
    directory: Weak<PausedDirectory>,
}

impl PendingResume {
    pub(crate) fn new(
        execution_id: Arc<str>,
        token: Uuid,
        receiver: oneshot::Receiver<ResumeAction>,
        directory: Weak<PausedDirectory>,
    ) -> Self {
        Self {
            execution_id,
            token,
            receiver: Some(receiver),
            directory,
        }
    }

    #[inline]
    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// Waits for the decision.
    ///
    /// There is no timeout. Fails with [`Error::HandoffClosed`] only if the
    /// handoff was dropped without a decision, e.g. when the manager itself
    /// was dropped while the execution was paused.
    pub async fn wait(mut self) -> Result<ResumeAction> {
        let Some(receiver) = self.receiver.take() else {
            return Err(Error::HandoffClosed(self.execution_id.clone()));
        };
        receiver
            .await
            .map_err(|_| Error::HandoffClosed(self.execution_id.clone()))
    }
}

impl Drop for PendingResume {
    fn drop(&mut self) {
        let Some(directory) = self.directory.upgrade() else {
            return;
        };
        if directory.remove_if_token(&self.execution_id, self.token) {
            tracing::debug!(
                execution_id = %self.execution_id,
                "Paused execution abandoned before a decision arrived"
            );
        }
    }
}

impl std::fmt::Debug for PendingResume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingResume")
            .field("execution_id", &self.execution_id)
            .field("awaited", &self.receiver.is_none())
            .finish_non_exhaustive()
    }
}
