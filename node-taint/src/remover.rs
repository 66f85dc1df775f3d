use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument as _;

use super::*;

/// Progress of a taint removal.
///
/// `Pending -> Retrying` on the first attempt, `Retrying -> Retrying` after a failed
/// attempt with attempts left, then `Succeeded` or `Exhausted`, both terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RemovalState {
    #[default]
    Pending,
    Retrying {
        attempt: u32,
    },
    Succeeded {
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
    },
}

impl RemovalState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Exhausted { .. })
    }
}

/// Removes `<driver>/agent-not-ready` from a node once the driver's CSINode
/// allocatable count is registered, retrying under a [`BackoffPolicy`].
///
/// Failures are logged and never returned: the only outcome is the final
/// [`RemovalState`].
#[derive(Debug)]
pub struct TaintRemover<C> {
    client: C,
    node: String,
    driver: String,
    policy: BackoffPolicy,
    span: tracing::Span,
}

impl<C> TaintRemover<C>
where
    C: NodeClient,
{
    pub fn new(
        client: C,
        node: impl ToString,
        driver: impl ToString,
        policy: BackoffPolicy,
    ) -> Self {
        let node = node.to_string();
        let driver = driver.to_string();
        let span = tracing::info_span!("taint_removal", %node, %driver);
        Self {
            client,
            node,
            driver,
            policy,
            span,
        }
    }

    pub fn taint_key(&self) -> String {
        agent_not_ready_taint_key(&self.driver)
    }

    /// Runs the removal to a terminal state on the current task.
    ///
    /// Dropping the future stops the removal at its next await point.
    pub async fn run(&self) -> RemovalState {
        let (state, _) = watch::channel(RemovalState::Pending);
        self.drive(&state).instrument(self.span.clone()).await
    }

    /// Runs the removal in a background task.
    ///
    /// The returned handle may be dropped without stopping the removal.
    /// Must be called within a Tokio runtime.
    pub fn spawn(self) -> RemovalHandle
    where
        C: 'static,
    {
        let (tx, state) = watch::channel(RemovalState::Pending);
        let span = self.span.clone();
        let task = tokio::spawn(async move { self.drive(&tx).await }.instrument(span));
        RemovalHandle { state, task }
    }

    #[allow(tail_expr_drop_order)]
    async fn drive(&self, state: &watch::Sender<RemovalState>) -> RemovalState {
        let key = self.taint_key();
        let attempts = self.policy.attempts();

        for attempt in 1..=attempts {
            if let Some(delay) = self.policy.delay(attempt) {
                tokio::time::sleep(delay).await;
            }
            state.send_replace(RemovalState::Retrying { attempt });
            tracing::debug!(attempt, %key, "Attempting to remove node taint(s)");

            match self.attempt(&key).await {
                Ok(removal) => {
                    tracing::debug!(attempt, ?removal, "Node taint removal complete");
                    let done = RemovalState::Succeeded { attempts: attempt };
                    state.send_replace(done);
                    return done;
                }
                Err(err) if err.is_retryable() => {
                    tracing::warn!(attempt, %err, "Failed to remove node taint(s), will retry");
                }
                Err(err) => {
                    tracing::error!(
                        attempt,
                        ?err,
                        "Unexpected failure when attempting to remove node taint(s)"
                    );
                }
            }
        }

        tracing::error!(
            attempts,
            %key,
            "Retries exhausted, giving up attempting to remove node taint(s)"
        );
        let done = RemovalState::Exhausted { attempts };
        state.send_replace(done);
        done
    }

    async fn attempt(&self, key: &str) -> Result<Removal> {
        check_allocatable(&self.client, &self.node, &self.driver).await?;
        remove_taint(&self.client, &self.node, key).await
    }
}

/// Handle to a removal started with [`TaintRemover::spawn`].
#[derive(Debug)]
pub struct RemovalHandle {
    state: watch::Receiver<RemovalState>,
    task: JoinHandle<RemovalState>,
}

impl RemovalHandle {
    /// Latest state published by the removal.
    pub fn state(&self) -> RemovalState {
        *self.state.borrow()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<RemovalState> {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the removal. No further attempt is started.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the removal to finish.
    ///
    /// Returns the last published state when the task was aborted, which is then
    /// not terminal.
    #[allow(tail_expr_drop_order)]
    pub async fn wait(self) -> RemovalState {
        let Self { state, task } = self;
        match task.await {
            Ok(done) => done,
            Err(err) => {
                tracing::warn!(%err, "Taint removal task did not complete");
                let last = *state.borrow();
                last
            }
        }
    }
}
