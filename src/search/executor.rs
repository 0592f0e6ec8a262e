//! Time-bounded execution of one search
//!
//! The search runs on a blocking worker while the caller waits with a
//! deadline. A missed deadline is fatal for the decision: there is no
//! fallback move, only a clear failure signal. The worker is told to
//! stop through the shared cancel token so it does not keep burning CPU
//! on an answer nobody wants.

use std::time::{Duration, Instant};

use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::battle::{Engine, Snapshot};
use crate::core::error::{AgentError, Result};
use crate::search::cancel::CancelToken;
use crate::search::driver::{ChosenAction, SearchDriver};

/// Runs search drivers off the caller's thread with a bounded wait
pub struct SearchExecutor {
    runtime: Runtime,
}

impl SearchExecutor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            runtime: Runtime::new()?,
        })
    }

    /// Run a full action decision under the driver's deadline
    pub fn run<E>(
        &self,
        driver: &SearchDriver<E>,
        snapshot: &Snapshot,
        max_depth: u32,
    ) -> Result<ChosenAction>
    where
        E: Engine + Clone + Send + Sync + 'static,
    {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let worker_driver = driver.clone();
        let worker_snapshot = snapshot.clone();

        let task = self.runtime.spawn_blocking(move || {
            let started = Instant::now();
            let action = worker_driver.choose_action(&worker_snapshot, max_depth, &worker_cancel)?;
            Ok(ChosenAction {
                action,
                elapsed: started.elapsed(),
            })
        });

        self.wait(driver, task, &cancel)
    }

    /// Run a replacement decision under the driver's deadline
    ///
    /// Returns Ok(None) when the bench is empty.
    pub fn run_replacement<E>(
        &self,
        driver: &SearchDriver<E>,
        snapshot: &Snapshot,
        max_depth: u32,
    ) -> Result<Option<ChosenAction>>
    where
        E: Engine + Clone + Send + Sync + 'static,
    {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let worker_driver = driver.clone();
        let worker_snapshot = snapshot.clone();

        let task = self.runtime.spawn_blocking(move || {
            let started = Instant::now();
            let action =
                worker_driver.choose_replacement(&worker_snapshot, max_depth, &worker_cancel)?;
            Ok(action.map(|action| ChosenAction {
                action,
                elapsed: started.elapsed(),
            }))
        });

        self.wait(driver, task, &cancel)
    }

    /// Block on the worker until it finishes or the deadline passes
    fn wait<E, T>(
        &self,
        driver: &SearchDriver<E>,
        task: JoinHandle<Result<T>>,
        cancel: &CancelToken,
    ) -> Result<T>
    where
        E: Engine,
    {
        let deadline = Duration::from_millis(driver.config().deadline_ms);

        match self
            .runtime
            .block_on(async { tokio::time::timeout(deadline, task).await })
        {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(AgentError::Engine(format!(
                "search worker died: {}",
                join_error
            ))),
            Err(_) => {
                cancel.cancel();
                tracing::warn!(?deadline, "search timed out, forfeiting the decision");
                Err(AgentError::Timeout(deadline))
            }
        }
    }
}
