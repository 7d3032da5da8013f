//! A single stress client.

use crate::config::DEFAULT_CLOSE_TIMEOUT;
use crate::report::{WorkerError, WorkerErrorKind, WorkerResult};
use crate::session::{close_within, SessionFactory};
use docstore_client::Statement;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs one statement a fixed number of times over its own session.
pub struct Worker {
    index: usize,
    factory: SessionFactory,
    statement: Statement,
    repeat_count: usize,
    pacing: Duration,
    close_timeout: Duration,
    cancel: CancellationToken,
}

impl Worker {
    pub fn new(
        index: usize,
        factory: SessionFactory,
        statement: Statement,
        repeat_count: usize,
        pacing: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            index,
            factory,
            statement,
            repeat_count,
            pacing,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            cancel,
        }
    }

    /// Bound the final `close` of the worker's session.
    pub fn with_close_timeout(mut self, close_timeout: Duration) -> Self {
        self.close_timeout = close_timeout;
        self
    }

    /// Open a session, run every iteration, close the session.
    ///
    /// A failed or panicking statement does not stop the loop; every failure
    /// is recorded. Cancellation stops the loop at the next sleep or
    /// statement. The session is closed exactly once whenever it was opened,
    /// and the close is bounded by the close timeout.
    pub async fn run(self) -> WorkerResult {
        let start = Instant::now();
        let mut result = WorkerResult::new(self.index);

        let opened = tokio::select! {
            _ = self.cancel.cancelled() => None,
            opened = self.factory.open() => Some(opened),
        };
        let mut session = match opened {
            Some(Ok(session)) => session,
            Some(Err(e)) => {
                warn!("Worker {} could not open a session: {}", self.index, e);
                result.errors.push(WorkerError::from_store(
                    self.index,
                    None,
                    WorkerErrorKind::Open,
                    &e,
                ));
                result.duration_ms = start.elapsed().as_millis() as u64;
                return result;
            }
            None => {
                result.errors.push(self.cancelled(None));
                result.duration_ms = start.elapsed().as_millis() as u64;
                return result;
            }
        };

        for iteration in 1..=self.repeat_count {
            let paced = tokio::select! {
                _ = self.cancel.cancelled() => false,
                _ = tokio::time::sleep(self.pacing) => true,
            };
            if !paced {
                result.errors.push(self.cancelled(Some(iteration)));
                break;
            }

            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => None,
                outcome = AssertUnwindSafe(session.execute(&self.statement)).catch_unwind() => {
                    Some(outcome)
                }
            };
            match outcome {
                Some(Ok(Ok(()))) => {
                    result.statements_executed += 1;
                }
                Some(Ok(Err(e))) => {
                    debug!(
                        "Worker {} iteration {} failed: {}",
                        self.index, iteration, e
                    );
                    result.errors.push(WorkerError::from_store(
                        self.index,
                        Some(iteration),
                        WorkerErrorKind::Execute,
                        &e,
                    ));
                }
                Some(Err(panic)) => {
                    let message = panic_message(panic.as_ref());
                    warn!(
                        "Worker {} iteration {} panicked: {}",
                        self.index, iteration, message
                    );
                    result.errors.push(WorkerError::new(
                        self.index,
                        Some(iteration),
                        WorkerErrorKind::Panicked,
                        message,
                    ));
                }
                None => {
                    result.errors.push(self.cancelled(Some(iteration)));
                    break;
                }
            }
        }

        if let Err(e) = close_within(session.as_mut(), self.close_timeout).await {
            warn!("Worker {} failed to close its session: {}", self.index, e);
            result.errors.push(WorkerError::from_store(
                self.index,
                None,
                WorkerErrorKind::Close,
                &e,
            ));
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Worker {} finished: {} executed, {} errors",
            self.index,
            result.statements_executed,
            result.errors.len()
        );
        result
    }

    fn cancelled(&self, iteration: Option<usize>) -> WorkerError {
        WorkerError::new(
            self.index,
            iteration,
            WorkerErrorKind::Cancelled,
            "run deadline elapsed",
        )
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "statement panicked".to_string()
    }
}
