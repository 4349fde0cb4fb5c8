//! Floor background tasks
//!
//! The server runs two long-lived tasks next to the HTTP listener: the
//! lifecycle simulator ([`TaskKind::Periodic`]) and the floor event log
//! ([`TaskKind::Listener`]). Both select on one shared cancellation token.

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Reacts to floor events
    Listener,
    /// Wakes on a timer
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskKind::Listener => "listener",
            TaskKind::Periodic => "periodic",
        })
    }
}

struct FloorTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// Running floor tasks plus the token that stops them
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let token = tasks.shutdown_token();
/// tasks.spawn("lifecycle_simulator", TaskKind::Periodic, simulator.run(token));
/// tasks.shutdown().await;
/// ```
#[derive(Default)]
pub struct BackgroundTasks {
    tasks: Vec<FloorTask>,
    shutdown: CancellationToken,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Start `future` on the runtime
    ///
    /// A panic is logged and stops only this task. Returning before shutdown
    /// is logged as a warning.
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(()) if !shutdown.is_cancelled() => {
                    tracing::warn!(task = name, %kind, "Floor task returned before shutdown");
                }
                Ok(()) => {}
                Err(payload) => {
                    tracing::error!(
                        task = name,
                        %kind,
                        panic = panic_message(payload.as_ref()),
                        "Floor task panicked"
                    );
                }
            }
        });
        tracing::debug!(task = name, %kind, "Floor task started");
        self.tasks.push(FloorTask { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn count(&self, kind: TaskKind) -> usize {
        self.tasks.iter().filter(|t| t.kind == kind).count()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            total = self.tasks.len(),
            periodic = self.count(TaskKind::Periodic),
            listener = self.count(TaskKind::Listener),
            "Floor tasks running"
        );
    }

    /// Names of tasks that have already stopped
    pub fn check_health(&self) -> Vec<&'static str> {
        let stopped: Vec<_> = self
            .tasks
            .iter()
            .filter(|t| t.handle.is_finished())
            .map(|t| t.name)
            .collect();
        if !stopped.is_empty() {
            tracing::error!(?stopped, total = self.tasks.len(), "Floor tasks stopped early");
        }
        stopped
    }

    /// Cancel the token and wait for every task
    pub async fn shutdown(self) {
        tracing::info!(total = self.tasks.len(), "Stopping floor tasks");
        self.shutdown.cancel();
        for task in self.tasks {
            if let Err(e) = task.handle.await {
                tracing::error!(task = task.name, error = ?e, "Floor task did not stop cleanly");
            }
        }
        tracing::info!("Floor tasks stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_shutdown_cancels_tasks() {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        let stopped = Arc::new(AtomicBool::new(false));

        let flag = stopped.clone();
        tasks.spawn("waiter", TaskKind::Listener, async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.count(TaskKind::Listener), 1);
        assert_eq!(tasks.count(TaskKind::Periodic), 0);
        assert!(tasks.check_health().is_empty());

        tasks.shutdown().await;
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_task_is_contained() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("ticker", TaskKind::Periodic, async {
            panic!("tick failed");
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(tasks.check_health(), vec!["ticker"]);
        tasks.shutdown().await;
    }

    #[test]
    fn test_panic_message() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
