use std::future::Future;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Process-wide shutdown coordination.
///
/// Cancels its token on SIGTERM or SIGINT (Ctrl-C elsewhere). Long-running
/// tasks are spawned through [`Shutdown::spawn`] so [`Shutdown::drain`] can
/// wait for them once the server has stopped.
#[derive(Debug, Clone)]
pub struct Shutdown {
    token: CancellationToken,
    tasks: TaskTracker,
}

impl Shutdown {
    pub fn install() -> Result<Self, std::io::Error> {
        let token = CancellationToken::new();
        let tasks = TaskTracker::new();

        #[cfg(unix)]
        let mut signals = {
            use tokio::signal::unix::{signal, SignalKind};
            (signal(SignalKind::terminate())?, signal(SignalKind::interrupt())?)
        };

        let trigger = token.clone();
        tasks.spawn(async move {
            #[cfg(unix)]
            let received = tokio::select! {
                _ = signals.0.recv() => "SIGTERM",
                _ = signals.1.recv() => "SIGINT",
                _ = trigger.cancelled() => return,
            };

            #[cfg(not(unix))]
            let received = tokio::select! {
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => "ctrl-c",
                    Err(e) => {
                        tracing::error!(error = %e, "Unable to listen for shutdown signal");
                        return;
                    }
                },
                _ = trigger.cancelled() => return,
            };

            tracing::info!(signal = received, "Shutdown signal received");
            trigger.cancel();
        });

        Ok(Self { token, tasks })
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Resolves once shutdown has been requested.
    pub async fn requested(&self) {
        self.token.cancelled().await
    }

    /// Spawns a task that is awaited by [`drain`](Self::drain).
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Cancels the token if it was not already and waits for tracked tasks.
    pub async fn drain(self) {
        self.token.cancel();
        self.tasks.close();
        self.tasks.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_drain_waits_for_tracked_tasks() {
        let shutdown = Shutdown::install().unwrap();
        let finished = Arc::new(AtomicBool::new(false));

        let token = shutdown.token();
        let flag = Arc::clone(&finished);
        shutdown.spawn(async move {
            token.cancelled().await;
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            flag.store(true, Ordering::SeqCst);
        });

        shutdown.drain().await;
        assert!(finished.load(Ordering::SeqCst));
    }
}
