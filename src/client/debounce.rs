use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Single-slot delayed task. Scheduling again cancels the pending run, so a
/// burst of calls results in one execution of the last task.
///
/// Once the delay has elapsed the task runs detached; a later `schedule`
/// does not interrupt it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Must be called from within a tokio runtime
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_last() {
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));
        let runs = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let runs = runs.clone();
            debouncer.schedule(async move {
                runs.lock().unwrap().push(i);
            });
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert!(runs.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(*runs.lock().unwrap(), vec![4]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_prevent_run() {
        let count = Arc::new(AtomicUsize::new(0));

        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        let c = count.clone();
        debouncer.schedule(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        let dropped = {
            let mut d = Debouncer::new(Duration::from_millis(50));
            let c = count.clone();
            d.schedule(async move {
                c.fetch_add(1, Ordering::SeqCst);
            });
            d
        };
        drop(dropped);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
