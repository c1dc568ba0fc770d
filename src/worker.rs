//! One-shot background jobs with cooperative cancellation.
//!
//! Long-running work (extraction, large imports) runs off the UI thread and
//! reports back over a one-shot channel. Cancellation is cooperative: the
//! job receives a [`CancelFlag`] and is expected to poll it at convenient
//! checkpoints; there is no preemption.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Shared cancellation flag handed to a running job.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Handle to a spawned job: poll or wait for its result, or cancel it.
pub struct JobHandle<T> {
    rx: mpsc::Receiver<Result<T>>,
    flag: CancelFlag,
}

impl<T> JobHandle<T> {
    /// Non-blocking poll. `None` while the job is still running.
    ///
    /// A disconnected channel (the job panicked) surfaces as
    /// [`Error::Worker`].
    pub fn try_result(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Some(Err(Error::Worker("job exited without a result".to_string())))
            },
        }
    }

    /// Block until the job finishes.
    pub fn wait(self) -> Result<T> {
        self.rx
            .recv()
            .map_err(|_| Error::Worker("job exited without a result".to_string()))?
    }

    /// Ask the job to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.flag.cancel();
    }

    /// The flag shared with the job, for wiring into UI state.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.flag.clone()
    }
}

/// Run `job` on a new thread, returning a handle to its eventual result.
///
/// The job receives the handle's [`CancelFlag`] and should return early
/// (typically with [`Error::Worker`]) once it observes cancellation.
pub fn spawn<T, F>(job: F) -> JobHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelFlag) -> Result<T> + Send + 'static,
{
    let flag = CancelFlag::new();
    let job_flag = flag.clone();
    let (tx, rx) = mpsc::sync_channel(1);
    thread::spawn(move || {
        let result = job(&job_flag);
        if let Err(e) = &result {
            log::debug!("background job finished with error: {e}");
        }
        // The receiver may be gone if the caller dropped the handle.
        let _ = tx.send(result);
    });
    JobHandle { rx, flag }
}
