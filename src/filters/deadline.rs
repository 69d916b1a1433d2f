//! Bounded-time execution of filter work on a detached worker thread

use crate::io::error::{PoisonError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Cooperative cancellation flag shared with a worker
///
/// Long-running kernels poll [`CancelToken::is_cancelled`] between rows and
/// bail out once the caller has given up on them.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to stop
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Run `job` on a worker thread and wait at most `deadline` for its result
///
/// The job owns everything it touches, so an abandoned worker can finish in
/// the background without racing the caller. On expiry the token is
/// cancelled and the worker is detached.
///
/// # Errors
///
/// - [`PoisonError::RenderTimeout`] when the deadline passes first, or the
///   job observed cancellation and returned `None`
/// - [`PoisonError::FilterFailed`] when the worker cannot be spawned or
///   dies without sending a result
pub fn run_with_deadline<T, F>(label: &'static str, deadline: Duration, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelToken) -> Option<T> + Send + 'static,
{
    let token = CancelToken::new();
    let worker_token = token.clone();
    let (sender, receiver) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name(format!("filter-{label}"))
        .spawn(move || {
            let outcome = job(&worker_token);
            // The receiver is gone once the caller has timed out
            sender.send(outcome).ok();
        })
        .map_err(|e| PoisonError::FilterFailed {
            filter: label,
            reason: e.to_string(),
        })?;

    match receiver.recv_timeout(deadline) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(PoisonError::RenderTimeout {
            filter: label,
            deadline,
        }),
        Err(RecvTimeoutError::Timeout) => {
            token.cancel();
            Err(PoisonError::RenderTimeout {
                filter: label,
                deadline,
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(PoisonError::FilterFailed {
            filter: label,
            reason: "worker exited without a result".to_string(),
        }),
    }
}
