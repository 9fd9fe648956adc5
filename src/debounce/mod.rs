//! Trailing-edge debouncing for bursty edits.
//!
//! Each call to [`Debouncer::debounce`] supersedes the previous one. Only the
//! latest action of a burst runs, once, after the delay has elapsed with no
//! newer call. An action that has already started is never interrupted.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

#[derive(Default)]
struct Slot {
    /// Bumped on every call; a task only fires if it still holds the latest value.
    generation: u64,
    pending: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub struct Debouncer {
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` to run once the delay passes without another call.
    ///
    /// Must be called from within a tokio runtime. The delay is measured from
    /// this call, not from when the spawned task is first polled.
    pub fn debounce<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let sleep = tokio::time::sleep(self.delay);
        let slot = Arc::clone(&self.slot);

        let mut guard = lock(&self.slot);
        if let Some(previous) = guard.pending.take() {
            previous.cancel();
        }
        guard.generation = guard.generation.wrapping_add(1);
        let generation = guard.generation;

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token_clone.cancelled() => return,
                _ = sleep => {}
            }

            {
                let mut guard = lock(&slot);
                if guard.generation != generation || token_clone.is_cancelled() {
                    return;
                }
                guard.pending = None;
            }

            action().await;
        });

        guard.pending = Some(cancel_token);
        guard.handle = Some(handle);
    }

    /// Cancel the scheduled action if it has not started yet.
    /// Returns whether something was cancelled.
    pub fn cancel(&self) -> bool {
        let mut guard = lock(&self.slot);
        guard.generation = guard.generation.wrapping_add(1);
        match guard.pending.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).pending.is_some()
    }

    /// Take the handle of the most recently scheduled task so the caller can
    /// wait for it outside of any lock.
    pub fn take_handle(&self) -> Option<JoinHandle<()>> {
        lock(&self.slot).handle.take()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
