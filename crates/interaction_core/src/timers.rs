//! Time-based call suppression: trailing-edge debounce and leading-edge throttle.
//!
//! Both wrappers are plain owned objects with `cancel()`; dropping a
//! [`Debouncer`] cancels its pending call, so no callback fires after disposal.
//! Timers run on the tokio clock, which keeps them controllable under
//! `tokio::time::pause`.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::Instant};

type Callback<T> = Box<dyn Fn(T) + Send + Sync>;

struct DebounceState {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

struct DebounceInner<T> {
    callback: Callback<T>,
    wait: Duration,
    state: Mutex<DebounceState>,
}

/// Runs the callback `wait` after the most recent call, with that call's arguments.
///
/// Every call cancels the previously scheduled invocation. A generation
/// counter backs up the task abort: a superseded timer that has already
/// woken still observes the newer generation and returns without firing.
pub struct Debouncer<T: Send + 'static> {
    inner: Arc<DebounceInner<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(DebounceInner {
                callback: Box::new(callback),
                wait,
                state: Mutex::new(DebounceState {
                    generation: 0,
                    pending: None,
                }),
            }),
        }
    }

    pub fn wait(&self) -> Duration {
        self.inner.wait
    }

    /// Must be called from within a tokio runtime.
    pub fn call(&self, args: T) {
        let mut state = self.inner.state.lock();
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        if let Some(previous) = state.pending.take() {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.wait).await;
            {
                let mut state = inner.state.lock();
                if state.generation != generation {
                    return;
                }
                state.pending = None;
            }
            (inner.callback)(args);
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// Drops the scheduled call, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.state.lock();
        state.generation = state.generation.wrapping_add(1);
        match state.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs the callback immediately on the first call of an idle window, then
/// drops every call until `limit` has elapsed. Dropped calls neither queue
/// nor extend the cooldown.
pub struct Throttler<T> {
    callback: Callback<T>,
    limit: Duration,
    cooldown_until: Mutex<Option<Instant>>,
}

impl<T> Throttler<T> {
    pub fn new<F>(limit: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
            limit,
            cooldown_until: Mutex::new(None),
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Returns `true` when the callback ran, `false` when the call was dropped.
    pub fn call(&self, args: T) -> bool {
        let now = Instant::now();
        {
            let mut cooldown = self.cooldown_until.lock();
            if cooldown.is_some_and(|deadline| now < deadline) {
                return false;
            }
            *cooldown = Some(now + self.limit);
        }
        (self.callback)(args);
        true
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_until
            .lock()
            .is_some_and(|deadline| Instant::now() < deadline)
    }

    /// Ends the current cooldown so the next call fires immediately.
    pub fn cancel(&self) {
        *self.cooldown_until.lock() = None;
    }
}

#[cfg(test)]
#[path = "tests/timers_tests.rs"]
mod tests;
