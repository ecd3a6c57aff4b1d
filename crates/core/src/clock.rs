// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time source and cancellable sleeping for polling loops.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::error::{Error, Result};

/// A source of wall-clock time that can also block between polls.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Blocks for `duration`.
    ///
    /// Returns [`Error::Cancelled`] if the wait was interrupted.
    fn sleep(&self, duration: Duration) -> Result<()>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) -> Result<()> {
        (**self).sleep(duration)
    }
}

/// A shareable cancellation flag that wakes sleeping pollers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled and wakes every waiter.
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        let mut cancelled = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits up to `timeout`. Returns true if the token was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// System clock implementation sleeping on a [`CancelToken`].
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    cancel: CancelToken,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose sleeps are interrupted by `cancel`.
    pub fn with_cancel(cancel: CancelToken) -> Self {
        SystemClock { cancel }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> Result<()> {
        if self.cancel.wait_timeout(duration) {
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
