//! Cooperative cancellation and per-search statistics.
//!
//! A route search is CPU-bound and runs to completion on the calling thread.
//! Interactive callers can still bound it: a [`SearchControl`] carries an
//! optional [`CancelToken`] and an optional deadline, and the routers poll it
//! every `check_interval` frontier pops.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::{SpatialError, SpatialResult};

/// Frontier pops between two cancellation checks.
pub const DEFAULT_CHECK_INTERVAL: u32 = 1_024;

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Shared flag a caller flips to abort in-flight searches.
///
/// Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── SearchControl ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SearchControl {
    cancel:         Option<CancelToken>,
    deadline:       Option<Instant>,
    check_interval: u32,
}

impl SearchControl {
    /// No cancellation and no deadline.
    pub fn unbounded() -> Self {
        Self { cancel: None, deadline: None, check_interval: DEFAULT_CHECK_INTERVAL }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Poll every `n` pops.  `0` is treated as `1`.
    pub fn with_check_interval(mut self, n: u32) -> Self {
        self.check_interval = n.max(1);
        self
    }

    pub fn check_interval(&self) -> u32 {
        self.check_interval
    }

    /// `true` when the router should call [`check`](Self::check) after
    /// `pops` frontier pops.
    #[inline]
    pub(crate) fn due(&self, pops: usize) -> bool {
        (self.cancel.is_some() || self.deadline.is_some())
            && pops % self.check_interval as usize == 0
    }

    /// Fails if the token was cancelled or the deadline has passed.
    pub fn check(&self) -> SpatialResult<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(SpatialError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SpatialError::DeadlineExceeded);
        }
        Ok(())
    }
}

impl Default for SearchControl {
    fn default() -> Self {
        Self::unbounded()
    }
}

// ── SearchStats ───────────────────────────────────────────────────────────────

/// Work counters for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Node expansions; a reopened node counts once per expansion.
    pub nodes_settled: usize,
    /// Edge relaxations that improved a tentative distance.
    pub edges_relaxed: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes settled, {} edges relaxed", self.nodes_settled, self.edges_relaxed)
    }
}
