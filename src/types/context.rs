//! Per-call context threaded through every backend call.

use std::time::{Duration, Instant};

/// Deadline for one builtin call.
///
/// The bridge bounds the whole call (including consumption of streamed
/// responses) by the deadline and passes it to the backend client, which
/// forwards the remaining time as the RPC timeout. Without a deadline calls
/// wait until the backend answers.
///
/// ```rust
/// use rego_spicedb::CallContext;
/// use std::time::Duration;
///
/// let ctx = CallContext::with_timeout(Duration::from_secs(1));
/// assert!(ctx.remaining().is_some());
/// assert!(CallContext::new().remaining().is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext {
    deadline: Option<Instant>,
}

impl CallContext {
    /// Creates a context without a deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context whose deadline is `timeout` from now.
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Creates a context with an absolute deadline.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// Returns the deadline, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left until the deadline, saturating at zero.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fills in a deadline from `timeout` when none is set.
    #[must_use]
    pub fn or_timeout(self, timeout: Option<Duration>) -> Self {
        match (self.deadline, timeout) {
            (None, Some(timeout)) => Self::with_timeout(timeout),
            _ => self,
        }
    }
}
