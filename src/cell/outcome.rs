use serde::{Deserialize, Serialize};

/// Result of [`AtomicCell::compare_and_swap`](super::AtomicCell::compare_and_swap).
///
/// Carries both the success flag and the value the cell held immediately
/// before the attempt, so callers can drive their own compare-and-retry loop
/// from `previous` without a separate read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CasOutcome<W> {
    /// Whether the cell held `expected` and was replaced.
    pub succeeded: bool,
    /// The value observed immediately before the attempt.
    pub previous: W,
}

impl<W: Copy> CasOutcome<W> {
    #[inline(always)]
    pub(crate) fn from_exchange(result: Result<W, W>) -> Self {
        match result {
            Ok(previous) => Self {
                succeeded: true,
                previous,
            },
            Err(previous) => Self {
                succeeded: false,
                previous,
            },
        }
    }

    /// Returns `true` if the swap took place.
    #[inline(always)]
    pub fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Converts into the `compare_exchange` shape: `Ok(previous)` on success,
    /// `Err(observed)` on failure.
    #[inline]
    pub fn into_result(self) -> Result<W, W> {
        if self.succeeded {
            Ok(self.previous)
        } else {
            Err(self.previous)
        }
    }
}

impl<W: Copy> From<CasOutcome<W>> for Result<W, W> {
    fn from(outcome: CasOutcome<W>) -> Self {
        outcome.into_result()
    }
}
