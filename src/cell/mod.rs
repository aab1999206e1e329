//! Lock-free, linearizable integer cells.
//!
//! An [`AtomicCell`] owns exactly one word-sized signed integer and exposes six
//! primitives over it: [`read`](AtomicCell::read),
//! [`increment`](AtomicCell::increment), [`decrement`](AtomicCell::decrement),
//! [`add`](AtomicCell::add), [`sub`](AtomicCell::sub) and
//! [`compare_and_swap`](AtomicCell::compare_and_swap).
//!
//! Every primitive is one hardware atomic instruction with `SeqCst` ordering.
//! Nothing here blocks, spins or retries: a failed compare-and-swap is reported
//! to the caller, who owns the retry policy.
//!
//! Lifetimes are explicit. Share a cell by reference (scoped threads) or by
//! [`SharedCell`] (`Arc`); a dangling cell cannot be named.

use core::fmt;
use core::sync::atomic::Ordering;
use std::sync::Arc;

use crossbeam_utils::CachePadded;

/// Compare-and-swap results.
pub mod outcome;
/// Supported integer widths.
pub mod word;

pub use outcome::CasOutcome;
pub use word::Word;

/// All primitives are sequentially consistent.
const ORDER: Ordering = Ordering::SeqCst;

/// A reference-counted cell; it is dropped when the last holder lets go.
pub type SharedCell<W = isize> = Arc<AtomicCell<W>>;

/// A word-sized signed integer mutated only through indivisible primitives.
///
/// `W` defaults to `isize`, the platform's native word.
///
/// # Example
///
/// ```rust
/// use wordsync::AtomicCell;
///
/// let cell = AtomicCell::new(10);
/// std::thread::scope(|s| {
///     s.spawn(|| cell.add(5));
///     s.spawn(|| cell.sub(3));
/// });
/// assert_eq!(cell.read(), 12);
/// ```
#[repr(transparent)]
pub struct AtomicCell<W: Word = isize> {
    inner: W::Atomic,
}

impl<W: Word> AtomicCell<W> {
    /// Creates a cell holding `value`.
    #[inline(always)]
    pub fn new(value: W) -> Self {
        Self {
            inner: W::new_atomic(value),
        }
    }

    /// Creates a reference-counted cell holding `value`.
    #[inline]
    pub fn shared(value: W) -> SharedCell<W> {
        Arc::new(Self::new(value))
    }

    /// Creates a cell on its own cache line.
    ///
    /// Useful when several hot cells sit next to each other in one structure.
    #[inline]
    pub fn padded(value: W) -> CachePadded<Self> {
        CachePadded::new(Self::new(value))
    }

    /// Returns the current value.
    ///
    /// The value is one that the cell held at some instant during the call.
    #[inline(always)]
    pub fn read(&self) -> W {
        W::load(&self.inner, ORDER)
    }

    /// Adds one and returns the new value.
    #[inline(always)]
    pub fn increment(&self) -> W {
        self.add(W::one())
    }

    /// Subtracts one and returns the new value.
    #[inline(always)]
    pub fn decrement(&self) -> W {
        self.sub(W::one())
    }

    /// Adds `delta` and returns the new value, wrapping on overflow.
    #[inline(always)]
    pub fn add(&self, delta: W) -> W {
        W::fetch_add(&self.inner, delta, ORDER).wrapping_add(&delta)
    }

    /// Subtracts `delta` and returns the new value, wrapping on overflow.
    #[inline(always)]
    pub fn sub(&self, delta: W) -> W {
        W::fetch_sub(&self.inner, delta, ORDER).wrapping_sub(&delta)
    }

    /// Replaces the value with `new` if it currently equals `expected`.
    ///
    /// Uses the strong compare-exchange, so failure always means the cell held
    /// something other than `expected`; `previous` in the outcome is that value.
    #[inline(always)]
    pub fn compare_and_swap(&self, expected: W, new: W) -> CasOutcome<W> {
        CasOutcome::from_exchange(W::compare_exchange(&self.inner, expected, new, ORDER, ORDER))
    }

    /// Consumes the cell and returns its value.
    #[inline]
    pub fn into_inner(self) -> W {
        W::into_inner(self.inner)
    }

    /// Returns a mutable reference to the value.
    ///
    /// `&mut self` proves no other thread can observe the cell.
    #[cfg(not(feature = "loom"))]
    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        W::get_mut(&mut self.inner)
    }
}

impl<W: Word> Default for AtomicCell<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

impl<W: Word> From<W> for AtomicCell<W> {
    fn from(value: W) -> Self {
        Self::new(value)
    }
}

impl<W: Word> fmt::Debug for AtomicCell<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicCell").field(&self.read()).finish()
    }
}
