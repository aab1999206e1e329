//! Signed integer widths that can back an [`AtomicCell`](super::AtomicCell).
//!
//! Each width is bound to its hardware atomic. With the `loom` feature the
//! bound atomics are loom's model-checked types so the same cell code can be
//! explored exhaustively.

use core::fmt::Debug;
use core::sync::atomic::Ordering;

use num_traits::{PrimInt, Signed, WrappingAdd, WrappingSub};

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width signed integer with a lock-free hardware atomic.
///
/// Implemented for `i32`, `i64` and `isize`. The trait is sealed: the set of
/// widths is exactly the set of atomics the platform provides as single
/// instructions.
pub trait Word:
    sealed::Sealed
    + PrimInt
    + Signed
    + WrappingAdd
    + WrappingSub
    + Debug
    + Default
    + Send
    + Sync
    + 'static
{
    /// The atomic storage for this width.
    #[doc(hidden)]
    type Atomic: Send + Sync;

    /// Human-readable width name, used in diagnostics.
    const NAME: &'static str;

    #[doc(hidden)]
    fn new_atomic(value: Self) -> Self::Atomic;

    /// Widens to `i64`, the representation used at the host boundary.
    fn widen(self) -> i64;

    #[doc(hidden)]
    fn load(atomic: &Self::Atomic, order: Ordering) -> Self;

    #[doc(hidden)]
    fn fetch_add(atomic: &Self::Atomic, delta: Self, order: Ordering) -> Self;

    #[doc(hidden)]
    fn fetch_sub(atomic: &Self::Atomic, delta: Self, order: Ordering) -> Self;

    #[doc(hidden)]
    fn compare_exchange(
        atomic: &Self::Atomic,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;

    #[doc(hidden)]
    fn into_inner(atomic: Self::Atomic) -> Self;

    #[doc(hidden)]
    #[cfg(not(feature = "loom"))]
    fn get_mut(atomic: &mut Self::Atomic) -> &mut Self;
}

macro_rules! impl_word {
    ($value:ty, $std:ident, $name:expr) => {
        impl sealed::Sealed for $value {}

        impl Word for $value {
            type Atomic = crate::sync::$std;

            const NAME: &'static str = $name;

            #[inline(always)]
            fn new_atomic(value: Self) -> Self::Atomic {
                crate::sync::$std::new(value)
            }

            #[inline(always)]
            #[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
            fn widen(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn load(atomic: &Self::Atomic, order: Ordering) -> Self {
                atomic.load(order)
            }

            #[inline(always)]
            fn fetch_add(atomic: &Self::Atomic, delta: Self, order: Ordering) -> Self {
                atomic.fetch_add(delta, order)
            }

            #[inline(always)]
            fn fetch_sub(atomic: &Self::Atomic, delta: Self, order: Ordering) -> Self {
                atomic.fetch_sub(delta, order)
            }

            #[inline(always)]
            fn compare_exchange(
                atomic: &Self::Atomic,
                current: Self,
                new: Self,
                success: Ordering,
                failure: Ordering,
            ) -> Result<Self, Self> {
                atomic.compare_exchange(current, new, success, failure)
            }

            #[cfg(not(feature = "loom"))]
            #[inline(always)]
            fn into_inner(atomic: Self::Atomic) -> Self {
                atomic.into_inner()
            }

            // loom atomics are consumed through an ordinary load.
            #[cfg(feature = "loom")]
            #[inline(always)]
            fn into_inner(atomic: Self::Atomic) -> Self {
                atomic.load(Ordering::SeqCst)
            }

            #[cfg(not(feature = "loom"))]
            #[inline(always)]
            fn get_mut(atomic: &mut Self::Atomic) -> &mut Self {
                atomic.get_mut()
            }
        }
    };
}

impl_word!(i32, AtomicI32, "i32");
impl_word!(i64, AtomicI64, "i64");
impl_word!(isize, AtomicIsize, "isize");
