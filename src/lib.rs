//! # `wordsync` - Word-Sized Atomic Cells
//!
//! Lock-free integer primitives for hosts that have no atomics of their own.
//! A cell owns one machine word and exposes a fixed set of indivisible
//! operations on it; a narrow adapter lets a dynamic host drive those
//! operations through handles and plain request/response values.
//!
//! ## Guarantees
//!
//! ### Atomicity
//! - **Single instruction**: every primitive compiles to one hardware atomic
//!   (load, fetch-add, fetch-sub, compare-exchange). No intermediate state is
//!   ever observable.
//! - **No torn values**: a read returns a value produced by initialization or
//!   by some completed operation.
//!
//! ### Ordering
//! - **Linearizable**: all operations on one cell take effect in a single
//!   total order consistent with real-time precedence.
//! - **Sequentially consistent**: every primitive uses `SeqCst`.
//!
//! ### Progress
//! - **Lock-free**: no primitive blocks, spins, yields or retries. A failed
//!   compare-and-swap is an ordinary outcome returned to the caller.
//!
//! ### Ownership
//! - A cell is a value. It lives as long as its owner or, for
//!   [`SharedCell`], as long as any `Arc` holder. Operating on a released cell
//!   cannot be expressed.
//!
//! ## Architecture
//!
//! 1. **Core** ([`cell`]): [`AtomicCell<W>`] over a sealed [`Word`] width
//!    (`i32`, `i64`, `isize`), and [`CasOutcome`].
//! 2. **Host adapter** ([`host`]): [`host::Registry`] of handle-addressed
//!    cells, typed [`host::Request`]/[`host::Response`], loose
//!    [`host::HostValue`] argument validation and a JSON envelope.
//!
//! The adapter depends on the core; the core knows nothing about hosts.
//!
//! ## Example
//!
//! ```rust
//! use wordsync::AtomicCell;
//!
//! let counter = AtomicCell::<i64>::new(0);
//! std::thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             for _ in 0..1000 {
//!                 counter.increment();
//!             }
//!         });
//!     }
//! });
//! assert_eq!(counter.read(), 4000);
//!
//! // Caller-owned retry loop on top of compare-and-swap.
//! let mut seen = counter.read();
//! loop {
//!     let outcome = counter.compare_and_swap(seen, seen * 2);
//!     if outcome.succeeded {
//!         break;
//!     }
//!     seen = outcome.previous;
//! }
//! assert_eq!(counter.read(), 8000);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cell;
#[cfg(not(feature = "loom"))]
pub mod host;
mod sync;

pub use cell::{AtomicCell, CasOutcome, SharedCell, Word};

// Compile-time assertions for memory layout
#[cfg(not(feature = "loom"))]
const _: () = {
    use core::mem;
    use core::sync::atomic::{AtomicI32, AtomicI64, AtomicIsize};

    // `AtomicCell` is `repr(transparent)` over the platform atomic, so it must
    // match size + alignment exactly.
    assert!(mem::size_of::<AtomicCell<i32>>() == mem::size_of::<AtomicI32>());
    assert!(mem::align_of::<AtomicCell<i32>>() == mem::align_of::<AtomicI32>());
    assert!(mem::size_of::<AtomicCell<i64>>() == mem::size_of::<AtomicI64>());
    assert!(mem::align_of::<AtomicCell<i64>>() == mem::align_of::<AtomicI64>());
    assert!(mem::size_of::<AtomicCell>() == mem::size_of::<usize>());
    assert!(mem::align_of::<AtomicCell>() == mem::align_of::<AtomicIsize>());
};
