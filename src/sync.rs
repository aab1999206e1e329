//! Atomic storage backing the cells.
//!
//! With the `loom` feature these are loom's model-checked atomics; the cell
//! code is identical either way.

#[cfg(not(feature = "loom"))]
pub(crate) use core::sync::atomic::{AtomicI32, AtomicI64, AtomicIsize};

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicI32, AtomicI64, AtomicIsize};
