//! Host-binding adapter.
//!
//! A dynamic host cannot hold a Rust reference, so it addresses cells through
//! opaque [`CellId`] handles issued by a [`Registry`]. Calls arrive either as
//! typed [`Request`]s, as a method name plus loosely typed [`HostValue`]
//! arguments, or as a JSON envelope; all three funnel into the same lock-free
//! cell primitives.
//!
//! The registry's table lock guards handle lookup only. Once a cell's `Arc` has
//! been cloned out, the operation itself runs on the cell without any lock.

use core::fmt;
use core::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Registry settings.
pub mod config;
/// Adapter errors.
pub mod error;
/// Handle table and dispatch.
pub mod registry;
pub mod request;
/// Loosely typed host arguments.
pub mod value;

pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use registry::Registry;
pub use request::{Op, Operation, Request, Response};
pub use value::HostValue;

/// Opaque handle naming a cell inside one [`Registry`].
///
/// Handles are never zero and never reused by the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(NonZeroU64);

impl CellId {
    /// Wraps a raw handle; `None` for zero.
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// The raw handle value.
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Interprets a host integer as a handle.
    pub(crate) fn from_host(raw: i64) -> Result<Self> {
        u64::try_from(raw)
            .ok()
            .and_then(Self::new)
            .ok_or(Error::InvalidHandle(raw))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}
