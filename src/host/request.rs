//! The request/response contract between a host binding and the cells.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CellId, Error};

/// The fixed method table exposed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `atomic_read(cell)`
    Read,
    /// `increment(cell)`
    Increment,
    /// `decrement(cell)`
    Decrement,
    /// `add(cell, delta)`
    Add,
    /// `sub(cell, delta)`
    Sub,
    /// `compare_and_swap(cell, expected, new)`
    CompareAndSwap,
}

impl Operation {
    /// Every operation, in method-table order.
    pub const ALL: [Operation; 6] = [
        Operation::CompareAndSwap,
        Operation::Increment,
        Operation::Decrement,
        Operation::Add,
        Operation::Sub,
        Operation::Read,
    ];

    /// Host-facing name.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Read => "atomic_read",
            Operation::Increment => "increment",
            Operation::Decrement => "decrement",
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::CompareAndSwap => "compare_and_swap",
        }
    }

    /// One-line docstring for the host's help system.
    pub const fn describe(self) -> &'static str {
        match self {
            Operation::Read => "Atomically read an integer",
            Operation::Increment => "Atomically increment an integer",
            Operation::Decrement => "Atomically decrement an integer",
            Operation::Add => "Atomically increment an integer with a value",
            Operation::Sub => "Atomically decrement an integer with a value",
            Operation::CompareAndSwap => "Atomically compare and swap 2 integers",
        }
    }

    /// Number of integer operands after the cell handle.
    pub const fn arity(self) -> usize {
        match self {
            Operation::Read | Operation::Increment | Operation::Decrement => 0,
            Operation::Add | Operation::Sub => 1,
            Operation::CompareAndSwap => 2,
        }
    }

    /// Looks up an operation by its host-facing name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| Error::UnknownOperation {
            name: name.to_owned(),
        })
    }
}

/// An operation together with its operands.
///
/// Operands travel as `i64` and are narrowed to the cell width on dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Read the current value.
    #[serde(rename = "atomic_read")]
    Read,
    /// Add one.
    Increment,
    /// Subtract one.
    Decrement,
    /// Add `delta`.
    Add {
        /// Amount to add.
        delta: i64,
    },
    /// Subtract `delta`.
    Sub {
        /// Amount to subtract.
        delta: i64,
    },
    /// Replace `expected` with `new`.
    CompareAndSwap {
        /// Value the cell must hold.
        expected: i64,
        /// Replacement value.
        new: i64,
    },
}

impl Op {
    /// The method-table entry this request targets.
    pub const fn operation(&self) -> Operation {
        match self {
            Op::Read => Operation::Read,
            Op::Increment => Operation::Increment,
            Op::Decrement => Operation::Decrement,
            Op::Add { .. } => Operation::Add,
            Op::Sub { .. } => Operation::Sub,
            Op::CompareAndSwap { .. } => Operation::CompareAndSwap,
        }
    }

    /// Operands in positional order.
    pub fn operands(&self) -> Vec<i64> {
        match *self {
            Op::Read | Op::Increment | Op::Decrement => Vec::new(),
            Op::Add { delta } | Op::Sub { delta } => vec![delta],
            Op::CompareAndSwap { expected, new } => vec![expected, new],
        }
    }

    /// Builds a request body from a method-table entry and positional operands.
    ///
    /// Returns `None` if `operands` does not match the operation's arity.
    pub fn from_operands(operation: Operation, operands: &[i64]) -> Option<Self> {
        let op = match (operation, operands) {
            (Operation::Read, []) => Op::Read,
            (Operation::Increment, []) => Op::Increment,
            (Operation::Decrement, []) => Op::Decrement,
            (Operation::Add, &[delta]) => Op::Add { delta },
            (Operation::Sub, &[delta]) => Op::Sub { delta },
            (Operation::CompareAndSwap, &[expected, new]) => Op::CompareAndSwap { expected, new },
            _ => return None,
        };
        Some(op)
    }
}

/// A typed request against one cell.
///
/// On the wire: `{"cell": 1, "op": "add", "delta": 5}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Target cell.
    pub cell: CellId,
    /// What to do to it.
    #[serde(flatten)]
    pub op: Op,
}

impl Request {
    /// Creates a request.
    pub const fn new(cell: CellId, op: Op) -> Self {
        Self { cell, op }
    }
}

/// The result handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    /// Result of read, increment, decrement, add and sub.
    Value {
        /// The value read, or the new value after the update.
        value: i64,
    },
    /// Result of compare-and-swap.
    Swap {
        /// Whether the swap took place.
        succeeded: bool,
        /// Value held immediately before the attempt.
        previous: i64,
    },
}

impl Response {
    /// The integer a host gets back: the value, or the previous value of a swap.
    pub const fn value(&self) -> i64 {
        match *self {
            Response::Value { value } => value,
            Response::Swap { previous, .. } => previous,
        }
    }
}
