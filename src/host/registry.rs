use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;

use super::{CellId, Error, HostValue, Op, Operation, RegistryConfig, Request, Response, Result};
use crate::cell::{AtomicCell, SharedCell, Word};

/// Owns host-visible cells and dispatches host calls to them.
///
/// A released handle stops resolving immediately. The cell itself is dropped
/// once no in-flight call still holds its `Arc`.
pub struct Registry<W: Word = isize> {
    config: RegistryConfig,
    last_id: AtomicCell<i64>,
    cells: RwLock<HashMap<CellId, SharedCell<W>>>,
}

impl<W: Word> Registry<W> {
    /// Creates an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            last_id: AtomicCell::new(0),
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// The settings this registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.cells.read().len()
    }

    /// Returns `true` if no cells are live.
    pub fn is_empty(&self) -> bool {
        self.cells.read().is_empty()
    }

    /// Registers a new cell holding `initial` and returns its handle.
    pub fn create(&self, initial: W) -> Result<CellId> {
        let mut cells = self.cells.write();
        let max = self.config.max_cells;
        if cells.len() >= max {
            #[cfg(feature = "tracing")]
            tracing::warn!(max, "cell registry full");
            return Err(Error::CapacityExhausted { max });
        }

        // Only issued under the write lock, so ids are dense and never reused.
        let id = CellId::from_host(self.last_id.increment())
            .map_err(|_| Error::CapacityExhausted { max })?;
        cells.insert(id, AtomicCell::shared(initial));

        #[cfg(feature = "tracing")]
        tracing::debug!(cell = %id, initial = ?initial, "created cell");
        Ok(id)
    }

    /// Registers a new cell from a host value, checking it fits the width.
    pub fn create_from(&self, initial: &HostValue) -> Result<CellId> {
        let raw = initial.expect_int("create", 1)?;
        let initial = narrow::<W>("create", 1, raw)?;
        self.create(initial)
    }

    /// Resolves a handle to its cell.
    ///
    /// The returned `Arc` keeps the cell alive even if the handle is released
    /// concurrently.
    pub fn get(&self, id: CellId) -> Result<SharedCell<W>> {
        self.cells
            .read()
            .get(&id)
            .cloned()
            .ok_or(Error::UnknownCell(id))
    }

    /// Releases a handle and returns the value the cell held at that point.
    pub fn release(&self, id: CellId) -> Result<W> {
        let cell = self.cells.write().remove(&id).ok_or(Error::UnknownCell(id))?;
        let last = cell.read();

        #[cfg(feature = "tracing")]
        tracing::debug!(cell = %id, last = ?last, "released cell");
        Ok(last)
    }

    /// Runs a typed request.
    pub fn dispatch(&self, request: &Request) -> Result<Response> {
        let cell = self.get(request.cell)?;
        apply(&cell, &request.op)
    }

    /// Runs a batch of requests, in parallel with the `parallel` feature.
    ///
    /// Results are in request order. Requests against the same cell are
    /// linearized by the cell, not by their position in the batch.
    pub fn dispatch_batch(&self, requests: &[Request]) -> Vec<Result<Response>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            requests.par_iter().map(|r| self.dispatch(r)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            requests.iter().map(|r| self.dispatch(r)).collect()
        }
    }

    /// Runs a call the way a dynamic host issues it: a method name and
    /// positional arguments, the first being the cell handle.
    ///
    /// # Errors
    /// Unknown names, wrong argument counts, non-integer arguments, operands
    /// outside the cell width and dead handles are all rejected before any
    /// cell is touched.
    pub fn call(&self, name: &str, args: &[HostValue]) -> Result<Response> {
        let operation: Operation = name.parse().map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::debug!(operation = name, "rejected call to unknown operation");
            err
        })?;
        let op_name = operation.name();

        let expected = operation.arity() + 1;
        if args.len() != expected {
            return Err(Error::Arity {
                op: op_name,
                expected,
                got: args.len(),
            });
        }

        let cell = CellId::from_host(args[0].expect_int(op_name, 1)?)?;
        let operands = args[1..]
            .iter()
            .enumerate()
            .map(|(i, arg)| arg.expect_int(op_name, i + 2))
            .collect::<Result<Vec<_>>>()?;

        let op = Op::from_operands(operation, &operands).ok_or(Error::Arity {
            op: op_name,
            expected,
            got: args.len(),
        })?;
        self.dispatch(&Request::new(cell, op))
    }

    /// Decodes a JSON [`Request`], runs it and encodes the outcome.
    ///
    /// Success: `{"ok": {"kind": "value", "value": 3}}`.
    /// Failure: `{"error": {"kind": "unknown_cell", "message": "..."}}`.
    pub fn handle_json(&self, input: &str) -> String {
        let outcome = serde_json::from_str::<Request>(input)
            .map_err(Error::from)
            .and_then(|request| self.dispatch(&request));

        let envelope = match &outcome {
            Ok(response) => Envelope::Ok(response),
            Err(err) => Envelope::Error {
                kind: err.kind(),
                message: err.to_string(),
            },
        };
        serde_json::to_string(&envelope).unwrap_or_else(|err| {
            format!(r#"{{"error":{{"kind":"encode","message":"{err}"}}}}"#)
        })
    }
}

impl<W: Word> Default for Registry<W> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Envelope<'a> {
    Ok(&'a Response),
    Error { kind: &'static str, message: String },
}

fn apply<W: Word>(cell: &AtomicCell<W>, op: &Op) -> Result<Response> {
    let name = op.operation().name();
    let value = match *op {
        Op::Read => cell.read(),
        Op::Increment => cell.increment(),
        Op::Decrement => cell.decrement(),
        Op::Add { delta } => cell.add(narrow(name, 2, delta)?),
        Op::Sub { delta } => cell.sub(narrow(name, 2, delta)?),
        Op::CompareAndSwap { expected, new } => {
            let expected = narrow(name, 2, expected)?;
            let new = narrow(name, 3, new)?;
            let outcome = cell.compare_and_swap(expected, new);
            return Ok(Response::Swap {
                succeeded: outcome.succeeded,
                previous: outcome.previous.widen(),
            });
        }
    };
    Ok(Response::Value {
        value: value.widen(),
    })
}

fn narrow<W: Word>(op: &'static str, position: usize, value: i64) -> Result<W> {
    <W as num_traits::NumCast>::from(value).ok_or(Error::OutOfRange {
        op,
        position,
        value,
        width: W::NAME,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cas(cell: CellId, expected: i64, new: i64) -> Request {
        Request::new(cell, Op::CompareAndSwap { expected, new })
    }

    #[test]
    fn ids_are_never_reused() {
        let registry = Registry::<i64>::default();
        let a = registry.create(1).unwrap();
        registry.release(a).unwrap();
        let b = registry.create(1).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn narrowing_checks_width() {
        let registry = Registry::<i32>::default();
        let id = registry.create(0).unwrap();

        let err = registry
            .dispatch(&Request::new(id, Op::Add { delta: i64::from(i32::MAX) + 1 }))
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { position: 2, width: "i32", .. }));

        let err = registry.dispatch(&cas(id, 0, i64::MIN)).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { position: 3, .. }));
        assert_eq!(registry.get(id).unwrap().read(), 0);
    }

    #[test]
    fn cas_response_carries_previous() {
        let registry = Registry::<isize>::default();
        let id = registry.create(5).unwrap();
        assert_eq!(
            registry.dispatch(&cas(id, 5, 7)).unwrap(),
            Response::Swap { succeeded: true, previous: 5 }
        );
        assert_eq!(
            registry.dispatch(&cas(id, 5, 9)).unwrap(),
            Response::Swap { succeeded: false, previous: 7 }
        );
    }

    #[test]
    fn released_cell_survives_in_flight_holder() {
        let registry = Registry::<i64>::default();
        let id = registry.create(3).unwrap();
        let held = registry.get(id).unwrap();

        assert_eq!(registry.release(id).unwrap(), 3);
        assert!(matches!(registry.get(id), Err(Error::UnknownCell(_))));
        assert_eq!(held.increment(), 4);
    }
}
