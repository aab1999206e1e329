use super::CellId;

/// Errors raised by the host adapter.
///
/// The core primitives never fail; everything here is about validating what a
/// host hands over before it reaches a cell.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No operation is registered under this name.
    #[error("unknown operation `{name}`")]
    UnknownOperation {
        /// The name the host asked for.
        name: String,
    },

    /// Wrong number of arguments, counting the cell handle.
    #[error("{op}() takes exactly {expected} arguments ({got} given)")]
    Arity {
        /// Operation name.
        op: &'static str,
        /// Arguments required.
        expected: usize,
        /// Arguments supplied.
        got: usize,
    },

    /// An argument is not an integer.
    #[error("{op}() argument {position} must be int, not {found}")]
    ArgumentType {
        /// Operation name.
        op: &'static str,
        /// 1-based argument position.
        position: usize,
        /// Host type name of the offending value.
        found: &'static str,
    },

    /// An integer argument does not fit the cell width.
    #[error("{op}() argument {position} ({value}) does not fit in {width}")]
    OutOfRange {
        /// Operation name.
        op: &'static str,
        /// 1-based argument position.
        position: usize,
        /// The rejected value.
        value: i64,
        /// Cell width name.
        width: &'static str,
    },

    /// The handle argument can never name a cell.
    #[error("invalid cell handle {0}")]
    InvalidHandle(i64),

    /// The handle was never issued or has been released.
    #[error("{0} is not a live cell")]
    UnknownCell(CellId),

    /// The registry holds as many cells as it is configured for.
    #[error("registry is full ({max} cells)")]
    CapacityExhausted {
        /// Configured limit.
        max: usize,
    },

    /// A JSON request or config could not be decoded.
    #[error("malformed input: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Stable snake_case identifier, used in the JSON error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UnknownOperation { .. } => "unknown_operation",
            Error::Arity { .. } => "arity",
            Error::ArgumentType { .. } => "argument_type",
            Error::OutOfRange { .. } => "out_of_range",
            Error::InvalidHandle(_) => "invalid_handle",
            Error::UnknownCell(_) => "unknown_cell",
            Error::CapacityExhausted { .. } => "capacity_exhausted",
            Error::Decode(_) => "decode",
        }
    }
}

/// Result alias for the host adapter.
pub type Result<T> = core::result::Result<T, Error>;
