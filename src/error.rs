use thiserror::Error;

use crate::model::Index;

/// Every failure this engine can report. All variants are recoverable: a
/// parse error leaves the previous model untouched, an evaluation error
/// aborts only that evaluation, a mutator misuse is surfaced to the caller.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SketchError {
    #[error("malformed wire input: {0}")]
    MalformedInput(String),

    #[error("malformed point {index}: {reason}")]
    MalformedPoint { index: usize, reason: String },

    #[error("tick reference cycle through point {0}")]
    Cycle(Index),

    #[error("stroke weights carry {rows} rows but the model has {vertices} vertex points")]
    DimensionMismatch { rows: usize, vertices: usize },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("{kind} index {index} out of range ({len} entries)")]
    IndexOutOfRange {
        kind: &'static str,
        index: Index,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, SketchError>;
