//! Errors surfaced by compilation, search and host conversion.

pub use crate::parse::SyntaxError;

/// The resource bound a search ran into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceLimit {
    #[error("exceeded the budget of {0} backtracking steps")]
    Steps(u64),
    #[error("exceeded the backtrack stack depth of {0}")]
    BacktrackDepth(usize),
}

/// Error type for every fallible operation of this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The pattern was rejected by the compiler.
    #[error("Invalid regular expression: {0}")]
    InvalidPattern(#[from] SyntaxError),

    /// Matching was aborted because it exceeded its budget.
    #[error("Ran out of resources while matching: {0}")]
    ResourceExhausted(#[from] ResourceLimit),

    /// A host value could not be converted to the required type.
    #[error("can't convert {0} into String")]
    TypeConversion(&'static str),
}
