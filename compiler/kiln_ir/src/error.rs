//! Errors raised while interning and constructing IR types.

use thiserror::Error;

use crate::IrType;

/// Error when interning a type fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Shard exceeded capacity (over 268 million types per shard).
    #[error("type table shard {shard} exceeded its capacity")]
    ShardOverflow { shard: usize },
}

/// The backend rejected a construction request.
///
/// These are fatal to the compilation unit: they describe an aggregate
/// that cannot exist, not a transient condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    #[error("field #{index} has an empty name")]
    EmptyFieldName { index: usize },

    #[error("duplicate field `{name}`")]
    DuplicateField { name: Box<str> },

    #[error("aggregate has no fields and the target does not allow empty aggregates")]
    EmptyAggregate,

    #[error("alignment {bytes} is not a power of two")]
    InvalidAlignment { bytes: u32 },

    #[error("alignment {requested} exceeds the target maximum of {max}")]
    AlignmentTooLarge { requested: u32, max: u32 },

    #[error("alignment {requested} is below the natural alignment {natural} of the fields")]
    AlignmentBelowNatural { requested: u32, natural: u32 },

    #[error("type size overflows the device address range")]
    LayoutOverflow,

    #[error("{ty:?} does not belong to this type table")]
    UnknownType { ty: IrType },

    #[error(transparent)]
    Table(#[from] TableError),
}
