//! Layout policy values attached to aggregates at construction time.
//!
//! Every hint has a `Default` that means "use the backend default", so a
//! caller that passes nothing gets natural alignment and sequential layout.

use std::fmt;

use crate::ConstructError;

/// Whether an aggregate lays its fields out one after another or overlaps
/// them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    #[default]
    Struct,
    Union,
}

impl AggregateKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            AggregateKind::Struct => "struct",
            AggregateKind::Union => "union",
        }
    }
}

/// A power-of-two byte alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Align(u32);

impl Align {
    pub const ONE: Align = Align(1);

    /// Validate a byte alignment.
    pub fn new(bytes: u32) -> Result<Self, ConstructError> {
        if bytes.is_power_of_two() {
            Ok(Align(bytes))
        } else {
            Err(ConstructError::InvalidAlignment { bytes })
        }
    }

    #[inline]
    pub const fn bytes(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alignment policy for an aggregate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignmentKind {
    /// Largest field alignment (1 for packed aggregates).
    #[default]
    Natural,
    /// Caller-chosen alignment. Packed aggregates report it exactly;
    /// others never drop below their natural alignment.
    Explicit(Align),
}

/// Field placement strategy for an aggregate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutHint {
    /// C layout: each field at the next offset satisfying its alignment.
    #[default]
    Sequential,
    /// No padding between fields.
    Packed,
}

/// How generated code conventionally passes and stores the aggregate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefTypeHint {
    /// The target's convention (`TargetConfig::aggregates_by_reference`).
    #[default]
    Default,
    ByValue,
    ByReference,
}
