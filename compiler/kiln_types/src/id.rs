//! Source type handle.

use std::fmt;

/// Index of a descriptor in a [`SourcePool`](crate::SourcePool).
///
/// Scalars have fixed ids (0-10) in every pool.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SourceId(u32);

impl SourceId {
    pub const BOOL: Self = Self(0);
    pub const I8: Self = Self(1);
    pub const I16: Self = Self(2);
    pub const I32: Self = Self(3);
    pub const I64: Self = Self(4);
    pub const U8: Self = Self(5);
    pub const U16: Self = Self(6);
    pub const U32: Self = Self(7);
    pub const U64: Self = Self(8);
    pub const F32: Self = Self(9);
    pub const F64: Self = Self(10);

    /// Number of pre-registered scalars.
    pub const SCALAR_COUNT: u32 = 11;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_scalar(self) -> bool {
        self.0 < Self::SCALAR_COUNT
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}
