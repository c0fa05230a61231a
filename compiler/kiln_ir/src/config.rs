//! Target description consulted by layout and construction.

use crate::data::AddressSpace;

/// Backend properties that shape IR types.
///
/// The default describes a 64-bit device: 8-byte pointers in every address
/// space, no zero-field aggregates, 256-byte maximum alignment, aggregates
/// passed by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetConfig {
    /// Pointer width in bytes, indexed by [`AddressSpace::index`].
    pointer_widths: [u32; 5],
    /// Whether `struct_type` accepts an empty field list.
    pub allow_empty_aggregates: bool,
    /// Largest explicit alignment `struct_type` accepts, in bytes.
    pub max_alignment: u32,
    /// What `RefTypeHint::Default` resolves to.
    pub aggregates_by_reference: bool,
}

impl TargetConfig {
    /// A 64-bit device target.
    pub fn device64() -> Self {
        Self {
            pointer_widths: [8; 5],
            allow_empty_aggregates: false,
            max_alignment: 256,
            aggregates_by_reference: true,
        }
    }

    /// A 64-bit device that addresses shared, constant and local memory
    /// with 32-bit pointers.
    pub fn device64_short_pointers() -> Self {
        Self::device64()
            .with_pointer_width(AddressSpace::Shared, 4)
            .with_pointer_width(AddressSpace::Constant, 4)
            .with_pointer_width(AddressSpace::Local, 4)
    }

    /// Pointer width in bytes for `space`.
    #[inline]
    pub fn pointer_width(&self, space: AddressSpace) -> u32 {
        self.pointer_widths[space.index()]
    }

    #[must_use]
    pub fn with_pointer_width(mut self, space: AddressSpace, bytes: u32) -> Self {
        self.pointer_widths[space.index()] = bytes;
        self
    }

    #[must_use]
    pub fn with_empty_aggregates(mut self, allow: bool) -> Self {
        self.allow_empty_aggregates = allow;
        self
    }

    #[must_use]
    pub fn with_max_alignment(mut self, bytes: u32) -> Self {
        self.max_alignment = bytes;
        self
    }

    #[must_use]
    pub fn with_aggregates_by_reference(mut self, by_reference: bool) -> Self {
        self.aggregates_by_reference = by_reference;
        self
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::device64()
    }
}
