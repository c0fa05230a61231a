//! Structural description behind an [`IrType`] handle.

use std::fmt;

use crate::hints::{AggregateKind, AlignmentKind, LayoutHint, RefTypeHint};
use crate::IrType;

/// Device address space a pointer refers into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressSpace {
    /// Flat address space; resolves to a concrete space at runtime.
    Generic,
    /// Device global memory (`deviceptr<T>`).
    Global,
    /// Per-block shared memory.
    Shared,
    /// Read-only constant memory.
    Constant,
    /// Per-thread local memory.
    Local,
}

impl AddressSpace {
    /// All address spaces, in index order.
    pub const ALL: [AddressSpace; 5] = [
        AddressSpace::Generic,
        AddressSpace::Global,
        AddressSpace::Shared,
        AddressSpace::Constant,
        AddressSpace::Local,
    ];

    /// Dense index, used by per-space configuration tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            AddressSpace::Generic => 0,
            AddressSpace::Global => 1,
            AddressSpace::Shared => 2,
            AddressSpace::Constant => 3,
            AddressSpace::Local => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AddressSpace::Generic => "generic",
            AddressSpace::Global => "global",
            AddressSpace::Shared => "shared",
            AddressSpace::Constant => "constant",
            AddressSpace::Local => "local",
        }
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named member of an aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IrField {
    /// Field name, unique within its aggregate.
    pub name: Box<str>,
    /// Resolved IR type of the field.
    pub ty: IrType,
}

impl IrField {
    pub fn new(name: impl Into<Box<str>>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A struct or union, with its layout policy already resolved.
///
/// Absent hints are stored as their defaults, so an aggregate built with no
/// hints and one built with explicit `Natural`/`Sequential` hints intern to
/// the same handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AggregateData {
    pub kind: AggregateKind,
    /// Fields in declaration order.
    pub fields: Box<[IrField]>,
    pub alignment: AlignmentKind,
    pub layout: LayoutHint,
    pub ref_hint: RefTypeHint,
}

impl AggregateData {
    /// Find a field by name, returning its position and type.
    pub fn field(&self, name: &str) -> Option<(usize, IrType)> {
        self.fields
            .iter()
            .position(|f| &*f.name == name)
            .map(|i| (i, self.fields[i].ty))
    }
}

/// Interned IR type data.
///
/// Primitives never reach the table's hash maps; they resolve to the fixed
/// handles on [`IrType`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrTypeData {
    Void,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Pointer to `pointee` in `space`.
    Pointer {
        pointee: IrType,
        space: AddressSpace,
    },
    /// Fixed-length inline array.
    Array { element: IrType, len: u64 },
    /// Struct or union.
    Aggregate(AggregateData),
}

impl IrTypeData {
    /// Data for the pre-interned primitives, in handle order.
    pub(crate) const PRIMITIVES: [IrTypeData; 12] = [
        IrTypeData::Void,
        IrTypeData::Bool,
        IrTypeData::I8,
        IrTypeData::I16,
        IrTypeData::I32,
        IrTypeData::I64,
        IrTypeData::U8,
        IrTypeData::U16,
        IrTypeData::U32,
        IrTypeData::U64,
        IrTypeData::F32,
        IrTypeData::F64,
    ];

    /// The aggregate payload, if this is a struct or union.
    pub fn as_aggregate(&self) -> Option<&AggregateData> {
        match self {
            IrTypeData::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }
}
