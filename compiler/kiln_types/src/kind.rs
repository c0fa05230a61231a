//! What a source type is.

use crate::SourceId;

/// Host scalar types with a direct device representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
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
}

impl Scalar {
    /// All scalars, in [`SourceId`] order.
    pub const ALL: [Scalar; 11] = [
        Scalar::Bool,
        Scalar::I8,
        Scalar::I16,
        Scalar::I32,
        Scalar::I64,
        Scalar::U8,
        Scalar::U16,
        Scalar::U32,
        Scalar::U64,
        Scalar::F32,
        Scalar::F64,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::I8 => "i8",
            Scalar::I16 => "i16",
            Scalar::I32 => "i32",
            Scalar::I64 => "i64",
            Scalar::U8 => "u8",
            Scalar::U16 => "u16",
            Scalar::U32 => "u32",
            Scalar::U64 => "u64",
            Scalar::F32 => "f32",
            Scalar::F64 => "f64",
        }
    }

    /// The fixed id of this scalar.
    pub const fn id(self) -> SourceId {
        SourceId::from_raw(self as u32)
    }
}

/// One member of a composite: a name and a source type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: Box<str>,
    pub ty: SourceId,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Box<str>>, ty: SourceId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A nominal composite type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeDef {
    /// Fully applied name, e.g. `DevicePair<f32>`.
    pub name: Box<str>,
    /// Generic definition this composite instantiates, e.g. `DevicePair`.
    pub family: Option<Box<str>>,
    /// Fields in declaration order.
    pub fields: Box<[FieldDescriptor]>,
}

/// A source type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Scalar(Scalar),
    /// Pointer into device global memory (`deviceptr<T>`).
    DevicePtr { elem: SourceId },
    /// Fixed-length inline array.
    Array { elem: SourceId, len: u64 },
    Composite(CompositeDef),
    /// A type without a built-in mapping; only a custom builder can lower it.
    Opaque { name: Box<str> },
}

impl SourceKind {
    /// Whether the pool deduplicates this kind.
    pub(crate) fn is_structural(&self) -> bool {
        matches!(
            self,
            SourceKind::Scalar(_) | SourceKind::DevicePtr { .. } | SourceKind::Array { .. }
        )
    }
}
