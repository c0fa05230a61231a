//! IR type handle.
//!
//! Layout: 32-bit index split into shard (4 bits) + local index (28 bits),
//! the same split the type table uses for its shards, plus the id of the
//! table that minted the handle.
//!
//! Primitive types are pre-interned in shard 0 at fixed local indices and
//! carry no table id, so `IrType::F32` is valid in every table without a
//! lookup. Every other handle is only valid in the table that produced it.

use std::fmt;

use crate::data::IrTypeData;

/// Handle to an interned IR type.
///
/// Equality is handle equality: the table deduplicates structurally
/// identical types, so two handles from one table are equal iff their types
/// are.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct IrType {
    index: u32,
    /// Minting table, 0 for primitives and untagged handles.
    table: u32,
}

impl IrType {
    // === Pre-interned primitives (shard 0, locals 0-11, no table) ===

    /// `void` (zero-sized).
    pub const VOID: Self = Self::primitive(0);
    /// `bool` (one byte in memory).
    pub const BOOL: Self = Self::primitive(1);
    /// 8-bit signed integer.
    pub const I8: Self = Self::primitive(2);
    /// 16-bit signed integer.
    pub const I16: Self = Self::primitive(3);
    /// 32-bit signed integer.
    pub const I32: Self = Self::primitive(4);
    /// 64-bit signed integer.
    pub const I64: Self = Self::primitive(5);
    /// 8-bit unsigned integer.
    pub const U8: Self = Self::primitive(6);
    /// 16-bit unsigned integer.
    pub const U16: Self = Self::primitive(7);
    /// 32-bit unsigned integer.
    pub const U32: Self = Self::primitive(8);
    /// 64-bit unsigned integer.
    pub const U64: Self = Self::primitive(9);
    /// 32-bit float.
    pub const F32: Self = Self::primitive(10);
    /// 64-bit float.
    pub const F64: Self = Self::primitive(11);

    /// Number of pre-interned primitives.
    pub const PRIMITIVE_COUNT: u32 = 12;

    /// Maximum local index per shard.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Number of shards.
    pub const NUM_SHARDS: usize = 16;

    const fn primitive(index: u32) -> Self {
        Self { index, table: 0 }
    }

    /// Create an untagged handle from shard and local index.
    ///
    /// Untagged compound handles belong to no table.
    #[inline]
    pub const fn from_shard_local(shard: u32, local: u32) -> Self {
        Self::in_table(0, shard, local)
    }

    /// Handle minted by table `table`.
    #[inline]
    pub(crate) const fn in_table(table: u32, shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        Self {
            index: (shard << 28) | local,
            table,
        }
    }

    /// Extract shard index.
    #[inline]
    pub const fn shard(self) -> usize {
        (self.index >> 28) as usize
    }

    /// Extract local index.
    #[inline]
    pub const fn local(self) -> usize {
        (self.index & Self::MAX_LOCAL) as usize
    }

    /// Get the raw shard/local index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.index
    }

    /// Id of the table that minted this handle, 0 if untagged.
    #[inline]
    pub const fn table_id(self) -> u32 {
        self.table
    }

    /// Check if this is a pre-interned primitive.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.table == 0 && self.index < Self::PRIMITIVE_COUNT
    }

    /// Name of a pre-interned primitive, `None` for everything else.
    pub const fn primitive_name(self) -> Option<&'static str> {
        if !self.is_primitive() {
            return None;
        }
        match self.index {
            0 => Some("void"),
            1 => Some("bool"),
            2 => Some("i8"),
            3 => Some("i16"),
            4 => Some("i32"),
            5 => Some("i64"),
            6 => Some("u8"),
            7 => Some("u16"),
            8 => Some("u32"),
            9 => Some("u64"),
            10 => Some("f32"),
            11 => Some("f64"),
            _ => None,
        }
    }

    /// Fixed handle for primitive type data, `None` for compound data.
    pub(crate) fn for_primitive(data: &IrTypeData) -> Option<Self> {
        let ty = match data {
            IrTypeData::Void => Self::VOID,
            IrTypeData::Bool => Self::BOOL,
            IrTypeData::I8 => Self::I8,
            IrTypeData::I16 => Self::I16,
            IrTypeData::I32 => Self::I32,
            IrTypeData::I64 => Self::I64,
            IrTypeData::U8 => Self::U8,
            IrTypeData::U16 => Self::U16,
            IrTypeData::U32 => Self::U32,
            IrTypeData::U64 => Self::U64,
            IrTypeData::F32 => Self::F32,
            IrTypeData::F64 => Self::F64,
            IrTypeData::Pointer { .. } | IrTypeData::Array { .. } | IrTypeData::Aggregate(_) => {
                return None;
            }
        };
        Some(ty)
    }
}

impl fmt::Debug for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive_name() {
            Some(name) => write!(f, "IrType({name})"),
            None => write!(
                f,
                "IrType(table={}, shard={}, local={})",
                self.table,
                self.shard(),
                self.local()
            ),
        }
    }
}
