//! Size, alignment and field offsets of IR types.
//!
//! Sequential aggregates use C layout. Packed aggregates place fields back
//! to back with alignment 1. Unions place every field at offset 0. An
//! explicit alignment replaces the natural one and may not be lower than
//! it; sizes are always rounded up to the final alignment.
//!
//! Layouts are cached per context as types are minted, so laying out a new
//! aggregate only looks one level down. Layouts computed from scratch
//! recurse once per nesting level and run under stack growth.

use std::sync::Arc;

use kiln_stack::ensure_sufficient_stack;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::data::{AggregateData, IrTypeData};
use crate::hints::{AggregateKind, AlignmentKind, LayoutHint};
use crate::{ConstructError, IrContext, IrType};

/// Memory layout of one IR type, in bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeLayout {
    pub size: u64,
    pub align: u32,
    /// Field offsets in declaration order (empty for non-aggregates).
    pub offsets: SmallVec<[u64; 4]>,
}

impl TypeLayout {
    fn scalar(bytes: u32) -> Self {
        Self {
            size: u64::from(bytes),
            align: bytes.max(1),
            offsets: SmallVec::new(),
        }
    }

    /// Distance between consecutive array elements.
    pub fn stride(&self) -> Option<u64> {
        round_up(self.size, self.align)
    }
}

/// Round `value` up to a multiple of `align`, `None` on overflow.
fn round_up(value: u64, align: u32) -> Option<u64> {
    let align = u64::from(align.max(1));
    value.checked_add(align - 1).map(|v| v / align * align)
}

/// Computed layouts of compound types, shared by clones of a context.
#[derive(Clone, Default)]
pub(crate) struct LayoutCache(Arc<RwLock<FxHashMap<IrType, TypeLayout>>>);

impl LayoutCache {
    fn get(&self, ty: IrType) -> Option<TypeLayout> {
        self.0.read().get(&ty).cloned()
    }

    pub(crate) fn insert(&self, ty: IrType, layout: TypeLayout) {
        if !ty.is_primitive() {
            self.0.write().insert(ty, layout);
        }
    }
}

impl std::fmt::Debug for LayoutCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutCache")
            .field("len", &self.0.read().len())
            .finish_non_exhaustive()
    }
}

impl IrContext {
    /// Layout of a type minted in this universe.
    pub fn layout_of(&self, ty: IrType) -> Result<TypeLayout, ConstructError> {
        if let Some(layout) = self.layouts().get(ty) {
            return Ok(layout);
        }
        let data = self.lookup(ty)?;
        let layout = ensure_sufficient_stack(|| self.layout_of_data(&data))?;
        self.layouts().insert(ty, layout.clone());
        Ok(layout)
    }

    pub(crate) fn layout_of_data(&self, data: &IrTypeData) -> Result<TypeLayout, ConstructError> {
        Ok(match data {
            IrTypeData::Void => TypeLayout::scalar(0),
            IrTypeData::Bool | IrTypeData::I8 | IrTypeData::U8 => TypeLayout::scalar(1),
            IrTypeData::I16 | IrTypeData::U16 => TypeLayout::scalar(2),
            IrTypeData::I32 | IrTypeData::U32 | IrTypeData::F32 => TypeLayout::scalar(4),
            IrTypeData::I64 | IrTypeData::U64 | IrTypeData::F64 => TypeLayout::scalar(8),
            IrTypeData::Pointer { space, .. } => {
                TypeLayout::scalar(self.target().pointer_width(*space))
            }
            IrTypeData::Array { element, len } => {
                let elem = self.layout_of(*element)?;
                let size = elem
                    .stride()
                    .and_then(|stride| stride.checked_mul(*len))
                    .ok_or(ConstructError::LayoutOverflow)?;
                TypeLayout {
                    size,
                    align: elem.align,
                    offsets: SmallVec::new(),
                }
            }
            IrTypeData::Aggregate(agg) => self.aggregate_layout(agg)?,
        })
    }

    fn aggregate_layout(&self, agg: &AggregateData) -> Result<TypeLayout, ConstructError> {
        let packed = agg.layout == LayoutHint::Packed;
        let mut offsets = SmallVec::with_capacity(agg.fields.len());
        let mut end: u64 = 0;
        let mut natural: u32 = 1;

        for field in &*agg.fields {
            let field_layout = self.layout_of(field.ty)?;
            if !packed {
                natural = natural.max(field_layout.align);
            }
            match agg.kind {
                AggregateKind::Struct => {
                    let offset = if packed {
                        end
                    } else {
                        round_up(end, field_layout.align).ok_or(ConstructError::LayoutOverflow)?
                    };
                    offsets.push(offset);
                    end = offset
                        .checked_add(field_layout.size)
                        .ok_or(ConstructError::LayoutOverflow)?;
                }
                AggregateKind::Union => {
                    offsets.push(0);
                    end = end.max(field_layout.size);
                }
            }
        }

        // Packed aggregates have natural alignment 1, so any explicit value fits.
        let align = match agg.alignment {
            AlignmentKind::Natural => natural,
            AlignmentKind::Explicit(align) if align.bytes() < natural => {
                return Err(ConstructError::AlignmentBelowNatural {
                    requested: align.bytes(),
                    natural,
                });
            }
            AlignmentKind::Explicit(align) => align.bytes(),
        };
        let size = round_up(end, align).ok_or(ConstructError::LayoutOverflow)?;

        Ok(TypeLayout {
            size,
            align,
            offsets,
        })
    }
}
