//! The active compilation's IR universe.
//!
//! An [`IrContext`] pairs the shared type table with the target
//! description. It is the only place aggregates are minted: a request is
//! validated and laid out first, and only a request that passes every check
//! reaches the table. A rejected request leaves the table untouched.

use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashSet;

use crate::data::{AddressSpace, AggregateData, IrField, IrTypeData};
use crate::hints::{AlignmentKind, RefTypeHint};
use crate::layout::LayoutCache;
use crate::{ConstructError, IrType, SharedTypeTable, StructParams, TargetConfig};

/// Identity of one IR universe, for diagnostics only.
///
/// Handle validity is decided by the type table, which stamps its own id
/// into every handle it mints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(u32);

impl ContextId {
    fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ContextId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to the active compilation's IR universe.
///
/// Cheap to clone; clones share the table, the layout cache and the
/// identity.
#[derive(Clone, Debug)]
pub struct IrContext {
    id: ContextId,
    table: SharedTypeTable,
    target: TargetConfig,
    layouts: LayoutCache,
}

impl IrContext {
    /// A fresh universe with its own type table.
    pub fn new(target: TargetConfig) -> Self {
        Self::with_table(SharedTypeTable::new(), target)
    }

    /// A universe minting into an existing (possibly shared) table.
    pub fn with_table(table: SharedTypeTable, target: TargetConfig) -> Self {
        Self {
            id: ContextId::fresh(),
            table,
            target,
            layouts: LayoutCache::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[inline]
    pub fn table(&self) -> &SharedTypeTable {
        &self.table
    }

    #[inline]
    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    #[inline]
    pub(crate) fn layouts(&self) -> &LayoutCache {
        &self.layouts
    }

    /// Data behind a handle minted in this universe.
    pub fn lookup(&self, ty: IrType) -> Result<IrTypeData, ConstructError> {
        self.table
            .get(ty)
            .ok_or(ConstructError::UnknownType { ty })
    }

    /// The aggregate payload of `ty`, or `None` for non-aggregates.
    pub fn aggregate(&self, ty: IrType) -> Result<Option<AggregateData>, ConstructError> {
        Ok(match self.lookup(ty)? {
            IrTypeData::Aggregate(agg) => Some(agg),
            _ => None,
        })
    }

    /// Pointer to `pointee` in `space`.
    pub fn pointer(&self, pointee: IrType, space: AddressSpace) -> Result<IrType, ConstructError> {
        self.ensure_known(pointee)?;
        Ok(self.table.intern(IrTypeData::Pointer { pointee, space })?)
    }

    /// Fixed-length array of `element`.
    pub fn array(&self, element: IrType, len: u64) -> Result<IrType, ConstructError> {
        let data = IrTypeData::Array { element, len };
        let layout = self.layout_of_data(&data)?;
        let ty = self.table.intern(data)?;
        self.layouts.insert(ty, layout);
        Ok(ty)
    }

    /// Construct a struct or union from ordered fields and optional hints.
    ///
    /// Rejects empty or duplicate field names, empty field lists (unless the
    /// target allows them), alignments above the target maximum or below
    /// the natural alignment, unknown field types and sizes that overflow. Identical requests return the
    /// same handle.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(kind = ?params.kind, field_count = params.fields.len())
    )]
    pub fn struct_type(
        &self,
        params: StructParams,
        ref_hint: Option<RefTypeHint>,
    ) -> Result<IrType, ConstructError> {
        self.validate_fields(&params.fields)?;

        let alignment = params.alignment.unwrap_or_default();
        if let AlignmentKind::Explicit(align) = alignment {
            if align.bytes() > self.target.max_alignment {
                return Err(ConstructError::AlignmentTooLarge {
                    requested: align.bytes(),
                    max: self.target.max_alignment,
                });
            }
        }

        let data = IrTypeData::Aggregate(AggregateData {
            kind: params.kind,
            fields: params.fields.into_boxed_slice(),
            alignment,
            layout: params.layout.unwrap_or_default(),
            ref_hint: ref_hint.unwrap_or_default(),
        });

        // Laying out also checks that every field type is known.
        let layout = self.layout_of_data(&data)?;
        let ty = self.table.intern(data)?;

        tracing::debug!(
            ?ty,
            size = layout.size,
            align = layout.align,
            context = self.id.raw(),
            "aggregate minted"
        );
        self.layouts.insert(ty, layout);
        Ok(ty)
    }

    /// Whether generated code passes values of `ty` by reference.
    ///
    /// Aggregates follow their hint, with `Default` resolved by the target;
    /// everything else is passed by value.
    pub fn passes_by_reference(&self, ty: IrType) -> Result<bool, ConstructError> {
        Ok(match self.aggregate(ty)? {
            Some(agg) => match agg.ref_hint {
                RefTypeHint::Default => self.target.aggregates_by_reference,
                RefTypeHint::ByValue => false,
                RefTypeHint::ByReference => true,
            },
            None => false,
        })
    }

    fn ensure_known(&self, ty: IrType) -> Result<(), ConstructError> {
        if self.table.contains(ty) {
            Ok(())
        } else {
            Err(ConstructError::UnknownType { ty })
        }
    }

    fn validate_fields(&self, fields: &[IrField]) -> Result<(), ConstructError> {
        if fields.is_empty() && !self.target.allow_empty_aggregates {
            return Err(ConstructError::EmptyAggregate);
        }

        let mut seen = FxHashSet::default();
        for (index, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(ConstructError::EmptyFieldName { index });
            }
            if !seen.insert(&*field.name) {
                return Err(ConstructError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}
