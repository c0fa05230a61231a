//! Struct type assembly.
//!
//! Turns an ordered list of source fields into one IR aggregate:
//! 1. Resolve every field through the session's recursive builder, in order
//! 2. Pair each resolved type with its field name
//! 3. Package fields and layout hints into [`StructParams`]
//! 4. Ask the IR context to construct the aggregate
//!
//! Field types may be anything the session can build, including other
//! composites, so nesting depth is unbounded. The aggregate is minted only
//! after every field resolved; a failing field leaves no aggregate behind.

use kiln_ir::{AggregateKind, AlignmentKind, IrField, IrType, LayoutHint, RefTypeHint, StructParams};
use kiln_types::{FieldDescriptor, SourceId};

use crate::{BuildContext, BuildError};

/// Layout policy applied to an assembled aggregate.
///
/// Every `None` means "backend default": natural alignment, sequential
/// layout, the target's reference convention.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StructPolicy {
    pub kind: AggregateKind,
    pub alignment: Option<AlignmentKind>,
    pub layout: Option<LayoutHint>,
    pub ref_hint: Option<RefTypeHint>,
}

impl StructPolicy {
    /// Overlap the fields instead of laying them out in sequence.
    pub fn union() -> Self {
        Self {
            kind: AggregateKind::Union,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: AlignmentKind) -> Self {
        self.alignment = Some(alignment);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutHint) -> Self {
        self.layout = Some(layout);
        self
    }

    #[must_use]
    pub fn with_ref_hint(mut self, ref_hint: RefTypeHint) -> Self {
        self.ref_hint = Some(ref_hint);
        self
    }
}

/// Build the IR aggregate for `owner` from `fields`.
///
/// Field failures come back as [`BuildError::FieldResolution`] naming the
/// field; backend rejections (duplicate or empty names, disallowed empty
/// aggregates, bad alignment) as [`BuildError::Construction`].
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(owner = owner.raw(), field_count = fields.len())
)]
pub fn assemble_struct(
    cx: &dyn BuildContext,
    owner: SourceId,
    fields: &[FieldDescriptor],
    policy: &StructPolicy,
) -> Result<IrType, BuildError> {
    let mut ir_fields = Vec::with_capacity(fields.len());
    for field in fields {
        let ty = cx
            .build_type(field.ty)
            .map_err(|source| BuildError::FieldResolution {
                owner: cx.sources().display_name(owner),
                field: field.name.clone(),
                source: Box::new(source),
            })?;
        ir_fields.push(IrField::new(field.name.clone(), ty));
    }

    let params = StructParams {
        kind: policy.kind,
        fields: ir_fields,
        alignment: policy.alignment,
        layout: policy.layout,
    };

    cx.ir_context()
        .struct_type(params, policy.ref_hint)
        .map_err(|source| BuildError::Construction {
            ty: cx.sources().display_name(owner),
            source,
        })
}
