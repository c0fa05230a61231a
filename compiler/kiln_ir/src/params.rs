//! Struct-building parameter: everything `IrContext::struct_type` needs
//! except the reference-type hint.

use crate::hints::{AggregateKind, AlignmentKind, LayoutHint};
use crate::IrField;

/// Ordered fields plus optional layout policy for one aggregate.
///
/// `None` hints mean "backend default"; they are never an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructParams {
    pub kind: AggregateKind,
    pub fields: Vec<IrField>,
    pub alignment: Option<AlignmentKind>,
    pub layout: Option<LayoutHint>,
}

impl StructParams {
    /// A struct with default alignment and layout.
    pub fn new(fields: impl IntoIterator<Item = IrField>) -> Self {
        Self {
            kind: AggregateKind::Struct,
            fields: fields.into_iter().collect(),
            alignment: None,
            layout: None,
        }
    }

    /// A union with default alignment and layout.
    pub fn union(fields: impl IntoIterator<Item = IrField>) -> Self {
        Self {
            kind: AggregateKind::Union,
            ..Self::new(fields)
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
}
