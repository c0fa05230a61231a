//! Ready-made custom type builders.
//!
//! [`CompositeBuilder`] lowers composites from their declared fields under a
//! chosen layout policy. [`FieldListBuilder`] lowers one type, usually
//! opaque, from a field list written by the extension author.

use kiln_ir::IrType;
use kiln_types::{FieldDescriptor, SourceId};

use crate::{assemble_struct, BuildContext, BuildError, CustomTypeBuilder, StructPolicy, TypeKey};

/// Lowers the composites matching `key` from their declared fields.
#[derive(Clone, Debug)]
pub struct CompositeBuilder {
    key: TypeKey,
    policy: StructPolicy,
}

impl CompositeBuilder {
    pub fn new(key: TypeKey) -> Self {
        Self {
            key,
            policy: StructPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StructPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }
}

impl CustomTypeBuilder for CompositeBuilder {
    fn build(&self, cx: &dyn BuildContext, ty: SourceId) -> Result<Option<IrType>, BuildError> {
        if !self.key.matches(cx.sources(), ty) {
            return Ok(None);
        }
        let Some(def) = cx.sources().composite_def(ty) else {
            return Ok(None);
        };
        assemble_struct(cx, ty, &def.fields, &self.policy).map(Some)
    }

    fn name(&self) -> &str {
        "composite"
    }
}

/// Lowers exactly one source type from an explicit field list.
///
/// The fields are fixed when the builder is written, not read from the
/// source descriptor, which is how opaque host types get a device shape.
#[derive(Clone, Debug)]
pub struct FieldListBuilder {
    target: SourceId,
    fields: Vec<FieldDescriptor>,
    policy: StructPolicy,
}

impl FieldListBuilder {
    pub fn new(target: SourceId, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            target,
            fields: fields.into_iter().collect(),
            policy: StructPolicy::default(),
        }
    }

    /// The two-pointer pair: `First` and `Second`, both `elem_ptr`.
    pub fn pair(target: SourceId, elem_ptr: SourceId) -> Self {
        Self::new(
            target,
            [
                FieldDescriptor::new("First", elem_ptr),
                FieldDescriptor::new("Second", elem_ptr),
            ],
        )
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StructPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn target(&self) -> SourceId {
        self.target
    }
}

impl CustomTypeBuilder for FieldListBuilder {
    fn build(&self, cx: &dyn BuildContext, ty: SourceId) -> Result<Option<IrType>, BuildError> {
        if ty != self.target {
            return Ok(None);
        }
        assemble_struct(cx, ty, &self.fields, &self.policy).map(Some)
    }

    fn name(&self) -> &str {
        "field-list"
    }
}
