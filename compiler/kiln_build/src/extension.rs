//! The custom type-builder extension point.

use kiln_ir::IrType;
use kiln_types::SourceId;

use crate::{BuildContext, BuildError};

/// Type-specific IR construction, consulted before default building.
///
/// Outcomes of [`build`](Self::build):
/// - `Ok(Some(ty))`: `ty` is the complete IR representation of the source type.
/// - `Ok(None)`: not this builder's type. Return it before touching `cx`,
///   so a decline leaves the type table as it was.
/// - `Err(_)`: the type is this builder's but cannot be built. Never
///   degrade to a partial aggregate.
///
/// Builders hold no mutable state and may be shared by sessions on
/// different threads.
pub trait CustomTypeBuilder: Send + Sync {
    fn build(&self, cx: &dyn BuildContext, ty: SourceId) -> Result<Option<IrType>, BuildError>;

    /// Name used in trace output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> CustomTypeBuilder for F
where
    F: Fn(&dyn BuildContext, SourceId) -> Result<Option<IrType>, BuildError> + Send + Sync,
{
    fn build(&self, cx: &dyn BuildContext, ty: SourceId) -> Result<Option<IrType>, BuildError> {
        self(cx, ty)
    }
}
