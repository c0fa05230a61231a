//! The capability a type builder receives from its host.

use kiln_ir::{IrContext, IrType};
use kiln_types::{SourceId, SourcePool};

use crate::BuildError;

/// An active type-building session.
///
/// Extensions see the host only through this trait, which keeps them
/// testable against a stub session.
pub trait BuildContext {
    /// Build the IR type of any source type, recursively.
    ///
    /// Fails if no builder in the whole pipeline can represent `ty`.
    fn build_type(&self, ty: SourceId) -> Result<IrType, BuildError>;

    /// The IR universe new types are minted into.
    fn ir_context(&self) -> &IrContext;

    /// Descriptors of the source types being built.
    fn sources(&self) -> &SourcePool;
}
