//! The host's generic type builder.
//!
//! A [`TypeBuilder`] is one type-building session for one compilation unit.
//! For every source type it:
//! 1. returns the cached IR type if this session already built it
//! 2. asks the registered custom builder, if any; `Some` wins, `None` falls
//!    through, an error propagates
//! 3. otherwise applies the built-in mapping
//!
//! Sessions keep their caches in `RefCell`s and stay on one thread. Many
//! sessions may share one [`IrContext`] (and its type table) across
//! threads.

use std::cell::RefCell;

use kiln_ir::{AddressSpace, IrContext, IrType};
use kiln_types::{Scalar, SourceId, SourceKind, SourcePool};
use rustc_hash::{FxHashMap, FxHashSet};

use kiln_stack::ensure_sufficient_stack;
use crate::{
    assemble_struct, BuildContext, BuildError, BuilderRegistry, CustomTypeBuilder, StructPolicy,
};

/// Type-building session over a source pool, an IR universe and a registry.
pub struct TypeBuilder<'a> {
    sources: &'a SourcePool,
    ir: &'a IrContext,
    registry: &'a BuilderRegistry,
    /// Source types built so far in this session.
    cache: RefCell<FxHashMap<SourceId, IrType>>,
    /// Source types currently being built (cycle detection).
    resolving: RefCell<FxHashSet<SourceId>>,
}

impl<'a> TypeBuilder<'a> {
    pub fn new(sources: &'a SourcePool, ir: &'a IrContext, registry: &'a BuilderRegistry) -> Self {
        Self {
            sources,
            ir,
            registry,
            cache: RefCell::new(FxHashMap::default()),
            resolving: RefCell::new(FxHashSet::default()),
        }
    }

    /// Build the IR type of `ty`.
    pub fn build(&self, ty: SourceId) -> Result<IrType, BuildError> {
        self.build_type(ty)
    }

    /// Run one extension's entry point against this session.
    pub fn invoke(
        &self,
        extension: &dyn CustomTypeBuilder,
        ty: SourceId,
    ) -> Result<Option<IrType>, BuildError> {
        extension.build(self, ty)
    }

    /// The IR type this session already built for `ty`, if any.
    pub fn cached(&self, ty: SourceId) -> Option<IrType> {
        self.cache.borrow().get(&ty).copied()
    }

    fn build_uncached(&self, ty: SourceId) -> Result<IrType, BuildError> {
        if let Some(extension) = self.registry.lookup(self.sources, ty) {
            match extension.build(self, ty)? {
                Some(ir) => {
                    tracing::debug!(
                        ty = %self.sources.display_name(ty),
                        builder = extension.name(),
                        "custom builder claimed type"
                    );
                    return Ok(ir);
                }
                None => {
                    tracing::trace!(
                        ty = %self.sources.display_name(ty),
                        builder = extension.name(),
                        "custom builder declined"
                    );
                }
            }
        }
        self.build_default(ty)
    }

    /// Built-in mappings.
    fn build_default(&self, ty: SourceId) -> Result<IrType, BuildError> {
        let Some(kind) = self.sources.kind(ty) else {
            return Err(self.unsupported(ty));
        };
        match kind {
            SourceKind::Scalar(scalar) => Ok(scalar_type(*scalar)),
            SourceKind::DevicePtr { elem } => {
                let pointee = self.build_type(*elem)?;
                self.ir
                    .pointer(pointee, AddressSpace::Global)
                    .map_err(|source| BuildError::Construction {
                        ty: self.sources.display_name(ty),
                        source,
                    })
            }
            SourceKind::Array { elem, len } => {
                let element = self.build_type(*elem)?;
                self.ir
                    .array(element, *len)
                    .map_err(|source| BuildError::Construction {
                        ty: self.sources.display_name(ty),
                        source,
                    })
            }
            SourceKind::Composite(def) => {
                assemble_struct(self, ty, &def.fields, &StructPolicy::default())
            }
            SourceKind::Opaque { .. } => Err(self.unsupported(ty)),
        }
    }

    fn unsupported(&self, ty: SourceId) -> BuildError {
        BuildError::Unsupported {
            ty: self.sources.display_name(ty),
        }
    }
}

impl BuildContext for TypeBuilder<'_> {
    #[tracing::instrument(level = "trace", skip_all, fields(ty = ty.raw()))]
    fn build_type(&self, ty: SourceId) -> Result<IrType, BuildError> {
        if let Some(cached) = self.cached(ty) {
            tracing::trace!(?cached, "cache hit");
            return Ok(cached);
        }

        // The IR has no named forward references, so a type reachable from
        // itself cannot be represented.
        if !self.resolving.borrow_mut().insert(ty) {
            return Err(BuildError::RecursiveType {
                ty: self.sources.display_name(ty),
            });
        }
        let result = ensure_sufficient_stack(|| self.build_uncached(ty));
        self.resolving.borrow_mut().remove(&ty);

        let ir = result?;
        self.cache.borrow_mut().insert(ty, ir);
        Ok(ir)
    }

    fn ir_context(&self) -> &IrContext {
        self.ir
    }

    fn sources(&self) -> &SourcePool {
        self.sources
    }
}

fn scalar_type(scalar: Scalar) -> IrType {
    match scalar {
        Scalar::Bool => IrType::BOOL,
        Scalar::I8 => IrType::I8,
        Scalar::I16 => IrType::I16,
        Scalar::I32 => IrType::I32,
        Scalar::I64 => IrType::I64,
        Scalar::U8 => IrType::U8,
        Scalar::U16 => IrType::U16,
        Scalar::U32 => IrType::U32,
        Scalar::U64 => IrType::U64,
        Scalar::F32 => IrType::F32,
        Scalar::F64 => IrType::F64,
    }
}
