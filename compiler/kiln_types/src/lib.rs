//! Source type descriptors for Kiln.
//!
//! These describe the host-side ("managed") types a kernel signature
//! mentions: scalars, device pointers, inline arrays, composites and opaque
//! types that only a custom type builder knows how to lower.
//!
//! Descriptors live in a [`SourcePool`] and are referenced by [`SourceId`].
//! Structural kinds are deduplicated; composites and opaque types are
//! nominal, so every declaration gets its own id.

mod id;
mod kind;
mod pool;

pub use id::SourceId;
pub use kind::{CompositeDef, FieldDescriptor, Scalar, SourceKind};
pub use pool::SourcePool;
