//! Build failures.
//!
//! "This builder does not handle the type" is not an error: extensions
//! signal it with `Ok(None)` and the host falls back to default building.

use kiln_ir::ConstructError;
use thiserror::Error;

/// A failed type build. Fatal to the compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No builder, custom or default, can represent the type.
    #[error("`{ty}` has no device representation")]
    Unsupported { ty: String },

    /// A field's type failed to build; `source` says why.
    #[error("cannot build field `{field}` of `{owner}`")]
    FieldResolution {
        owner: String,
        field: Box<str>,
        #[source]
        source: Box<BuildError>,
    },

    /// The IR backend rejected the assembled type.
    #[error("cannot construct `{ty}`")]
    Construction {
        ty: String,
        #[source]
        source: ConstructError,
    },

    /// The type contains itself, directly or through pointers.
    ///
    /// IR types are interned structurally and have no named forward
    /// references, so even a linked node that reaches itself only through a
    /// device pointer (`struct Node { next: *Node }`) cannot be expressed and
    /// is rejected here. Such types must be lowered by a custom builder, for
    /// example to an untyped `*u8` link.
    #[error("`{ty}` refers to itself")]
    RecursiveType { ty: String },
}

impl BuildError {
    /// The innermost failure, below any chain of field resolutions.
    pub fn root_cause(&self) -> &BuildError {
        let mut err = self;
        while let BuildError::FieldResolution { source, .. } = err {
            err = source;
        }
        err
    }

    /// Field names from the outermost composite down to the failure.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut err = self;
        while let BuildError::FieldResolution { field, source, .. } = err {
            path.push(&**field);
            err = source;
        }
        path
    }
}

/// A registration clashed with an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a type builder is already registered for {key}")]
    AlreadyRegistered { key: String },
}
