//! Explicit registry of custom type builders.
//!
//! Populated once when a compilation session starts; the default builder
//! consults it before falling back to its built-in mappings. Exact
//! registrations win over family registrations.

use std::fmt;
use std::sync::Arc;

use kiln_types::{SourceId, SourcePool};
use rustc_hash::FxHashMap;

use crate::{CustomTypeBuilder, RegistryError};

/// What a builder is registered against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// One source type.
    Exact(SourceId),
    /// Every composite instantiating the named generic definition.
    Family(Box<str>),
}

impl TypeKey {
    pub fn family(name: impl Into<Box<str>>) -> Self {
        TypeKey::Family(name.into())
    }

    /// Whether `ty` falls under this key.
    pub fn matches(&self, sources: &SourcePool, ty: SourceId) -> bool {
        match self {
            TypeKey::Exact(id) => *id == ty,
            TypeKey::Family(name) => sources.family(ty) == Some(&**name),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Exact(id) => write!(f, "source type #{}", id.raw()),
            TypeKey::Family(name) => write!(f, "family `{name}`"),
        }
    }
}

/// Source-type identity to custom builder.
#[derive(Clone, Default)]
pub struct BuilderRegistry {
    exact: FxHashMap<SourceId, Arc<dyn CustomTypeBuilder>>,
    families: FxHashMap<Box<str>, Arc<dyn CustomTypeBuilder>>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a static table of registrations.
    pub fn from_table(
        entries: impl IntoIterator<Item = (TypeKey, Arc<dyn CustomTypeBuilder>)>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (key, builder) in entries {
            registry.register(key, builder)?;
        }
        Ok(registry)
    }

    /// Register `builder` for `key`. Each key takes one builder.
    pub fn register(
        &mut self,
        key: TypeKey,
        builder: Arc<dyn CustomTypeBuilder>,
    ) -> Result<(), RegistryError> {
        let taken = match &key {
            TypeKey::Exact(id) => self.exact.contains_key(id),
            TypeKey::Family(name) => self.families.contains_key(name),
        };
        if taken {
            return Err(RegistryError::AlreadyRegistered {
                key: key.to_string(),
            });
        }

        tracing::debug!(%key, builder = builder.name(), "type builder registered");
        match key {
            TypeKey::Exact(id) => {
                self.exact.insert(id, builder);
            }
            TypeKey::Family(name) => {
                self.families.insert(name, builder);
            }
        }
        Ok(())
    }

    /// The builder responsible for `ty`, if any.
    pub fn lookup(&self, sources: &SourcePool, ty: SourceId) -> Option<&Arc<dyn CustomTypeBuilder>> {
        self.exact
            .get(&ty)
            .or_else(|| sources.family(ty).and_then(|family| self.families.get(family)))
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.exact.len() + self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("exact", &self.exact.len())
            .field("families", &self.families.len())
            .finish()
    }
}
