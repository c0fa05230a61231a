//! Storage for source type descriptors.

#![allow(clippy::format_push_string)] // Display names prioritize clarity over allocation

use rustc_hash::FxHashMap;

use crate::kind::{CompositeDef, FieldDescriptor, Scalar, SourceKind};
use crate::SourceId;

/// Source type storage for one compilation.
///
/// Scalars are pre-registered at their fixed ids. Device pointers and
/// arrays are deduplicated; composites and opaque types are not.
pub struct SourcePool {
    kinds: Vec<SourceKind>,
    structural: FxHashMap<SourceKind, SourceId>,
}

impl SourcePool {
    pub fn new() -> Self {
        let mut pool = Self {
            kinds: Vec::with_capacity(64),
            structural: FxHashMap::default(),
        };
        for scalar in Scalar::ALL {
            pool.intern(SourceKind::Scalar(scalar));
        }
        pool
    }

    fn intern(&mut self, kind: SourceKind) -> SourceId {
        if kind.is_structural() {
            if let Some(&id) = self.structural.get(&kind) {
                return id;
            }
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "source pools never approach u32::MAX entries"
        )]
        let id = SourceId::from_raw(self.kinds.len() as u32);
        if kind.is_structural() {
            self.structural.insert(kind.clone(), id);
        }
        self.kinds.push(kind);
        id
    }

    // === Constructors ===

    /// `deviceptr<elem>`.
    pub fn device_ptr(&mut self, elem: SourceId) -> SourceId {
        self.intern(SourceKind::DevicePtr { elem })
    }

    /// `elem[len]`.
    pub fn array(&mut self, elem: SourceId, len: u64) -> SourceId {
        self.intern(SourceKind::Array { elem, len })
    }

    /// A composite with fields in declaration order.
    pub fn composite(
        &mut self,
        name: impl Into<Box<str>>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> SourceId {
        self.intern(SourceKind::Composite(CompositeDef {
            name: name.into(),
            family: None,
            fields: fields.into_iter().collect(),
        }))
    }

    /// A composite instantiating the generic definition `family`.
    pub fn composite_in_family(
        &mut self,
        family: impl Into<Box<str>>,
        name: impl Into<Box<str>>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> SourceId {
        self.intern(SourceKind::Composite(CompositeDef {
            name: name.into(),
            family: Some(family.into()),
            fields: fields.into_iter().collect(),
        }))
    }

    /// Declare a composite whose fields are supplied later with
    /// [`define_fields`](Self::define_fields), so fields may refer back to it.
    pub fn declare_composite(&mut self, name: impl Into<Box<str>>) -> SourceId {
        self.composite(name, [])
    }

    /// Set the fields of a declared composite.
    ///
    /// Returns `false` if `id` is not a composite.
    pub fn define_fields(
        &mut self,
        id: SourceId,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> bool {
        match self.kinds.get_mut(id.index()) {
            Some(SourceKind::Composite(def)) => {
                def.fields = fields.into_iter().collect();
                true
            }
            _ => false,
        }
    }

    /// A type with no built-in device mapping.
    pub fn opaque(&mut self, name: impl Into<Box<str>>) -> SourceId {
        self.intern(SourceKind::Opaque { name: name.into() })
    }

    // === Queries ===

    pub fn kind(&self, id: SourceId) -> Option<&SourceKind> {
        self.kinds.get(id.index())
    }

    /// The composite definition behind `id`, if it is one.
    pub fn composite_def(&self, id: SourceId) -> Option<&CompositeDef> {
        match self.kind(id)? {
            SourceKind::Composite(def) => Some(def),
            _ => None,
        }
    }

    /// The generic family of a composite, if it has one.
    pub fn family(&self, id: SourceId) -> Option<&str> {
        self.composite_def(id)?.family.as_deref()
    }

    /// Already-registered `deviceptr<elem>`, without registering it.
    pub fn find_device_ptr(&self, elem: SourceId) -> Option<SourceId> {
        self.structural
            .get(&SourceKind::DevicePtr { elem })
            .copied()
    }

    /// Human-readable name, used in diagnostics.
    pub fn display_name(&self, id: SourceId) -> String {
        let mut buf = String::new();
        self.display_name_into(id, &mut buf);
        buf
    }

    fn display_name_into(&self, id: SourceId, buf: &mut String) {
        match self.kind(id) {
            None => buf.push_str(&format!("<unknown {}>", id.raw())),
            Some(SourceKind::Scalar(scalar)) => buf.push_str(scalar.name()),
            Some(SourceKind::DevicePtr { elem }) => {
                buf.push_str("deviceptr<");
                self.display_name_into(*elem, buf);
                buf.push('>');
            }
            Some(SourceKind::Array { elem, len }) => {
                self.display_name_into(*elem, buf);
                buf.push_str(&format!("[{len}]"));
            }
            Some(SourceKind::Composite(def)) => buf.push_str(&def.name),
            Some(SourceKind::Opaque { name }) => buf.push_str(name),
        }
    }

    /// Number of registered descriptors, scalars included.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether only the scalars are registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.len() <= SourceId::SCALAR_COUNT as usize
    }
}

impl Default for SourcePool {
    fn default() -> Self {
        Self::new()
    }
}
