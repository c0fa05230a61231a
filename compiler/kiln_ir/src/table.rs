//! Sharded IR type table.
//!
//! The host's shared type table: every IR type minted during a compilation
//! is interned here and lives as long as the table. Interning deduplicates,
//! so building the same type twice yields the same [`IrType`].
//!
//! Shards are guarded by their own `RwLock`, which lets independent type
//! builder sessions intern concurrently without a global lock.
//!
//! Every table has a process-unique id stamped into the handles it mints.
//! A handle from another table is unknown here even when its slot exists.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::data::IrTypeData;
use crate::{IrType, TableError};

/// Per-shard storage for interned types.
struct Shard {
    /// Map from type data to local index for deduplication.
    map: FxHashMap<IrTypeData, u32>,
    /// Storage for type data, indexed by local index.
    types: Vec<IrTypeData>,
}

impl Shard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            types: Vec::with_capacity(64),
        }
    }

    /// Create shard 0 with the primitives at their fixed local indices.
    fn with_primitives() -> Self {
        let mut shard = Self::new();
        for (local, data) in (0u32..).zip(IrTypeData::PRIMITIVES) {
            shard.map.insert(data.clone(), local);
            shard.types.push(data);
        }
        shard
    }
}

/// Sharded interner for IR types.
///
/// # Thread Safety
/// Uses one `RwLock` per shard; lookups take a read lock, first-time
/// interning takes a write lock on a single shard. Share across threads via
/// [`SharedTypeTable`].
pub struct TypeTable {
    /// Stamped into every compound handle; never 0.
    id: u32,
    shards: [RwLock<Shard>; IrType::NUM_SHARDS],
}

impl TypeTable {
    /// Create a table holding only the pre-interned primitives.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(Shard::with_primitives())
            } else {
                RwLock::new(Shard::new())
            }
        });
        Self {
            id: Self::fresh_id(),
            shards,
        }
    }

    fn fresh_id() -> u32 {
        // 0 marks primitives and untagged handles.
        static NEXT: AtomicU32 = AtomicU32::new(1);
        NEXT.fetch_add(1, Ordering::Relaxed)
    }

    /// Id stamped into the handles this table mints.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Whether `ty` is a primitive or carries this table's id.
    #[inline]
    fn owns(&self, ty: IrType) -> bool {
        ty.is_primitive() || ty.table_id() == self.id
    }

    /// Shard index for a type, based on its hash.
    ///
    /// Shard 0 also holds the primitives; compound types may land there too.
    #[inline]
    fn shard_for(data: &IrTypeData) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        data.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash = hasher.finish() as usize;
        hash % IrType::NUM_SHARDS
    }

    /// Intern a type, returning the existing handle if it is already known.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard index is bounded by NUM_SHARDS (16)"
    )]
    pub fn intern(&self, data: IrTypeData) -> Result<IrType, TableError> {
        if let Some(ty) = IrType::for_primitive(&data) {
            return Ok(ty);
        }

        let shard_idx = Self::shard_for(&data);
        let shard = &self.shards[shard_idx];

        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&data) {
                return Ok(IrType::in_table(self.id, shard_idx as u32, local));
            }
        }

        let mut guard = shard.write();

        // Another session may have interned it between the two locks.
        if let Some(&local) = guard.map.get(&data) {
            return Ok(IrType::in_table(self.id, shard_idx as u32, local));
        }

        let local = u32::try_from(guard.types.len())
            .ok()
            .filter(|&local| local <= IrType::MAX_LOCAL)
            .ok_or(TableError::ShardOverflow { shard: shard_idx })?;

        guard.types.push(data.clone());
        guard.map.insert(data, local);

        Ok(IrType::in_table(self.id, shard_idx as u32, local))
    }

    /// Look up the data behind a handle.
    ///
    /// Returns `None` for handles this table never produced.
    pub fn get(&self, ty: IrType) -> Option<IrTypeData> {
        if !self.owns(ty) {
            return None;
        }
        self.shards[ty.shard()].read().types.get(ty.local()).cloned()
    }

    /// Whether `ty` was produced by this table.
    pub fn contains(&self, ty: IrType) -> bool {
        self.owns(ty) && ty.local() < self.shards[ty.shard()].read().types.len()
    }

    /// Handle of already-interned data, without interning it.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard index is bounded by NUM_SHARDS (16)"
    )]
    pub fn find(&self, data: &IrTypeData) -> Option<IrType> {
        if let Some(ty) = IrType::for_primitive(data) {
            return Some(ty);
        }
        let shard_idx = Self::shard_for(data);
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(data)
            .map(|&local| IrType::in_table(self.id, shard_idx as u32, local))
    }

    /// Number of interned types, primitives included.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().types.len()).sum()
    }

    /// Whether the table holds only the pre-interned primitives.
    pub fn is_empty(&self) -> bool {
        self.len() <= IrType::PRIMITIVE_COUNT as usize
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Clonable handle to a type table shared by every session of a
/// compilation.
#[derive(Clone, Default)]
pub struct SharedTypeTable(Arc<TypeTable>);

impl SharedTypeTable {
    pub fn new() -> Self {
        Self(Arc::new(TypeTable::new()))
    }

    /// Whether two handles refer to the same table.
    pub fn ptr_eq(&self, other: &SharedTypeTable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for SharedTypeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTypeTable")
            .field("id", &self.0.id)
            .field("len", &self.0.len())
            .finish()
    }
}

impl std::ops::Deref for SharedTypeTable {
    type Target = TypeTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
