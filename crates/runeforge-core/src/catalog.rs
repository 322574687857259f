//! The enchantment catalog
//!
//! An explicitly constructed registry, shared as `Arc<Catalog>` between the
//! engine and whatever else in the host needs lookups. Both indexes sit
//! behind one lock so readers never observe one updated without the other.

use crate::descriptor::EnchantmentDescriptor;
use crate::identity::Material;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Inner {
    by_id: IndexMap<String, Arc<EnchantmentDescriptor>>,
    by_kind: IndexMap<Material, Vec<Arc<EnchantmentDescriptor>>>,
}

/// Registry of enchantment descriptors, indexed by id and by item kind
#[derive(Debug, Default)]
pub struct Catalog {
    inner: RwLock<Inner>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // Lock poisoning is recovered from, not propagated.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a descriptor; returns `false` and keeps the existing one when the id is taken
    pub fn register(&self, descriptor: EnchantmentDescriptor) -> bool {
        let mut inner = self.write();
        if inner.by_id.contains_key(descriptor.id()) {
            debug!(id = descriptor.id(), "duplicate enchantment registration ignored");
            return false;
        }
        let descriptor = Arc::new(descriptor);
        for kind in descriptor.supported_kinds() {
            inner
                .by_kind
                .entry(kind.clone())
                .or_default()
                .push(Arc::clone(&descriptor));
        }
        debug!(id = descriptor.id(), kinds = descriptor.supported_kinds().len(), "enchantment registered");
        inner.by_id.insert(descriptor.id().to_string(), descriptor);
        true
    }

    /// Remove a descriptor from both indexes
    pub fn unregister(&self, id: &str) -> Option<Arc<EnchantmentDescriptor>> {
        let mut inner = self.write();
        let removed = inner.by_id.shift_remove(id)?;
        for kind in removed.supported_kinds() {
            if let Some(list) = inner.by_kind.get_mut(kind) {
                list.retain(|d| d.id() != id);
                if list.is_empty() {
                    inner.by_kind.shift_remove(kind);
                }
            }
        }
        debug!(id, "enchantment unregistered");
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<Arc<EnchantmentDescriptor>> {
        self.read().by_id.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().by_id.contains_key(id)
    }

    /// Every descriptor in registration order
    pub fn all(&self) -> Vec<Arc<EnchantmentDescriptor>> {
        self.read().by_id.values().cloned().collect()
    }

    /// Descriptors whose supported kinds contain `kind`
    ///
    /// Primary-vs-supported and unlock-level filtering are left to the caller.
    pub fn all_for_item_kind(&self, kind: &Material) -> Vec<Arc<EnchantmentDescriptor>> {
        self.read().by_kind.get(kind).cloned().unwrap_or_default()
    }

    /// Descriptors not hidden from listings
    pub fn visible(&self) -> Vec<Arc<EnchantmentDescriptor>> {
        self.read()
            .by_id
            .values()
            .filter(|d| !d.is_hidden())
            .cloned()
            .collect()
    }

    /// Descriptors unlocked at `level`
    pub fn for_unlock_level(&self, level: u32) -> Vec<Arc<EnchantmentDescriptor>> {
        self.read()
            .by_id
            .values()
            .filter(|d| d.required_level() <= level)
            .cloned()
            .collect()
    }

    /// Drop everything, e.g. before a reload
    pub fn clear(&self) {
        let mut inner = self.write();
        let count = inner.by_id.len();
        inner.by_id.clear();
        inner.by_kind.clear();
        info!(count, "enchantment catalog cleared");
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_id.is_empty()
    }
}
