//! Charge bookkeeping for chargeable enchantments
//!
//! Charges are stored by the host per (item, enchantment). An item that never
//! had a charge written is treated as fully charged.

use crate::descriptor::EnchantmentDescriptor;
use crate::host::ItemStore;
use crate::identity::ItemId;
use tracing::trace;

/// Remaining charges, or `-1` for enchantments that do not use charges
pub fn current_charge<S: ItemStore + ?Sized>(
    store: &S,
    item: ItemId,
    descriptor: &EnchantmentDescriptor,
) -> i64 {
    if !descriptor.is_chargeable() {
        return -1;
    }
    store
        .stored_charge(item, descriptor.id())
        .unwrap_or(descriptor.max_charges() as i64)
}

/// Store a charge clamped to `[0, max_charges]`; `false` for non-chargeable enchantments
pub fn set_charge<S: ItemStore + ?Sized>(
    store: &mut S,
    item: ItemId,
    descriptor: &EnchantmentDescriptor,
    charge: i64,
) -> bool {
    if !descriptor.is_chargeable() {
        return false;
    }
    let clamped = charge.clamp(0, descriptor.max_charges() as i64);
    store.store_charge(item, descriptor.id(), clamped);
    true
}

/// Spend one charge if any remain
pub fn consume_charge<S: ItemStore + ?Sized>(
    store: &mut S,
    item: ItemId,
    descriptor: &EnchantmentDescriptor,
) -> bool {
    let current = current_charge(store, item, descriptor);
    if current <= 0 {
        return false;
    }
    store.store_charge(item, descriptor.id(), current - 1);
    trace!(%item, enchant = descriptor.id(), remaining = current - 1, "charge consumed");
    true
}

/// Whether the enchantment may fire: non-chargeable, or at least one charge left
pub fn has_charge<S: ItemStore + ?Sized>(
    store: &S,
    item: ItemId,
    descriptor: &EnchantmentDescriptor,
) -> bool {
    !descriptor.is_chargeable() || current_charge(store, item, descriptor) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::SandboxWorld;

    fn chargeable(max: u32) -> EnchantmentDescriptor {
        EnchantmentDescriptor::builder("undying")
            .display_name("Undying")
            .charges(max)
            .build()
            .unwrap()
    }

    #[test]
    fn test_unset_charge_is_full() {
        let world = SandboxWorld::new();
        assert_eq!(current_charge(&world, ItemId(1), &chargeable(5)), 5);
    }

    #[test]
    fn test_non_chargeable() {
        let mut world = SandboxWorld::new();
        let plain = EnchantmentDescriptor::builder("glow").display_name("Glow").build().unwrap();
        assert_eq!(current_charge(&world, ItemId(1), &plain), -1);
        assert!(!set_charge(&mut world, ItemId(1), &plain, 3));
        assert!(!consume_charge(&mut world, ItemId(1), &plain));
        assert!(has_charge(&world, ItemId(1), &plain));
    }

    #[test]
    fn test_set_clamps() {
        let mut world = SandboxWorld::new();
        let d = chargeable(5);
        assert!(set_charge(&mut world, ItemId(1), &d, 99));
        assert_eq!(current_charge(&world, ItemId(1), &d), 5);
        assert!(set_charge(&mut world, ItemId(1), &d, -4));
        assert_eq!(current_charge(&world, ItemId(1), &d), 0);
        assert!(!has_charge(&world, ItemId(1), &d));
    }

    #[test]
    fn test_consume_until_empty() {
        let mut world = SandboxWorld::new();
        let d = chargeable(2);
        assert!(consume_charge(&mut world, ItemId(1), &d));
        assert!(consume_charge(&mut world, ItemId(1), &d));
        assert!(!consume_charge(&mut world, ItemId(1), &d));
        assert_eq!(current_charge(&world, ItemId(1), &d), 0);
    }
}
