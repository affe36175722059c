use alloc::collections::btree_map::Entry as BTreeEntry;
use alloc::collections::{BTreeMap, BTreeSet};

use crate::clock::HybridTimestamp;
use crate::lww_register::LWWRegister;
use crate::Crdt;

/// Unique creation tag: (node id, per-node counter).
type Tag = (u16, u64);

/// Per-key state: the creation tags under which the key is alive, plus the
/// key's register.
///
/// A slot with no live tags is a grave. Graves are hidden from every read
/// but kept in the map so the register still takes part in value
/// resolution on later merges.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Slot<V: Clone> {
    tags: BTreeSet<Tag>,
    register: LWWRegister<V>,
}

/// An observed-remove map of last-writer-wins registers (OR-Map).
///
/// Key presence follows observed-remove rules: every creation generates a
/// unique tag, and a removal retires only the tags the remover has
/// observed, so a concurrent re-creation on another replica survives the
/// merge. The value under a key is an [`LWWRegister`] that resolves
/// concurrent writes on its own, independently of presence.
///
/// Keys are created only through [`get_or_create`](ORMap::get_or_create);
/// plain lookups never allocate state.
///
/// # Example
///
/// ```
/// use register_map::prelude::*;
///
/// let mut m1 = ORMap::new(1);
/// m1.get_or_create_at("score", 10, HybridTimestamp { physical: 100, logical: 0, node_id: 1 });
/// m1.remove(&"score");
///
/// let mut m2 = ORMap::new(2);
/// m2.get_or_create_at("score", 20, HybridTimestamp { physical: 200, logical: 0, node_id: 2 });
///
/// m1.merge(&m2);
/// // m2 created "score" under a tag m1 never observed, so it survives
/// assert_eq!(m1.get(&"score").map(|r| *r.value()), Some(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ORMap<K: Ord + Clone, V: Clone> {
    node: u16,
    counter: u64,
    /// key -> slot; retains graves, reads filter them out
    entries: BTreeMap<K, Slot<V>>,
    /// Tombstones: tags that have been retired
    tombstones: BTreeSet<Tag>,
}

impl<K: Ord + Clone, V: Clone> ORMap<K, V> {
    /// Create a new empty OR-Map for the given replica.
    pub fn new(node: u16) -> Self {
        Self {
            node,
            counter: 0,
            entries: BTreeMap::new(),
            tombstones: BTreeSet::new(),
        }
    }

    /// Get the register under a key, if the key is alive.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&LWWRegister<V>> {
        self.entries
            .get(key)
            .filter(|slot| !slot.tags.is_empty())
            .map(|slot| &slot.register)
    }

    /// Get the register under a key mutably, if the key is alive.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut LWWRegister<V>> {
        self.entries
            .get_mut(key)
            .filter(|slot| !slot.tags.is_empty())
            .map(|slot| &mut slot.register)
    }

    /// Get the register under a key, creating it atomically if the key is
    /// not alive.
    ///
    /// A created register is seeded with `value` and stamped from the
    /// current system time; if the key was removed earlier, the seed is
    /// written through the retired register so it outranks the retired
    /// value. When the key is already alive, `value` is dropped and the
    /// existing register is returned untouched.
    ///
    /// This method requires the `std` feature. In `no_std` environments,
    /// use [`ORMap::get_or_create_at`] instead.
    #[cfg(feature = "std")]
    pub fn get_or_create(&mut self, key: K, value: V) -> &mut LWWRegister<V> {
        match self.entries.entry(key) {
            BTreeEntry::Vacant(vacant) => {
                self.counter += 1;
                let mut tags = BTreeSet::new();
                tags.insert((self.node, self.counter));
                let slot = vacant.insert(Slot {
                    tags,
                    register: LWWRegister::new(value, self.node),
                });
                &mut slot.register
            }
            BTreeEntry::Occupied(occupied) => {
                let slot = occupied.into_mut();
                if slot.tags.is_empty() {
                    self.counter += 1;
                    slot.tags.insert((self.node, self.counter));
                    slot.register.set(value, self.node);
                }
                &mut slot.register
            }
        }
    }

    /// Get the register under a key, creating it atomically with an
    /// explicit stamp if the key is not alive.
    ///
    /// Like [`get_or_create`](ORMap::get_or_create), but the seed write
    /// carries `stamp`. When reviving a removed key, the seed still runs
    /// last-writer-wins against the retired value, so a seed stamped older
    /// than the key's history loses to it.
    pub fn get_or_create_at(
        &mut self,
        key: K,
        value: V,
        stamp: HybridTimestamp,
    ) -> &mut LWWRegister<V> {
        match self.entries.entry(key) {
            BTreeEntry::Vacant(vacant) => {
                self.counter += 1;
                let mut tags = BTreeSet::new();
                tags.insert((self.node, self.counter));
                let slot = vacant.insert(Slot {
                    tags,
                    register: LWWRegister::with_stamp(value, stamp),
                });
                &mut slot.register
            }
            BTreeEntry::Occupied(occupied) => {
                let slot = occupied.into_mut();
                if slot.tags.is_empty() {
                    self.counter += 1;
                    slot.tags.insert((self.node, self.counter));
                    slot.register.set_with_stamp(value, stamp);
                }
                &mut slot.register
            }
        }
    }

    /// Remove a key from the map.
    ///
    /// Retires only the creation tags this replica has observed, so a
    /// concurrent creation on another replica survives the merge.
    ///
    /// Returns `true` if the key was alive. Removing an absent or already
    /// removed key changes nothing.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.entries.get_mut(key) {
            Some(slot) if !slot.tags.is_empty() => {
                self.tombstones.extend(slot.tags.iter().copied());
                slot.tags.clear();
                true
            }
            _ => false,
        }
    }

    /// Remove every key this replica has observed.
    pub fn clear(&mut self) {
        for slot in self.entries.values_mut() {
            self.tombstones.extend(slot.tags.iter().copied());
            slot.tags.clear();
        }
    }

    /// Check if a key is alive.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .is_some_and(|slot| !slot.tags.is_empty())
    }

    /// Get the number of alive keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|slot| !slot.tags.is_empty())
            .count()
    }

    /// Check if the map has no alive keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the alive keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries
            .iter()
            .filter(|(_, slot)| !slot.tags.is_empty())
            .map(|(k, _)| k)
    }

    /// Get this replica's node id.
    #[must_use]
    pub fn node(&self) -> u16 {
        self.node
    }
}

impl<K: Ord + Clone, V: Clone> Crdt for ORMap<K, V> {
    fn merge(&mut self, other: &Self) {
        // Apply other's tombstones to our live tags
        for slot in self.entries.values_mut() {
            slot.tags.retain(|tag| !other.tombstones.contains(tag));
        }

        // Fold in other's entries: union live tags, join registers
        for (key, other_slot) in &other.entries {
            match self.entries.entry(key.clone()) {
                BTreeEntry::Vacant(vacant) => {
                    let mut slot = other_slot.clone();
                    slot.tags.retain(|tag| !self.tombstones.contains(tag));
                    vacant.insert(slot);
                }
                BTreeEntry::Occupied(occupied) => {
                    let slot = occupied.into_mut();
                    for tag in &other_slot.tags {
                        if !self.tombstones.contains(tag) {
                            slot.tags.insert(*tag);
                        }
                    }
                    // Registers join regardless of tag liveness; dropping a
                    // grave's contribution would make merge order-dependent.
                    slot.register.merge(&other_slot.register);
                }
            }
        }

        // Merge tombstones
        self.tombstones.extend(other.tombstones.iter().copied());

        // Update counter to be at least as high as the other
        self.counter = self.counter.max(other.counter);
    }
}
