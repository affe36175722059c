use crate::clock::HybridTimestamp;
use crate::lww_register::LWWRegister;
use crate::or_map::ORMap;
use crate::Crdt;

/// A convergent map of single-value registers.
///
/// Presents ordinary map semantics over values while replicas update it
/// independently: key presence converges by observed-remove rules, the
/// value under a key converges by last-writer-wins. Every operation is a
/// total, in-memory function; an absent key is a normal outcome, not an
/// error.
///
/// Keys materialize lazily. A read never creates state; the first
/// [`set_value`](RegisterMap::set_value) for a key creates its register
/// atomically, and later writes overwrite that register in place so its
/// causal history carries forward.
///
/// # Example
///
/// ```
/// use register_map::prelude::*;
///
/// let mut map = RegisterMap::new(1);
///
/// map.set_value("theme", "dark");
/// assert_eq!(map.get_value(&"theme"), Some(&"dark"));
///
/// map.set_value("theme", "light");
/// assert_eq!(map.get_value(&"theme"), Some(&"light"));
///
/// map.remove(&"theme");
/// assert_eq!(map.get_value(&"theme"), None);
/// assert!(map.is_empty());
/// ```
///
/// # Conflict resolution
///
/// ```
/// use register_map::prelude::*;
///
/// let mut m1 = RegisterMap::new(1);
/// m1.set_value_at("k", 10, HybridTimestamp { physical: 100, logical: 0, node_id: 1 });
///
/// // Another replica writes the same key later
/// let mut m2 = RegisterMap::new(2);
/// m2.set_value_at("k", 20, HybridTimestamp { physical: 200, logical: 0, node_id: 2 });
///
/// m1.merge(&m2);
/// assert_eq!(m1.get_value(&"k"), Some(&20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterMap<K: Ord + Clone, V: Clone> {
    map: ORMap<K, V>,
}

impl<K: Ord + Clone, V: Clone> RegisterMap<K, V> {
    /// Create a new empty map for the given replica.
    pub fn new(node: u16) -> Self {
        Self {
            map: ORMap::new(node),
        }
    }

    /// Get the value under a key.
    ///
    /// Returns `None` for keys that were never set or have been removed.
    /// Never creates state.
    #[must_use]
    pub fn get_value(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(LWWRegister::value)
    }

    /// Set the value under a key, stamping it from the current system
    /// time.
    ///
    /// If the key is alive, its register is overwritten in place, so the
    /// write outranks everything the register has already observed. If
    /// not, a register seeded with `value` is created atomically.
    ///
    /// This method requires the `std` feature. In `no_std` environments,
    /// use [`RegisterMap::set_value_at`] instead.
    #[cfg(feature = "std")]
    pub fn set_value(&mut self, key: K, value: V) {
        let node = self.map.node();
        if let Some(register) = self.map.get_mut(&key) {
            register.set(value, node);
        } else {
            self.map.get_or_create(key, value);
        }
    }

    /// Set the value under a key with an explicit stamp.
    ///
    /// Like [`set_value`](RegisterMap::set_value), but the write carries
    /// `stamp` and is resolved against the key's history by
    /// last-writer-wins. Useful for testing and the only write path in
    /// `no_std` environments.
    pub fn set_value_at(&mut self, key: K, value: V, stamp: HybridTimestamp) {
        if let Some(register) = self.map.get_mut(&key) {
            register.set_with_stamp(value, stamp);
        } else {
            self.map.get_or_create_at(key, value, stamp);
        }
    }

    /// Remove a key.
    ///
    /// Removing an absent key changes nothing. A concurrent write to the
    /// same key on another replica survives the merge only if it created
    /// the key anew; an in-place overwrite of the instance this replica
    /// observed is removed with it.
    pub fn remove(&mut self, key: &K) {
        self.map.remove(key);
    }

    /// Remove every key this replica has observed.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Check if a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Get the number of present keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the map has no present keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the present keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Get the register under a key, if the key is present.
    ///
    /// Exposes the causal metadata behind a value, e.g. the stamp of the
    /// write that produced it.
    #[must_use]
    pub fn register(&self, key: &K) -> Option<&LWWRegister<V>> {
        self.map.get(key)
    }

    /// Get this replica's node id.
    #[must_use]
    pub fn node(&self) -> u16 {
        self.map.node()
    }
}

impl<K: Ord + Clone, V: Clone> Crdt for RegisterMap<K, V> {
    fn merge(&mut self, other: &Self) {
        self.map.merge(&other.map);
    }
}
