use crate::clock::HybridTimestamp;
use crate::Crdt;

/// A last-writer-wins register (LWW-Register).
///
/// Holds exactly one value together with the hybrid stamp of the write that
/// produced it. Concurrent writes are resolved by keeping the value with
/// the greatest stamp; the stamp embeds the writer's node id, so the order
/// is total and every replica picks the same winner.
///
/// A register is born holding a value. There is no unset state, so reads
/// never fail.
///
/// # Example
///
/// ```
/// use register_map::prelude::*;
///
/// let mut r1 = LWWRegister::with_stamp(
///     "draft",
///     HybridTimestamp { physical: 100, logical: 0, node_id: 1 },
/// );
/// let r2 = LWWRegister::with_stamp(
///     "final",
///     HybridTimestamp { physical: 200, logical: 0, node_id: 2 },
/// );
///
/// r1.merge(&r2);
/// assert_eq!(*r1.value(), "final");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LWWRegister<V: Clone> {
    value: V,
    stamp: HybridTimestamp,
}

impl<V: Clone> LWWRegister<V> {
    /// Create a new register holding `value`.
    ///
    /// The stamp is taken from the current system time.
    ///
    /// This method requires the `std` feature. In `no_std` environments,
    /// use [`LWWRegister::with_stamp`] instead.
    #[cfg(feature = "std")]
    pub fn new(value: V, node_id: u16) -> Self {
        Self {
            value,
            stamp: HybridTimestamp {
                physical: crate::clock::system_time_ms(),
                logical: 0,
                node_id,
            },
        }
    }

    /// Create a new register holding `value` with an explicit stamp.
    ///
    /// Useful for testing or when you need deterministic behavior.
    /// This is the only constructor available in `no_std` environments.
    pub fn with_stamp(value: V, stamp: HybridTimestamp) -> Self {
        Self { value, stamp }
    }

    /// Overwrite the register's value.
    ///
    /// The new stamp is derived from the current one via
    /// [`HybridTimestamp::advance`], so a local overwrite always outranks
    /// every write this register has already observed, even if the system
    /// clock went backward.
    ///
    /// This method requires the `std` feature. In `no_std` environments,
    /// use [`LWWRegister::set_with_stamp`] instead.
    #[cfg(feature = "std")]
    pub fn set(&mut self, value: V, node_id: u16) {
        self.stamp = self.stamp.advance(crate::clock::system_time_ms(), node_id);
        self.value = value;
    }

    /// Overwrite the register's value with an explicit stamp.
    ///
    /// The write is applied only if `stamp` is not older than the current
    /// stamp. Callers providing their own stamps must not reuse one for
    /// two different writes on the same node.
    pub fn set_with_stamp(&mut self, value: V, stamp: HybridTimestamp) {
        if stamp >= self.stamp {
            self.value = value;
            self.stamp = stamp;
        }
    }

    /// Get the current value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Get the stamp of the write that produced the current value.
    #[must_use]
    pub fn stamp(&self) -> HybridTimestamp {
        self.stamp
    }
}

impl<V: Clone> Crdt for LWWRegister<V> {
    fn merge(&mut self, other: &Self) {
        if other.stamp > self.stamp {
            self.value = other.value.clone();
            self.stamp = other.stamp;
        }
    }
}
