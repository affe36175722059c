//! Hybrid logical timestamps for causal ordering.
//!
//! A hybrid timestamp combines physical time with a logical counter:
//! - **Monotonic stamps** even when the physical clock stalls or goes backward
//! - **Total ordering** across replicas without vector clocks
//! - **Fixed size** (12 bytes) regardless of the number of replicas
//!
//! Every register in this crate carries its latest stamp, so there is no
//! clock object to thread through call sites. A local write derives its
//! stamp from the one it is replacing via [`HybridTimestamp::advance`],
//! which returns a strictly greater stamp (the one stamp without a
//! successor is the maximum representable one, which advances to itself).
//!
//! # Example
//!
//! ```
//! use register_map::clock::HybridTimestamp;
//!
//! let t1 = HybridTimestamp { physical: 5000, logical: 0, node_id: 1 };
//!
//! // Physical clock moved on: logical counter resets.
//! let t2 = t1.advance(6000, 1);
//! assert!(t2 > t1);
//! assert_eq!(t2.logical, 0);
//!
//! // Physical clock stalled: logical counter bumps instead.
//! let t3 = t2.advance(6000, 1);
//! assert!(t3 > t2);
//! assert_eq!(t3.logical, 1);
//! ```

use core::cmp;

/// A hybrid logical timestamp.
///
/// Consists of:
/// - `physical`: milliseconds since Unix epoch (or any monotonic source)
/// - `logical`: counter for events within the same physical millisecond
/// - `node_id`: tiebreaker to ensure total ordering across replicas
///
/// Ordering compares `physical`, then `logical`, then `node_id`, so two
/// stamps from different replicas never compare equal unless they are the
/// same stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HybridTimestamp {
    /// Physical time component (milliseconds).
    pub physical: u64,
    /// Logical counter for same-millisecond ordering.
    pub logical: u16,
    /// Replica identifier for deterministic tiebreaking.
    pub node_id: u16,
}

impl HybridTimestamp {
    /// Create a zero timestamp. Every real stamp compares greater.
    pub fn zero() -> Self {
        Self {
            physical: 0,
            logical: 0,
            node_id: 0,
        }
    }

    /// Derive the stamp for a write that supersedes this one.
    ///
    /// If the physical reading has moved past this stamp, the logical
    /// counter resets; otherwise the physical component is kept and the
    /// logical counter bumps. An exhausted counter carries into the
    /// physical component instead, so the result is strictly greater
    /// than `self` even if the physical clock stalled or went backward.
    /// The sole exception is the maximum representable stamp, which has
    /// no successor; advancing it yields the maximum again.
    #[must_use]
    pub fn advance(&self, physical: u64, node_id: u16) -> Self {
        if physical > self.physical {
            Self {
                physical,
                logical: 0,
                node_id,
            }
        } else if self.logical < u16::MAX {
            Self {
                physical: self.physical,
                logical: self.logical + 1,
                node_id,
            }
        } else if self.physical < u64::MAX {
            // Counter exhausted within one millisecond: borrow the next one.
            Self {
                physical: self.physical + 1,
                logical: 0,
                node_id,
            }
        } else {
            Self {
                physical: u64::MAX,
                logical: u16::MAX,
                node_id,
            }
        }
    }
}

impl Ord for HybridTimestamp {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.physical
            .cmp(&other.physical)
            .then(self.logical.cmp(&other.logical))
            .then(self.node_id.cmp(&other.node_id))
    }
}

impl PartialOrd for HybridTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "std")]
pub(crate) fn system_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
