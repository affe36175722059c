/// Core trait implemented by every replicated type in this crate.
///
/// A CRDT (Conflict-free Replicated Data Type) can be updated independently
/// on any number of replicas. When replicas exchange state and merge, they
/// are guaranteed to converge without coordination or consensus.
///
/// # Properties
///
/// All implementations must satisfy, over observable state:
/// - **Commutativity:** `a.merge(b) == b.merge(a)`
/// - **Associativity:** `a.merge(b.merge(c)) == a.merge(b).merge(c)`
/// - **Idempotency:** `a.merge(a) == a`
pub trait Crdt {
    /// Merge another replica's state into this one.
    ///
    /// After merging, `self` contains the least upper bound of both states.
    /// This operation is commutative, associative, and idempotent.
    fn merge(&mut self, other: &Self);
}
