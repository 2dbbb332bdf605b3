/// Core trait that all state-based CRDTs implement.
///
/// A CRDT (Conflict-free Replicated Data Type) guarantees that concurrent
/// updates on different replicas converge to the same state after merging,
/// without requiring coordination.
///
/// # Properties
///
/// All implementations must satisfy:
/// - **Commutativity:** `a.merged(&b) == b.merged(&a)`
/// - **Associativity:** `a.merged(&b.merged(&c)) == a.merged(&b).merged(&c)`
/// - **Idempotency:** `a.merged(&a) == a`
pub trait Crdt {
    /// Merge another replica's state into this one.
    ///
    /// After merging, `self` contains the least upper bound of both states.
    fn merge(&mut self, other: &Self);

    /// Return the merge of `self` and `other` as a new snapshot, leaving
    /// both inputs untouched.
    #[must_use]
    fn merged(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}
