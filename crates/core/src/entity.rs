//! Identity of stored records.

/// A record whose identity survives updates.
///
/// Stores key records by [`Entity::id`]; two values with equal ids are the same
/// record, possibly at different versions.
pub trait Entity {
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Same record, whatever the field values.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
