//! Hash collections tuned for small integer keys.
//!
//! Every map in the engine is keyed by a compact identifier (an entity id,
//! a `TypeId`, a slot index). These aliases pin all of them to `ahash`,
//! which stays well distributed on dense integer keys where simpler
//! multiplicative hashes degrade.

/// Hash map used for all identifier-keyed lookups.
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

/// Hash set used for all identifier sets.
pub type FastSet<T> = ahash::AHashSet<T>;
