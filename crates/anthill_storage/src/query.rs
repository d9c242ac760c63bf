//! Multi-component intersection iterator.
//!
//! A query enumerates the entities holding every component type in a
//! given set. The pools are sorted by population and the smallest one is
//! walked in storage order; every candidate is then probed against the
//! remaining pools through its own component map, an O(1) check per pool
//! that is independent of pool size. Total cost tracks the population of
//! the rarest component, not the product of the pools.

use std::any::TypeId;

use anthill_foundation::EntityId;

use crate::pool::{ComponentPool, LiveEntities};
use crate::store::Store;

/// Single-pass iterator over the intersection of several component pools.
///
/// Yields each matching entity exactly once, in the smallest pool's cell
/// order. Duplicate pools in the input are harmless: probing an entity's
/// own component map for a type it holds always succeeds, so duplicates
/// neither add nor drop results. Restart a query by constructing a new
/// iterator.
pub struct QueryIter<'a> {
    store: &'a Store,
    pools: Vec<&'a ComponentPool>,
    live: Option<LiveEntities<'a>>,
    candidates: usize,
}

impl<'a> QueryIter<'a> {
    pub(crate) fn new(store: &'a Store, types: &[TypeId]) -> Self {
        let mut pools: Vec<&ComponentPool> =
            types.iter().map(|&type_id| store.pool(type_id)).collect();
        pools.sort_by_key(|pool| pool.used_count());

        let live = pools.first().map(|pool| pool.live_entities());
        Self {
            store,
            pools,
            live,
            candidates: 0,
        }
    }

    /// Returns how many entities of the smallest pool have been examined
    /// so far.
    ///
    /// Bounded by the population of the rarest queried component; useful
    /// for asserting that a query did not degenerate into a full sweep.
    #[must_use]
    pub fn candidates_examined(&self) -> usize {
        self.candidates
    }
}

impl Iterator for QueryIter<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let live = self.live.as_mut()?;
        'candidates: while let Some(id) = live.next() {
            self.candidates += 1;
            // The smallest pool holds the component by construction; probe
            // the rest through the entity's own component map.
            for pool in &self.pools[1..] {
                if !self.store.has(id, pool.descriptor().type_id()) {
                    continue 'candidates;
                }
            }
            return Some(id);
        }
        None
    }
}

impl std::iter::FusedIterator for QueryIter<'_> {}
