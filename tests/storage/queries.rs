//! Integration tests for multi-component queries
//!
//! Covers intersection correctness, input-order independence, duplicated
//! pools, and the smallest-pool-first cost bound.

use anthill_foundation::{EntityId, FastSet};
use anthill_storage::Store;

use crate::support::{store_abcd, type_a, type_b, type_c, type_d, CompA, CompB};

fn set_of(store: &Store, types: &[std::any::TypeId]) -> FastSet<EntityId> {
    store.query(types).collect()
}

// =============================================================================
// Intersection correctness
// =============================================================================

#[test]
fn queries_return_exact_intersections() {
    let mut store = store_abcd();

    let _e_a = store.create_entity_with(&[type_a()]);
    let _e_b = store.create_entity_with(&[type_b()]);
    let e_ab = store.create_entity_with(&[type_a(), type_b()]);
    let _e_bc = store.create_entity_with(&[type_b(), type_c()]);
    let e_abcd = store.create_entity_with(&[type_a(), type_b(), type_c(), type_d()]);

    let ab: FastSet<EntityId> = [e_ab, e_abcd].into_iter().collect();
    assert_eq!(set_of(&store, &[type_a(), type_b()]), ab);

    let all: FastSet<EntityId> = [e_abcd].into_iter().collect();
    assert_eq!(set_of(&store, &[type_a(), type_b(), type_c(), type_d()]), all);
    assert_eq!(set_of(&store, &[type_d()]), all);
}

#[test]
fn input_order_does_not_change_the_result() {
    let mut store = store_abcd();
    for index in 0..64 {
        let mut types = vec![type_a()];
        if index % 2 == 0 {
            types.push(type_b());
        }
        if index % 3 == 0 {
            types.push(type_c());
        }
        store.create_entity_with(&types);
    }

    let forward = set_of(&store, &[type_a(), type_b(), type_c()]);
    let backward = set_of(&store, &[type_c(), type_b(), type_a()]);
    let shuffled = set_of(&store, &[type_b(), type_c(), type_a()]);

    assert_eq!(forward, backward);
    assert_eq!(forward, shuffled);
    // Multiples of 6 hold all three.
    assert_eq!(forward.len(), 11);
}

#[test]
fn query_reflects_later_mutations() {
    let mut store = store_abcd();
    let id = store.create_entity_with(&[type_a()]);
    assert!(set_of(&store, &[type_a(), type_b()]).is_empty());

    store.add_component::<CompB>(id);
    assert_eq!(set_of(&store, &[type_a(), type_b()]).len(), 1);

    store.remove_component::<CompA>(id);
    assert!(set_of(&store, &[type_a(), type_b()]).is_empty());
}

// =============================================================================
// Degenerate pool sets
// =============================================================================

#[test]
fn single_pool_query_matches_for_each() {
    let mut store = store_abcd();
    for index in 0..32 {
        let types = if index % 4 == 0 {
            vec![type_a(), type_b()]
        } else {
            vec![type_a()]
        };
        store.create_entity_with(&types);
    }

    let mut walked = Vec::new();
    store.for_each(type_a(), |id| {
        walked.push(id);
        true
    });

    let queried: Vec<EntityId> = store.query(&[type_a()]).collect();
    assert_eq!(queried, walked);
}

#[test]
fn duplicated_pools_equal_the_deduplicated_query() {
    let mut store = store_abcd();
    for _ in 0..16 {
        store.create_entity_with(&[type_a()]);
    }
    store.create_entity();

    assert_eq!(
        set_of(&store, &[type_a(), type_a(), type_a()]),
        set_of(&store, &[type_a()])
    );
}

#[test]
fn empty_store_query_yields_nothing() {
    let store = store_abcd();
    assert!(set_of(&store, &[type_a(), type_b()]).is_empty());
    assert_eq!(store.query(&[]).count(), 0);
}

// =============================================================================
// Cost bound: the smallest pool drives iteration
// =============================================================================

#[test]
fn rare_component_bounds_the_candidate_count() {
    let mut store = store_abcd();

    let mut with_b = FastSet::default();
    for index in 0..10_000 {
        let id = store.create_entity_with(&[type_a()]);
        if index % 100 == 0 {
            store.add_component::<CompB>(id);
            with_b.insert(id);
        }
    }
    assert_eq!(with_b.len(), 100);

    let mut query = store.query(&[type_a(), type_b()]);
    let matched: FastSet<EntityId> = query.by_ref().collect();

    assert_eq!(matched, with_b);
    // Candidates were drawn from the B pool, never from the 10k A pool.
    assert!(query.candidates_examined() <= 100);
}
