//! Integration tests for the app shell
//!
//! Runs real systems over a store: a spawner, a mover, and a reaper
//! cooperating across ticks.

use std::any::TypeId;

use anthill_engine::{App, System};
use anthill_storage::Store;

#[derive(Default)]
struct Position {
    x: i64,
}

#[derive(Default)]
struct Lifetime {
    remaining: u32,
}

/// Registers the component types the other systems rely on.
struct Bootstrap;

impl System for Bootstrap {
    fn initialize(&mut self, store: &mut Store) {
        store.register_component::<Position>();
        store.register_component::<Lifetime>();
    }

    fn tick(&mut self, _store: &mut Store) {}
}

/// Spawns one short-lived entity per tick.
struct Spawner;

impl System for Spawner {
    fn tick(&mut self, store: &mut Store) {
        let id = store.create_entity_with(&[TypeId::of::<Position>(), TypeId::of::<Lifetime>()]);
        store.get_component_mut::<Lifetime>(id).remaining = 3;
    }
}

/// Advances every positioned entity.
struct Mover;

impl System for Mover {
    fn tick(&mut self, store: &mut Store) {
        let mut moved = Vec::new();
        store.for_each(TypeId::of::<Position>(), |id| {
            moved.push(id);
            true
        });
        for id in moved {
            store.get_component_mut::<Position>(id).x += 1;
        }
    }
}

/// Destroys entities whose lifetime ran out.
struct Reaper;

impl System for Reaper {
    fn tick(&mut self, store: &mut Store) {
        let mut expired = Vec::new();
        store.for_each(TypeId::of::<Lifetime>(), |id| {
            expired.push(id);
            true
        });
        for id in expired {
            let lifetime = store.get_component_mut::<Lifetime>(id);
            if lifetime.remaining == 0 {
                store.destroy_entity(id);
            } else {
                lifetime.remaining -= 1;
            }
        }
    }
}

fn simulation() -> App {
    let mut app = App::new();
    app.add_system(Box::new(Bootstrap));
    app.add_system(Box::new(Spawner));
    app.add_system(Box::new(Mover));
    app.add_system(Box::new(Reaper));
    app.initialize();
    app
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn initialize_runs_before_any_tick() {
    let app = simulation();
    assert_eq!(app.store().registered_count(), 2);
    assert_eq!(app.store().entity_count(), 0);
    assert_eq!(app.system_count(), 4);
}

#[test]
fn population_reaches_a_steady_state() {
    let mut app = simulation();

    // An entity survives the tick it spawned in plus two more before the
    // reaper collects it, so one spawn per tick plateaus at three.
    for _ in 0..20 {
        app.update();
    }
    assert_eq!(app.store().entity_count(), 3);
}

#[test]
fn systems_compose_over_shared_components() {
    let mut app = simulation();
    app.update();
    app.update();

    // The entity spawned on the first tick has been moved twice.
    let mut positions = Vec::new();
    app.store().for_each(TypeId::of::<Position>(), |id| {
        positions.push(app.store().get_component::<Position>(id).x);
        true
    });

    positions.sort_unstable();
    assert_eq!(positions, vec![1, 2]);
}

#[test]
fn manual_store_access_composes_with_systems() {
    let mut app = simulation();

    let pinned = app
        .store_mut()
        .create_entity_with(&[TypeId::of::<Position>()]);
    for _ in 0..10 {
        app.update();
    }

    // No Lifetime, so the reaper never touches it; the mover does.
    assert!(app.store().has_entity(pinned));
    assert_eq!(app.store().get_component::<Position>(pinned).x, 10);
}
