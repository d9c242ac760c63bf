//! Application shell: one store, an ordered list of systems.

use anthill_storage::Store;

use crate::system::System;

/// Owns a [`Store`] and drives registered [`System`]s over it.
///
/// Systems initialize and tick in registration order; the store is handed
/// to each system exclusively, one at a time.
pub struct App {
    store: Store,
    systems: Vec<Box<dyn System>>,
}

impl App {
    /// Creates an app with an empty store and no systems.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Store::new(),
            systems: Vec::new(),
        }
    }

    /// Appends a system; it will run after every previously added one.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// Runs every system's `initialize`, in registration order.
    pub fn initialize(&mut self) {
        for system in &mut self.systems {
            system.initialize(&mut self.store);
        }
    }

    /// Runs every system's `tick`, in registration order.
    pub fn update(&mut self) {
        for system in &mut self.systems {
            system.tick(&mut self.store);
        }
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the store for mutation.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
