//! The system interface.

use anthill_storage::Store;

/// A unit of simulation logic driven by the [`App`](crate::App).
///
/// Systems run strictly in registration order, once per update, on the
/// caller's thread.
pub trait System {
    /// One-time setup, run before the first tick.
    fn initialize(&mut self, store: &mut Store) {
        let _ = store;
    }

    /// Advances the system by one tick.
    fn tick(&mut self, store: &mut Store);
}
