//! The store facade: pools, directory, and the operations tying them
//! together.
//!
//! Every operation starts here. Attach and detach run store → directory
//! (find the record) → pool (alloc/free the cell) → directory (update the
//! record's component map); queries run store → pool set → intersection
//! iterator. The typed methods are compile-time adapters over the
//! type-erased core: they derive the [`TypeId`] from the type parameter
//! and cast the cell pointer, nothing more.
//!
//! Contract violations — attaching a duplicate component, detaching a
//! missing one, touching an unregistered type or a dead entity — are
//! programmer bugs and panic.

use std::any::{type_name, TypeId};
use std::ptr::NonNull;

use anthill_foundation::{
    Component, ComponentDescriptor, ComponentTypeId, EntityId, FastMap,
};

use crate::directory::{ComponentRef, EntityDirectory, EntityRecord};
use crate::pool::ComponentPool;
use crate::query::QueryIter;

/// In-memory entity-component store.
///
/// Owns one [`ComponentPool`] per registered component type and the
/// [`EntityDirectory`]. Single-threaded: all operations complete
/// synchronously on the caller's thread.
pub struct Store {
    pools: FastMap<TypeId, ComponentPool>,
    type_ids: FastMap<TypeId, ComponentTypeId>,
    next_type_id: u16,
    directory: EntityDirectory,
}

impl Store {
    /// Creates an empty store with no registered component types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: FastMap::default(),
            type_ids: FastMap::default(),
            next_type_id: 0,
            directory: EntityDirectory::new(),
        }
    }

    // --- Registration ---

    /// Registers a component type, allocating its pool.
    ///
    /// Returns the dense [`ComponentTypeId`] assigned in registration
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if the type is already registered.
    pub fn register_component<C: Component>(&mut self) -> ComponentTypeId {
        self.register(ComponentDescriptor::of::<C>())
    }

    /// Type-erased form of [`Self::register_component`].
    ///
    /// # Panics
    ///
    /// Panics if the descriptor's type is already registered.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> ComponentTypeId {
        let type_id = descriptor.type_id();
        assert!(
            !self.pools.contains_key(&type_id),
            "component {} is already registered",
            descriptor.name()
        );

        let dense = ComponentTypeId::from_raw(self.next_type_id);
        debug_assert!(!dense.is_invalid());
        self.next_type_id += 1;

        self.pools.insert(type_id, ComponentPool::new(descriptor));
        self.type_ids.insert(type_id, dense);
        dense
    }

    /// Returns the number of registered component types.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.pools.len()
    }

    // --- Entities ---

    /// Creates an entity with no components.
    pub fn create_entity(&mut self) -> EntityId {
        self.directory.create_entity()
    }

    /// Creates an entity and attaches one default-constructed component of
    /// each listed type.
    ///
    /// # Panics
    ///
    /// Panics if any type is unregistered or listed twice.
    pub fn create_entity_with(&mut self, types: &[TypeId]) -> EntityId {
        let id = self.create_entity();
        for &type_id in types {
            self.add(id, type_id);
        }
        id
    }

    /// Returns true if `id` names a live entity.
    #[must_use]
    pub fn has_entity(&self, id: EntityId) -> bool {
        self.directory.has_entity(id)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.directory.len()
    }

    /// Destroys an entity, detaching all its components first.
    ///
    /// Component cells are freed before the directory slot is released.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live.
    pub fn destroy_entity(&mut self, id: EntityId) {
        let record = self.directory.record_mut(id);
        let attached: Vec<(TypeId, ComponentRef)> = record.components.drain().collect();
        for (type_id, component) in attached {
            let pool = self
                .pools
                .get_mut(&type_id)
                .expect("attached component references a registered pool");
            pool.free(component.cell);
        }
        self.directory.destroy_entity(id);
    }

    /// Returns the record of a live entity.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live.
    #[must_use]
    pub fn entity_record(&self, id: EntityId) -> &EntityRecord {
        self.directory.record(id)
    }

    // --- Components, type-erased surface ---

    /// Attaches a default-constructed component and returns its address.
    ///
    /// The pointer stays valid until the component is detached, the entity
    /// is destroyed, or the store is dropped.
    ///
    /// # Panics
    ///
    /// Panics if the type is unregistered, the entity is not live, or the
    /// entity already has the component.
    pub fn add(&mut self, id: EntityId, type_id: TypeId) -> NonNull<u8> {
        let pool = pool_mut(&mut self.pools, type_id);
        let record = self.directory.record_mut(id);
        assert!(
            !record.components.contains_key(&type_id),
            "{id} already has component {}",
            pool.descriptor().name()
        );

        let cell = pool.alloc(id);
        let ptr = pool.get(cell);
        record.components.insert(type_id, ComponentRef { cell, ptr });
        ptr
    }

    /// Attaches one component per listed type; batch form of
    /// [`Self::add`].
    ///
    /// Preconditions apply to each element independently; there is no
    /// all-or-none rollback.
    ///
    /// # Panics
    ///
    /// As [`Self::add`], per element.
    pub fn add_many(&mut self, id: EntityId, types: &[TypeId]) -> Vec<NonNull<u8>> {
        types.iter().map(|&type_id| self.add(id, type_id)).collect()
    }

    /// Detaches a component, destroying its value.
    ///
    /// # Panics
    ///
    /// Panics if the type is unregistered, the entity is not live, or the
    /// entity does not have the component.
    pub fn remove(&mut self, id: EntityId, type_id: TypeId) {
        let pool = pool_mut(&mut self.pools, type_id);
        let record = self.directory.record_mut(id);
        let Some(component) = record.components.remove(&type_id) else {
            panic!("{id} does not have component {}", pool.descriptor().name());
        };
        pool.free(component.cell);
    }

    /// Returns the address of an attached component.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not live or does not have the component.
    #[must_use]
    pub fn get_ptr(&self, id: EntityId, type_id: TypeId) -> NonNull<u8> {
        debug_assert!(self.pools.contains_key(&type_id), "component type is not registered");
        let record = self.directory.record(id);
        let Some(component) = record.component(type_id) else {
            panic!("{id} does not have the requested component");
        };
        component.ptr
    }

    /// Returns the addresses of several attached components; batch form of
    /// [`Self::get_ptr`].
    ///
    /// # Panics
    ///
    /// As [`Self::get_ptr`], per element.
    #[must_use]
    pub fn get_many(&self, id: EntityId, types: &[TypeId]) -> Vec<NonNull<u8>> {
        types.iter().map(|&type_id| self.get_ptr(id, type_id)).collect()
    }

    /// Returns true if the entity currently has the component type.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not live.
    #[must_use]
    pub fn has(&self, id: EntityId, type_id: TypeId) -> bool {
        debug_assert!(self.pools.contains_key(&type_id), "component type is not registered");
        self.directory.record(id).has(type_id)
    }

    // --- Components, typed adapters ---

    /// Attaches a default-constructed `C` and returns it.
    ///
    /// # Panics
    ///
    /// As [`Self::add`].
    pub fn add_component<C: Component>(&mut self, id: EntityId) -> &mut C {
        let ptr = self.add(id, TypeId::of::<C>());
        // The pool registered for C's TypeId only ever constructs C.
        unsafe { &mut *ptr.cast::<C>().as_ptr() }
    }

    /// Detaches a `C`, destroying its value.
    ///
    /// # Panics
    ///
    /// As [`Self::remove`].
    pub fn remove_component<C: Component>(&mut self, id: EntityId) {
        self.remove(id, TypeId::of::<C>());
    }

    /// Returns a shared reference to the entity's `C`.
    ///
    /// # Panics
    ///
    /// As [`Self::get_ptr`].
    #[must_use]
    pub fn get_component<C: Component>(&self, id: EntityId) -> &C {
        let ptr = self.get_ptr(id, TypeId::of::<C>());
        unsafe { &*ptr.cast::<C>().as_ptr() }
    }

    /// Returns an exclusive reference to the entity's `C`.
    ///
    /// # Panics
    ///
    /// As [`Self::get_ptr`].
    #[must_use]
    pub fn get_component_mut<C: Component>(&mut self, id: EntityId) -> &mut C {
        let ptr = self.get_ptr(id, TypeId::of::<C>());
        unsafe { &mut *ptr.cast::<C>().as_ptr() }
    }

    /// Returns true if the entity currently has a `C`.
    ///
    /// # Panics
    ///
    /// As [`Self::has`].
    #[must_use]
    pub fn has_component<C: Component>(&self, id: EntityId) -> bool {
        self.has(id, TypeId::of::<C>())
    }

    // --- Iteration ---

    /// Visits every entity that has the component type, in the pool's
    /// storage order. Stops early when the callback returns `false`.
    ///
    /// The store must not be mutated from the callback.
    ///
    /// # Panics
    ///
    /// Panics if the type is unregistered.
    pub fn for_each<F>(&self, type_id: TypeId, callback: F)
    where
        F: FnMut(EntityId) -> bool,
    {
        self.pool(type_id).for_each_live(callback);
    }

    /// Visits every entity that has all listed component types. Stops
    /// early when the callback returns `false`.
    ///
    /// # Panics
    ///
    /// Panics if any type is unregistered.
    pub fn for_each_multi<F>(&self, types: &[TypeId], mut callback: F)
    where
        F: FnMut(EntityId) -> bool,
    {
        for id in self.query(types) {
            if !callback(id) {
                break;
            }
        }
    }

    /// Returns an iterator over the entities holding all listed component
    /// types.
    ///
    /// Duplicate types are tolerated; an empty list yields nothing. The
    /// store must not be mutated while the iterator is alive (enforced by
    /// the borrow).
    ///
    /// # Panics
    ///
    /// Panics if any type is unregistered.
    #[must_use]
    pub fn query(&self, types: &[TypeId]) -> QueryIter<'_> {
        QueryIter::new(self, types)
    }

    // --- Escape hatches ---

    /// Returns the pool of a registered component type.
    ///
    /// # Panics
    ///
    /// Panics if the type is unregistered.
    #[must_use]
    pub fn pool(&self, type_id: TypeId) -> &ComponentPool {
        let Some(pool) = self.pools.get(&type_id) else {
            panic!("component type is not registered");
        };
        pool
    }

    /// Typed form of [`Self::pool`].
    ///
    /// # Panics
    ///
    /// Panics if `C` is unregistered.
    #[must_use]
    pub fn pool_of<C: Component>(&self) -> &ComponentPool {
        let Some(pool) = self.pools.get(&TypeId::of::<C>()) else {
            panic!("component {} is not registered", type_name::<C>());
        };
        pool
    }

    /// Returns the dense id assigned to a registered component type.
    ///
    /// # Panics
    ///
    /// Panics if the type is unregistered.
    #[must_use]
    pub fn component_type_id(&self, type_id: TypeId) -> ComponentTypeId {
        let Some(&dense) = self.type_ids.get(&type_id) else {
            panic!("component type is not registered");
        };
        dense
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn pool_mut(pools: &mut FastMap<TypeId, ComponentPool>, type_id: TypeId) -> &mut ComponentPool {
    let Some(pool) = pools.get_mut(&type_id) else {
        panic!("component type is not registered");
    };
    pool
}
