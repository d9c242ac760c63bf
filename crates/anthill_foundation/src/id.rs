//! Tagged identifier types for entities and component types.
//!
//! All three identifiers are plain integer newtypes with a reserved
//! all-ones sentinel meaning "none". They are deliberately distinct types:
//! an [`EntityId`] is a stable handle visible to clients, an
//! [`EntityIndex`] is a physical slot address inside the entity directory,
//! and a [`ComponentTypeId`] is a dense per-store index issued in
//! registration order.

use std::fmt;

/// Stable, client-visible entity handle.
///
/// Assigned by the entity directory. Ids are not indices: destroying an
/// entity frees its directory slot immediately, but its id is only reissued
/// after the whole 32-bit space has wrapped around.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// The reserved "no entity" sentinel.
    pub const NIL: Self = Self(u32::MAX);

    /// Creates an id from its raw value.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns true if this is the reserved sentinel.
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NIL
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "EntityId(nil)")
        } else {
            write!(f, "EntityId({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "Entity(nil)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}

/// Physical slot address inside the entity directory.
///
/// Never handed to clients; the directory maps [`EntityId`]s to indices and
/// back. The index decomposes into `(page, offset)` by the directory page
/// capacity.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityIndex(u32);

impl EntityIndex {
    /// The reserved "no slot" sentinel.
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates an index from its raw value.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns true if this is the reserved sentinel.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for EntityIndex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for EntityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "EntityIndex(invalid)")
        } else {
            write!(f, "EntityIndex({})", self.0)
        }
    }
}

/// Dense component-type index, issued in registration order.
///
/// Compact enough to key small per-type arrays and set encodings; the
/// store guarantees the ids of N registered types form `0..N`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentTypeId(u16);

impl ComponentTypeId {
    /// The reserved "no type" sentinel.
    pub const INVALID: Self = Self(u16::MAX);

    /// Creates a type id from its raw value.
    #[must_use]
    pub const fn from_raw(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns true if this is the reserved sentinel.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u16::MAX
    }
}

impl Default for ComponentTypeId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "ComponentTypeId(invalid)")
        } else {
            write!(f, "ComponentTypeId({})", self.0)
        }
    }
}
