//! Type descriptors for type-erased component storage.
//!
//! A [`ComponentDescriptor`] bundles the four capabilities the storage
//! layer needs from a component type: its size, its alignment, a
//! default-constructor, and a destructor. Pools operate on raw bytes and
//! drive construction and teardown exclusively through descriptors, so the
//! storage layer never names a concrete component type.

use std::alloc::Layout;
use std::any::{self, TypeId};
use std::fmt;
use std::ptr::NonNull;

/// Marker trait for component types.
///
/// Any plain `Default + 'static` type qualifies; the default value is what
/// an attach operation constructs into the pool cell.
pub trait Component: Default + 'static {}

impl<T: Default + 'static> Component for T {}

/// Runtime description of a component type.
///
/// Two descriptors describe the same component type iff their [`TypeId`]s
/// are equal; all maps in the storage layer key on that identity. A
/// descriptor handed to a pool stays valid for the pool's whole lifetime.
#[derive(Copy, Clone)]
pub struct ComponentDescriptor {
    name: &'static str,
    type_id: TypeId,
    layout: Layout,
    default_construct: unsafe fn(NonNull<u8>),
    drop_in_place: unsafe fn(NonNull<u8>),
}

impl ComponentDescriptor {
    /// Derives the descriptor of a component type.
    #[must_use]
    pub fn of<C: Component>() -> Self {
        unsafe fn construct<C: Component>(target: NonNull<u8>) {
            unsafe { target.cast::<C>().as_ptr().write(C::default()) };
        }

        unsafe fn destroy<C: Component>(target: NonNull<u8>) {
            unsafe { target.cast::<C>().as_ptr().drop_in_place() };
        }

        Self {
            name: any::type_name::<C>(),
            type_id: TypeId::of::<C>(),
            layout: Layout::new::<C>(),
            default_construct: construct::<C>,
            drop_in_place: destroy::<C>,
        }
    }

    /// Returns the component type's name (diagnostics only).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the identity key of the described type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the memory layout of one component instance.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the instance size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Returns the instance alignment in bytes (a power of two).
    #[must_use]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// Default-constructs a component at `target`.
    ///
    /// # Safety
    ///
    /// `target` must point to writable memory of at least [`Self::size`]
    /// bytes, aligned to [`Self::alignment`], holding no live value of the
    /// described type.
    pub unsafe fn default_construct_at(&self, target: NonNull<u8>) {
        unsafe { (self.default_construct)(target) };
    }

    /// Destroys the component at `target`.
    ///
    /// # Safety
    ///
    /// `target` must point to a live, properly aligned value of the
    /// described type; the value must not be used afterwards.
    pub unsafe fn drop_at(&self, target: NonNull<u8>) {
        unsafe { (self.drop_in_place)(target) };
    }
}

impl PartialEq for ComponentDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentDescriptor {}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("size", &self.layout.size())
            .field("align", &self.layout.align())
            .finish()
    }
}
