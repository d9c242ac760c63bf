//! Paged, type-erased component pool.
//!
//! One pool holds every instance of one component type in fixed-size pages
//! of raw cells. A free cell stores the index of the next free cell in its
//! first four bytes, forming an intrusive free-list headed by
//! `first_free`; a live cell holds a constructed component. Each page
//! carries an occupancy bitmap and a metadata array recording which entity
//! owns each live cell.
//!
//! Pages are individually allocated and append-only: growing the pool never
//! moves existing cells, so a pointer obtained from [`ComponentPool::get`]
//! stays valid until its cell is freed or the pool is dropped.

// Cell indices are 32-bit by contract; page math happens in usize.
#![allow(clippy::cast_possible_truncation)]

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::ptr::NonNull;

use anthill_foundation::{ComponentDescriptor, EntityId};

use crate::bitmap::PageBitmap;
use crate::constants::POOL_PAGE_CAPACITY;

/// Absolute index of a cell across all pages of one pool.
pub type CellIndex = u32;

const LINK_LAYOUT: Layout = Layout::new::<CellIndex>();

struct PoolPage {
    cells: NonNull<u8>,
    occupancy: PageBitmap,
    metadata: Box<[EntityId; POOL_PAGE_CAPACITY]>,
}

/// Paged slab holding all instances of one component type.
pub struct ComponentPool {
    descriptor: ComponentDescriptor,
    cell_layout: Layout,
    page_layout: Layout,
    pages: Vec<PoolPage>,
    first_free: CellIndex,
    used_count: usize,
}

impl ComponentPool {
    /// Creates an empty pool for the described component type.
    ///
    /// The first page is allocated lazily by the first [`Self::alloc`].
    #[must_use]
    pub fn new(descriptor: ComponentDescriptor) -> Self {
        // Widen the cell so a vacant one can hold the free-list link, then
        // pad so consecutive cells stay aligned.
        let size = descriptor.size().max(LINK_LAYOUT.size());
        let align = descriptor.alignment().max(LINK_LAYOUT.align());
        let cell_layout = Layout::from_size_align(size, align)
            .expect("component layout exceeds the addressable range")
            .pad_to_align();
        let page_layout =
            Layout::from_size_align(cell_layout.size() * POOL_PAGE_CAPACITY, cell_layout.align())
                .expect("pool page layout exceeds the addressable range");

        Self {
            descriptor,
            cell_layout,
            page_layout,
            pages: Vec::new(),
            first_free: 0,
            used_count: 0,
        }
    }

    /// Returns the descriptor of the stored component type.
    #[must_use]
    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    /// Returns the number of live cells, O(1).
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used_count
    }

    /// Returns the number of allocated pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Allocates a cell for `entity_id` and default-constructs the
    /// component in it.
    ///
    /// Grows by exactly one page when every existing cell is live. Returns
    /// the absolute index of the new cell.
    pub fn alloc(&mut self, entity_id: EntityId) -> CellIndex {
        debug_assert!(!entity_id.is_nil());

        if self.first_free as usize / POOL_PAGE_CAPACITY == self.pages.len() {
            self.add_page();
        }

        let cell_index = self.first_free;
        let (page_index, offset) = self.decompose(cell_index);
        let cell = self.cell_ptr(page_index, offset);

        // Pop the free-list head before the constructor overwrites the link.
        self.first_free = unsafe { cell.cast::<CellIndex>().as_ptr().read() };
        unsafe { self.descriptor.default_construct_at(cell) };

        let page = &mut self.pages[page_index];
        page.metadata[offset] = entity_id;
        page.occupancy.set(offset, true);
        self.used_count += 1;

        cell_index
    }

    /// Destroys the component in `cell_index` and returns the cell to the
    /// free-list.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of range; freeing a cell that is not live
    /// is a caller bug (debug-asserted).
    pub fn free(&mut self, cell_index: CellIndex) {
        let (page_index, offset) = self.decompose(cell_index);
        debug_assert!(
            self.pages[page_index].occupancy.get(offset),
            "cell {cell_index} is not allocated"
        );

        let cell = self.cell_ptr(page_index, offset);
        unsafe {
            self.descriptor.drop_at(cell);
            cell.cast::<CellIndex>().as_ptr().write(self.first_free);
        }
        self.first_free = cell_index;

        let page = &mut self.pages[page_index];
        page.metadata[offset] = EntityId::NIL;
        page.occupancy.set(offset, false);
        self.used_count -= 1;
    }

    /// Returns the address of a cell.
    ///
    /// The pointer stays valid until the cell is freed or the pool is
    /// dropped; appending pages never invalidates it.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of range.
    #[must_use]
    pub fn get(&self, cell_index: CellIndex) -> NonNull<u8> {
        let (page_index, offset) = self.decompose(cell_index);
        self.cell_ptr(page_index, offset)
    }

    /// Returns the entity occupying a live cell, or [`EntityId::NIL`] for a
    /// vacant one.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of range.
    #[must_use]
    pub fn entity_at(&self, cell_index: CellIndex) -> EntityId {
        let (page_index, offset) = self.decompose(cell_index);
        self.pages[page_index].metadata[offset]
    }

    /// Visits the owner of every live cell in ascending cell order.
    ///
    /// Stops early when the callback returns `false`; the return value is
    /// `false` iff iteration was cut short. Pages with no live cells are
    /// skipped wholesale.
    pub fn for_each_live<F>(&self, mut callback: F) -> bool
    where
        F: FnMut(EntityId) -> bool,
    {
        for page in &self.pages {
            if page.occupancy.is_empty() {
                continue;
            }
            if !page.occupancy.for_each_set(|offset| callback(page.metadata[offset])) {
                return false;
            }
        }
        true
    }

    /// Returns an iterator over the owners of live cells, ascending by
    /// cell index.
    #[must_use]
    pub fn live_entities(&self) -> LiveEntities<'_> {
        LiveEntities {
            pages: self.pages.iter(),
            current: None,
        }
    }

    fn add_page(&mut self) {
        debug_assert_eq!(
            self.first_free as usize,
            self.pages.len() * POOL_PAGE_CAPACITY,
            "pool free-list is corrupt"
        );

        let raw = unsafe { alloc(self.page_layout) };
        let Some(cells) = NonNull::new(raw) else {
            handle_alloc_error(self.page_layout)
        };

        // Thread the fresh cells into the free-list: cell k links to the
        // next absolute index, the last one to one past the new page. The
        // head already addresses the page's first cell.
        let cell_size = self.cell_layout.size();
        let mut next = self.first_free;
        for offset in 0..POOL_PAGE_CAPACITY {
            next += 1;
            unsafe {
                cells
                    .as_ptr()
                    .add(offset * cell_size)
                    .cast::<CellIndex>()
                    .write(next);
            }
        }

        self.pages.push(PoolPage {
            cells,
            occupancy: PageBitmap::new(),
            metadata: Box::new([EntityId::NIL; POOL_PAGE_CAPACITY]),
        });
    }

    fn decompose(&self, cell_index: CellIndex) -> (usize, usize) {
        let page_index = cell_index as usize / POOL_PAGE_CAPACITY;
        assert!(
            page_index < self.pages.len(),
            "cell {cell_index} is out of range"
        );
        (page_index, cell_index as usize % POOL_PAGE_CAPACITY)
    }

    fn cell_ptr(&self, page_index: usize, offset: usize) -> NonNull<u8> {
        let page = &self.pages[page_index];
        // In-bounds: offset < POOL_PAGE_CAPACITY and the page buffer spans
        // POOL_PAGE_CAPACITY cells.
        unsafe {
            NonNull::new_unchecked(page.cells.as_ptr().add(offset * self.cell_layout.size()))
        }
    }
}

impl Drop for ComponentPool {
    fn drop(&mut self) {
        let cell_size = self.cell_layout.size();
        for page in &self.pages {
            page.occupancy.for_each_set(|offset| {
                let cell = unsafe {
                    NonNull::new_unchecked(page.cells.as_ptr().add(offset * cell_size))
                };
                unsafe { self.descriptor.drop_at(cell) };
                true
            });
            unsafe { dealloc(page.cells.as_ptr(), self.page_layout) };
        }
    }
}

/// Iterator over the owners of a pool's live cells, ascending by cell
/// index.
pub struct LiveEntities<'a> {
    pages: std::slice::Iter<'a, PoolPage>,
    current: Option<(&'a PoolPage, crate::bitmap::SetBits<'a>)>,
}

impl Iterator for LiveEntities<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        loop {
            if let Some((page, bits)) = self.current.as_mut() {
                if let Some(offset) = bits.next() {
                    return Some(page.metadata[offset]);
                }
                self.current = None;
            }
            let page = self.pages.next()?;
            if page.occupancy.is_empty() {
                continue;
            }
            self.current = Some((page, page.occupancy.iter()));
        }
    }
}

impl std::iter::FusedIterator for LiveEntities<'_> {}
