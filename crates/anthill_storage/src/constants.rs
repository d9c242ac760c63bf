//! Compile-time configuration of the storage layer.
//!
//! All three constants are powers of two so index decomposition compiles to
//! shifts and masks; the pool page capacity must additionally be a whole
//! number of bitmap words so occupancy bitmaps cover a page exactly.

/// Number of entity records per entity-directory page.
pub const DIRECTORY_PAGE_CAPACITY: usize = 1024;

/// Number of component cells per pool page.
pub const POOL_PAGE_CAPACITY: usize = 1024;

/// Width in bits of one occupancy-bitmap word.
pub const BITMAP_WORD_BITS: usize = 64;

const _: () = assert!(DIRECTORY_PAGE_CAPACITY.is_power_of_two());
const _: () = assert!(POOL_PAGE_CAPACITY.is_power_of_two());
const _: () = assert!(BITMAP_WORD_BITS.is_power_of_two());
const _: () = assert!(POOL_PAGE_CAPACITY % BITMAP_WORD_BITS == 0);
