//! Anthill - Paged entity-component storage engine
//!
//! This crate re-exports all layers of the Anthill engine for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: anthill_engine     — System trait, App lifecycle
//! Layer 1: anthill_storage    — Bitmaps, pools, directory, store, queries
//! Layer 0: anthill_foundation — Identifiers, descriptors, collections
//! ```

pub use anthill_engine as engine;
pub use anthill_foundation as foundation;
pub use anthill_storage as storage;
