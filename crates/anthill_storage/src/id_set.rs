//! Sparse membership index over the whole entity-id space.
//!
//! An [`EntityIdSet`] keeps a sorted list of 512-bit segments, each
//! covering an aligned window of ids with eight primary words and a
//! one-byte summary. Segments are created on first insert into their
//! window and discarded when they drain, so memory tracks the number of
//! occupied windows rather than the highest id ever seen. Two permanent
//! sentinel segments bound the list so the window search never falls off
//! either end.

use anthill_foundation::EntityId;

const PART_BITS: u32 = 64;
const PARTS_PER_SEGMENT: u32 = 8;
const SEGMENT_BITS: u32 = PART_BITS * PARTS_PER_SEGMENT;

#[derive(Clone)]
struct Segment {
    /// First id covered by this segment; aligned to `SEGMENT_BITS`.
    first: u32,
    parts: [u64; PARTS_PER_SEGMENT as usize],
    /// Bit k set iff part k is non-zero.
    part_bits: u8,
}

impl Segment {
    fn new(first: u32) -> Self {
        Self {
            first,
            parts: [0; PARTS_PER_SEGMENT as usize],
            part_bits: 0,
        }
    }

    fn covers(&self, value: u32) -> bool {
        value >= self.first && value - self.first < SEGMENT_BITS
    }
}

/// Sorted-segment bitset keyed by [`EntityId`].
pub struct EntityIdSet {
    segments: Vec<Segment>,
}

impl EntityIdSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        // Sentinels cover the lowest and highest windows of the id space.
        Self {
            segments: vec![
                Segment::new(0),
                Segment::new(EntityId::NIL.raw() - SEGMENT_BITS),
            ],
        }
    }

    /// Returns the number of segments, sentinels included.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Inserts an id.
    ///
    /// The id must not already be present (debug-asserted).
    pub fn insert(&mut self, id: EntityId) {
        debug_assert!(!id.is_nil());
        let value = id.raw();

        // Index of the first segment starting beyond the id; the segment
        // before it is the only candidate window.
        let upper = self.segments.partition_point(|segment| segment.first <= value);
        let mut index = upper - 1;
        if !self.segments[index].covers(value) {
            let first = value - value % SEGMENT_BITS;
            self.segments.insert(upper, Segment::new(first));
            index = upper;
        }

        let segment = &mut self.segments[index];
        let bit_in_segment = value - segment.first;
        let part = (bit_in_segment / PART_BITS) as usize;
        let bit = 1u64 << (bit_in_segment % PART_BITS);

        debug_assert_eq!(segment.parts[part] & bit, 0, "{id} is already present");
        segment.parts[part] |= bit;
        segment.part_bits |= 1 << part;
    }

    /// Removes an id.
    ///
    /// The id must be present (debug-asserted). A segment that drains is
    /// discarded unless it is one of the two sentinels.
    pub fn remove(&mut self, id: EntityId) {
        let value = id.raw();
        let upper = self.segments.partition_point(|segment| segment.first <= value);
        let index = upper - 1;
        let segment = &mut self.segments[index];
        debug_assert!(segment.covers(value), "{id} is not present");

        let bit_in_segment = value - segment.first;
        let part = (bit_in_segment / PART_BITS) as usize;
        let bit = 1u64 << (bit_in_segment % PART_BITS);

        debug_assert_ne!(segment.parts[part] & bit, 0, "{id} is not present");
        segment.parts[part] &= !bit;
        if segment.parts[part] != 0 {
            return;
        }

        segment.part_bits &= !(1 << part);
        if segment.part_bits == 0 && index != 0 && index != self.segments.len() - 1 {
            self.segments.remove(index);
        }
    }

    /// Returns true if the id is present.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        let value = id.raw();
        let upper = self.segments.partition_point(|segment| segment.first <= value);
        let segment = &self.segments[upper - 1];
        if !segment.covers(value) {
            return false;
        }

        let bit_in_segment = value - segment.first;
        let part = (bit_in_segment / PART_BITS) as usize;
        if segment.part_bits & (1 << part) == 0 {
            return false;
        }
        segment.parts[part] & (1u64 << (bit_in_segment % PART_BITS)) != 0
    }
}

impl Default for EntityIdSet {
    fn default() -> Self {
        Self::new()
    }
}
