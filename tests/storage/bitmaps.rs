//! Integration tests for the page occupancy bitmap
//!
//! Tests the iteration contract shared by the callback and iterator forms.

use anthill_storage::{PageBitmap, POOL_PAGE_CAPACITY};

// =============================================================================
// Iteration contract
// =============================================================================

#[test]
fn both_iteration_forms_agree() {
    let mut bitmap = PageBitmap::new();
    let pattern = [0, 1, 63, 64, 127, 500, 1000, 1023];
    for index in pattern {
        bitmap.set(index, true);
    }

    let mut via_callback = Vec::new();
    let finished = bitmap.for_each_set(|index| {
        via_callback.push(index);
        true
    });

    assert!(finished);
    assert_eq!(via_callback, pattern);
    assert_eq!(bitmap.iter().collect::<Vec<_>>(), pattern);
}

#[test]
fn full_bitmap_iterates_every_index() {
    let mut bitmap = PageBitmap::new();
    for index in 0..POOL_PAGE_CAPACITY {
        bitmap.set(index, true);
    }

    let all: Vec<usize> = bitmap.iter().collect();
    assert_eq!(all.len(), POOL_PAGE_CAPACITY);
    assert_eq!(all, (0..POOL_PAGE_CAPACITY).collect::<Vec<_>>());
}

#[test]
fn sparse_high_bits_are_found() {
    let mut bitmap = PageBitmap::new();
    bitmap.set(POOL_PAGE_CAPACITY - 1, true);

    assert_eq!(
        bitmap.iter().collect::<Vec<_>>(),
        vec![POOL_PAGE_CAPACITY - 1]
    );
}

#[test]
fn early_exit_reports_interruption() {
    let mut bitmap = PageBitmap::new();
    bitmap.set(10, true);
    bitmap.set(20, true);

    let mut count = 0;
    let finished = bitmap.for_each_set(|_| {
        count += 1;
        false
    });
    assert!(!finished);
    assert_eq!(count, 1);
}

// =============================================================================
// Summary maintenance
// =============================================================================

#[test]
fn emptiness_tracks_the_last_bit() {
    let mut bitmap = PageBitmap::new();
    assert!(bitmap.is_empty());

    bitmap.set(777, true);
    assert!(!bitmap.is_empty());

    bitmap.set(777, false);
    assert!(bitmap.is_empty());
}

#[test]
fn draining_one_word_leaves_others_visible() {
    let mut bitmap = PageBitmap::new();
    // Two bits in word 2, one bit in word 9.
    bitmap.set(130, true);
    bitmap.set(140, true);
    bitmap.set(600, true);

    bitmap.set(130, false);
    bitmap.set(140, false);

    assert_eq!(bitmap.iter().collect::<Vec<_>>(), vec![600]);
    assert!(!bitmap.is_empty());
}
