//! Two-level occupancy bitmap covering one pool page.
//!
//! A [`PageBitmap`] stores one bit per page cell in primary words, plus a
//! summary word with one bit per primary word. A summary bit is set iff its
//! primary word is non-zero, so iteration skips dead words wholesale and
//! runs in time proportional to the number of live bits, not the page
//! capacity.

use crate::constants::{BITMAP_WORD_BITS, POOL_PAGE_CAPACITY};

const WORD_COUNT: usize = POOL_PAGE_CAPACITY / BITMAP_WORD_BITS;

// The u16 summary word caps the page at 16 primary words.
const _: () = assert!(WORD_COUNT <= u16::BITS as usize);

/// Fixed-capacity occupancy bitmap with a one-word summary level.
#[derive(Clone)]
pub struct PageBitmap {
    words: [u64; WORD_COUNT],
    summary: u16,
}

impl PageBitmap {
    /// Number of bits the bitmap covers.
    pub const CAPACITY: usize = POOL_PAGE_CAPACITY;

    /// Creates an empty bitmap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: [0; WORD_COUNT],
            summary: 0,
        }
    }

    /// Returns the bit at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        let (word, bit) = split(index);
        self.words[word] & bit != 0
    }

    /// Sets or clears the bit at `index`.
    ///
    /// The bit must actually change: setting a set bit or clearing a clear
    /// bit is a caller bug. The summary bit is written unconditionally on
    /// set; on clear it is dropped only once its primary word drains to
    /// zero.
    pub fn set(&mut self, index: usize, value: bool) {
        let (word_index, bit) = split(index);
        let word = &mut self.words[word_index];
        if value {
            debug_assert_eq!(*word & bit, 0, "bit {index} is already set");
            *word |= bit;
            self.summary |= 1 << word_index;
        } else {
            debug_assert_ne!(*word & bit, 0, "bit {index} is already clear");
            *word &= !bit;
            if *word == 0 {
                debug_assert_ne!(self.summary & (1 << word_index), 0);
                self.summary &= !(1 << word_index);
            }
        }
    }

    /// Returns true if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary == 0
    }

    /// Visits every set bit in ascending index order.
    ///
    /// Stops early when the callback returns `false`; the return value is
    /// `false` iff iteration was cut short.
    pub fn for_each_set<F>(&self, mut callback: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let mut summary = self.summary;
        while summary != 0 {
            let word_index = summary.trailing_zeros() as usize;
            summary &= summary - 1;
            let mut word = self.words[word_index];
            while word != 0 {
                let bit = word.trailing_zeros() as usize;
                word &= word - 1;
                if !callback(word_index * BITMAP_WORD_BITS + bit) {
                    return false;
                }
            }
        }
        true
    }

    /// Returns a stateful iterator over set bits, ascending.
    #[must_use]
    pub fn iter(&self) -> SetBits<'_> {
        SetBits {
            bitmap: self,
            summary: self.summary,
            word_index: 0,
            word: 0,
        }
    }
}

impl Default for PageBitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a PageBitmap {
    type Item = usize;
    type IntoIter = SetBits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn split(index: usize) -> (usize, u64) {
    assert!(index < POOL_PAGE_CAPACITY, "bit index {index} out of range");
    (index / BITMAP_WORD_BITS, 1 << (index % BITMAP_WORD_BITS))
}

/// Iterator over the set bits of a [`PageBitmap`], in ascending order.
pub struct SetBits<'a> {
    bitmap: &'a PageBitmap,
    summary: u16,
    word_index: usize,
    word: u64,
}

impl Iterator for SetBits<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.word != 0 {
                let bit = self.word.trailing_zeros() as usize;
                self.word &= self.word - 1;
                return Some(self.word_index * BITMAP_WORD_BITS + bit);
            }
            if self.summary == 0 {
                return None;
            }
            self.word_index = self.summary.trailing_zeros() as usize;
            self.summary &= self.summary - 1;
            self.word = self.bitmap.words[self.word_index];
        }
    }
}

impl std::iter::FusedIterator for SetBits<'_> {}
