//! [TagIndex]: the per-metric inverted bitmap index over tag key/value pairs.
//!
//! Nested hash tables keyed by owned strings (`tag_key -> tag_value ->
//! bitset`), grounded in the same shape the teacher crate uses for its own
//! bloom/bitmap adaptors (`bitmaps::Bloom`), but using a dense
//! [bit_vec::BitVec] instead of a roaring bitmap: column positions are dense
//! and contiguous, so a plain bit-vector is the simpler and cheaper fit the
//! design notes call for ("dense dynamic bit-vector keyed by column
//! position").

use std::collections::HashMap;

use bit_vec::BitVec;

use crate::Sample;

/// Inverted index: `tag_key -> tag_value -> bitset of column positions`.
///
/// Bit correspondence invariant: for every set bit `i` in
/// `index[key][value]`, `0 <= i < len(column)` and `column[i].tags[key] ==
/// value`. A sample with no tags contributes no bits but is still present
/// in the column.
#[derive(Debug, Default)]
pub struct TagIndex {
    index: HashMap<String, HashMap<String, BitVec>>,
}

impl TagIndex {
    pub fn new() -> TagIndex {
        TagIndex {
            index: HashMap::new(),
        }
    }

    /// Record that the sample at `pos` carries every `(key, value)` pair in
    /// `tags`. Grows the relevant bitsets to cover `pos` as needed.
    pub fn set(&mut self, pos: usize, tags: &std::collections::BTreeMap<String, String>) {
        for (key, value) in tags.iter() {
            let bitset = self
                .index
                .entry(key.clone())
                .or_default()
                .entry(value.clone())
                .or_insert_with(BitVec::new);
            if bitset.len() <= pos {
                bitset.grow(pos + 1 - bitset.len(), false);
            }
            bitset.set(pos, true);
        }
    }

    /// Look up the bitset for an exact `(key, value)` pair; `None` if the
    /// key or value was never seen.
    pub fn bitset(&self, key: &str, value: &str) -> Option<&BitVec> {
        self.index.get(key)?.get(value)
    }

    /// Clear every bitset, keeping allocated key/value slots (they will be
    /// repopulated by the retention sweep's rebuild walk).
    pub fn clear(&mut self) {
        for values in self.index.values_mut() {
            for bitset in values.values_mut() {
                bitset.clear();
            }
        }
    }

    /// Full rebuild from scratch: clear, then re-set bits by walking
    /// `samples` (already shifted down by the retention sweep).
    ///
    /// Eviction shifts every remaining position downward, invalidating all
    /// previously set bits; a full rebuild is no more expensive than an
    /// incremental shift and much simpler to reason about.
    pub fn rebuild(&mut self, samples: &[Sample]) {
        self.clear();
        for (pos, sample) in samples.iter().enumerate() {
            self.set(pos, &sample.tags);
        }
    }
}

/// Intersect `bitsets` (already looked up by the caller, one per filter) by
/// cloning the first and ANDing in the rest. Early-terminates (returns
/// `None`) as soon as the working set goes empty, or if any filter's
/// bitset was missing to begin with — both cases mean the conjunction is
/// unsatisfiable.
pub fn intersect<'a>(bitsets: impl IntoIterator<Item = Option<&'a BitVec>>) -> Option<BitVec> {
    let mut iter = bitsets.into_iter();
    let mut working = iter.next()??.clone();
    if !working.any() {
        return Some(working);
    }
    for next in iter {
        let next = next?;
        and_in_place(&mut working, next);
        if !working.any() {
            return Some(working);
        }
    }
    Some(working)
}

fn and_in_place(working: &mut BitVec, other: &BitVec) {
    let n = working.len().min(other.len());
    working.truncate(n);
    working.and(&bitvec_prefix(other, n));
}

fn bitvec_prefix(bv: &BitVec, n: usize) -> BitVec {
    let mut out = bv.clone();
    out.truncate(n);
    out
}

/// Enumerate set bit positions in `bitset` within the half-open range
/// `[lo, hi)`, ascending.
pub fn set_bits_in_range(bitset: &BitVec, lo: usize, hi: usize) -> Vec<usize> {
    let hi = hi.min(bitset.len());
    if lo >= hi {
        return Vec::new();
    }
    (lo..hi).filter(|&i| bitset.get(i).unwrap_or(false)).collect()
}

#[cfg(test)]
#[path = "bitmap_test.rs"]
mod bitmap_test;
