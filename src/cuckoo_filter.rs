// MIT License
//
// Copyright (c) 2026 Raja Lehtihet & Wael El Oraiby
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//
//! Cuckoo filter for approximate set membership with deletions.
//!
//! Compared to Bloom filters, cuckoo filters support deletion and multiset
//! operations (union, containment, subtraction) between filters of identical
//! shape, while keeping a compact bit-packed representation.

use core::fmt;
use std::marker::PhantomData;
use std::ptr;

use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::encode::{DefaultEncoder, ElementEncoder};
use crate::hash;
use crate::strategy::{self, IndexingScheme};
use crate::table::{FingerprintTable, EMPTY_ENTRY};
use crate::{Filter, FilterError};

/// Smallest supported false-positive probability, `2 * 8 / 2^64`.
pub const MIN_FPP: f64 = 16.0 / 18_446_744_073_709_551_616.0;

/// Largest supported false-positive probability.
pub const MAX_FPP: f64 = 0.99;

/// Bound on the relocation chain walked for one insertion.
const MAX_KICKS: u32 = 500;

/// Seed of the per-filter eviction PRNG; fixed so insertion histories replay
/// identically.
const KICKER_SEED: u64 = 1;

/// Approximate set-membership filter with deletion and multiset operations.
///
/// Elements are reduced to small fingerprints stored in one of two candidate
/// buckets; an insertion into a crowded pair of buckets relocates residents
/// along a bounded chain. A `false` from [`CuckooFilter::add`] means the
/// filter is saturated; the table is then exactly as it was before the call.
///
/// Removing an element that was never added can erase a colliding resident's
/// fingerprint, after which the filter may report false negatives. This state
/// is not detected; callers must keep removals paired with prior additions.
///
/// # Example
/// ```rust
/// use membership::cuckoo_filter::CuckooFilter;
///
/// let mut filter = CuckooFilter::<str>::new(10_000, 0.01).unwrap();
/// assert!(filter.add("alice"));
/// assert!(filter.contains("alice"));
/// assert!(filter.remove("alice"));
/// assert!(!filter.contains("alice"));
/// ```
pub struct CuckooFilter<T: ?Sized, E = DefaultEncoder> {
    table: FingerprintTable,
    scheme: IndexingScheme,
    capacity: u64,
    fpp: f64,
    kicker: XorShiftRng,
    encoder: E,
    marker: PhantomData<T>,
}

impl<T: ?Sized, E: ElementEncoder<T>> CuckooFilter<T, E> {
    /// Creates a filter dimensioned for `capacity` insertions at the target
    /// false-positive probability `fpp`.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidParameter`] when `capacity` is zero,
    /// `fpp` is outside `[MIN_FPP, MAX_FPP]`, or the dimensioned table would
    /// exceed the maximum backing allocation.
    pub fn new(capacity: u64, fpp: f64) -> Result<Self, FilterError> {
        Self::with_encoder(capacity, fpp, E::default())
    }

    /// Creates a filter that feeds elements through the given encoder value.
    ///
    /// # Errors
    /// Same conditions as [`CuckooFilter::new`].
    pub fn with_encoder(capacity: u64, fpp: f64, encoder: E) -> Result<Self, FilterError> {
        if capacity == 0 {
            return Err(FilterError::InvalidParameter(
                "capacity must be greater than zero",
            ));
        }
        if !fpp.is_finite() || fpp <= 0.0 || fpp >= 1.0 {
            return Err(FilterError::InvalidParameter(
                "fpp must be finite and strictly between 0 and 1",
            ));
        }
        if fpp < MIN_FPP {
            return Err(FilterError::InvalidParameter(
                "fpp is below the smallest supported probability",
            ));
        }
        if fpp > MAX_FPP {
            return Err(FilterError::InvalidParameter("fpp must not exceed 0.99"));
        }

        let entries_per_bucket = optimal_entries_per_bucket(fpp);
        let bits_per_entry = optimal_bits_per_entry(fpp, entries_per_bucket)?;
        let num_buckets = optimal_num_buckets(capacity, entries_per_bucket);
        let table = FingerprintTable::new(num_buckets, entries_per_bucket, bits_per_entry)?;
        Ok(Self::assemble(
            table,
            IndexingScheme::Murmur3Parity,
            capacity,
            fpp,
            encoder,
        ))
    }

    /// Adds one element.
    ///
    /// Returns `false` when the element could not be placed within the
    /// relocation bound; the table, entry count, and checksum are then
    /// bit-identical to their pre-call state. An element can be added
    /// repeatedly, up to twice the bucket width at once.
    pub fn add(&mut self, element: &T) -> bool {
        let (bucket, fingerprint) = self.index_and_fingerprint(element);
        let alt = strategy::alt_index(bucket, fingerprint, self.table.num_buckets());
        self.put_entry(fingerprint, bucket) || self.put_entry(fingerprint, alt)
    }

    /// Returns `true` if the element might have been added, `false` if it
    /// definitely was not.
    pub fn contains(&self, element: &T) -> bool {
        let (bucket, fingerprint) = self.index_and_fingerprint(element);
        if self.table.has_entry(fingerprint, bucket) {
            return true;
        }
        let alt = strategy::alt_index(bucket, fingerprint, self.table.num_buckets());
        self.table.has_entry(fingerprint, alt)
    }

    /// Removes one occurrence of the element; further copies stay in.
    ///
    /// Returns `false` when no matching fingerprint resides in either
    /// candidate bucket, which means the element was never added (or its
    /// additions were already removed). Removing an element that was never
    /// added can instead erase a colliding resident and cause false
    /// negatives later; see the type-level documentation.
    pub fn remove(&mut self, element: &T) -> bool {
        let (bucket, fingerprint) = self.index_and_fingerprint(element);
        if self.table.swap_first(EMPTY_ENTRY, fingerprint, bucket) {
            return true;
        }
        let alt = strategy::alt_index(bucket, fingerprint, self.table.num_buckets());
        self.table.swap_first(EMPTY_ENTRY, fingerprint, alt)
    }

    fn index_and_fingerprint(&self, element: &T) -> (u64, u32) {
        let mut bytes = Vec::new();
        self.encoder.encode(element, &mut bytes);
        let hash64 = hash::digest128(&bytes) as u64;
        let fingerprint =
            strategy::fingerprint((hash64 >> 32) as i32, self.table.bits_per_entry());
        let bucket = strategy::index(hash64 as i32, self.table.num_buckets());
        (bucket, fingerprint)
    }

    /// Places `fingerprint` in `bucket`, relocating residents if needed.
    fn put_entry(&mut self, fingerprint: u32, bucket: u64) -> bool {
        self.table.swap_first(fingerprint, EMPTY_ENTRY, bucket)
            || self.kick_entry(fingerprint, bucket, 0)
    }

    /// One frame of the relocation chain: claim a random slot of `bucket` and
    /// push the evicted resident toward its other bucket. A failed chain
    /// unwinds by swapping each evicted value back, so the table, entry
    /// count, and checksum end exactly as they started.
    fn kick_entry(&mut self, fingerprint: u32, bucket: u64, depth: u32) -> bool {
        if depth == MAX_KICKS {
            return false;
        }
        let entry = self.kicker.gen_range(0..self.table.entries_per_bucket());
        let evicted = self.table.swap_entry(fingerprint, bucket, entry);
        if evicted == EMPTY_ENTRY {
            return true;
        }
        let next = strategy::alt_index(bucket, evicted, self.table.num_buckets());
        if self.kick_entry(evicted, next, depth + 1) {
            true
        } else {
            let restored = self.table.swap_entry(evicted, bucket, entry);
            debug_assert_eq!(restored, fingerprint);
            false
        }
    }

    /// Multiset union: adds every fingerprint occurrence of `other` to this
    /// filter. `other` is not changed.
    ///
    /// Returns `Ok(false)` when some occurrence could not be placed; the
    /// occurrences placed before it stay in. Callers that need the union
    /// atomically can clone the receiver first.
    ///
    /// # Errors
    /// Returns [`FilterError::Incompatible`], before any mutation, unless
    /// [`CuckooFilter::is_compatible`] holds.
    pub fn merge(&mut self, other: &Self) -> Result<bool, FilterError> {
        self.check_compatible(other)?;
        let num_buckets = self.table.num_buckets();
        for bucket in 0..other.table.num_buckets() {
            for entry in 0..other.table.entries_per_bucket() {
                let fingerprint = other.table.read_entry(bucket, entry);
                if fingerprint == EMPTY_ENTRY {
                    continue;
                }
                let alt = strategy::alt_index(bucket, fingerprint, num_buckets);
                if !(self.put_entry(fingerprint, bucket) || self.put_entry(fingerprint, alt)) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Multiset containment: `true` when every fingerprint occurrence in
    /// `other` is matched by at least as many occurrences here. A filter is a
    /// superset of itself.
    ///
    /// # Errors
    /// Returns [`FilterError::Incompatible`] unless
    /// [`CuckooFilter::is_compatible`] holds.
    pub fn is_superset(&self, other: &Self) -> Result<bool, FilterError> {
        if ptr::eq(self, other) {
            return Ok(true);
        }
        self.check_compatible(other)?;
        let num_buckets = self.table.num_buckets();
        for bucket in 0..other.table.num_buckets() {
            for entry in 0..other.table.entries_per_bucket() {
                let fingerprint = other.table.read_entry(bucket, entry);
                if fingerprint == EMPTY_ENTRY {
                    continue;
                }
                let alt = strategy::alt_index(bucket, fingerprint, num_buckets);
                let ours = self.table.count_entry(fingerprint, bucket)
                    + self.table.count_entry(fingerprint, alt);
                let theirs = other.table.count_entry(fingerprint, bucket)
                    + other.table.count_entry(fingerprint, alt);
                if ours < theirs {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Multiset subtraction: removes one occurrence from this filter for
    /// every fingerprint occurrence in `other`.
    ///
    /// Returns `Ok(false)` when some occurrence has no match here; removals
    /// up to that point stand. Subtracting a filter whose elements were never
    /// added here can erase colliding residents and cause false negatives
    /// later.
    ///
    /// # Errors
    /// Returns [`FilterError::Incompatible`], before any mutation, unless
    /// [`CuckooFilter::is_compatible`] holds.
    pub fn subtract(&mut self, other: &Self) -> Result<bool, FilterError> {
        self.check_compatible(other)?;
        let num_buckets = self.table.num_buckets();
        for bucket in 0..other.table.num_buckets() {
            for entry in 0..other.table.entries_per_bucket() {
                let fingerprint = other.table.read_entry(bucket, entry);
                if fingerprint == EMPTY_ENTRY {
                    continue;
                }
                let alt = strategy::alt_index(bucket, fingerprint, num_buckets);
                if !(self.table.swap_first(EMPTY_ENTRY, fingerprint, bucket)
                    || self.table.swap_first(EMPTY_ENTRY, fingerprint, alt))
                {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn check_compatible(&self, other: &Self) -> Result<(), FilterError> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(FilterError::Incompatible(
                "filters must share dimensioning and indexing scheme",
            ))
        }
    }
}

impl<T: ?Sized, E> CuckooFilter<T, E> {
    pub(crate) fn assemble(
        table: FingerprintTable,
        scheme: IndexingScheme,
        capacity: u64,
        fpp: f64,
        encoder: E,
    ) -> Self {
        Self {
            table,
            scheme,
            capacity,
            fpp,
            kicker: XorShiftRng::seed_from_u64(KICKER_SEED),
            encoder,
            marker: PhantomData,
        }
    }

    pub(crate) fn table(&self) -> &FingerprintTable {
        &self.table
    }

    pub(crate) fn scheme(&self) -> IndexingScheme {
        self.scheme
    }

    /// Removes every entry; keeps the allocation.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Number of fingerprint entries currently held.
    pub fn len(&self) -> u64 {
        self.table.size()
    }

    /// Returns `true` when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Requested insertion capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Requested false-positive probability.
    pub fn fpp(&self) -> f64 {
        self.fpp
    }

    /// Expected false-positive probability at the current load.
    pub fn current_fpp(&self) -> f64 {
        self.table.current_fpp()
    }

    /// Returns `true` when `other` can participate in multiset operations
    /// with this filter: identical dimensioning and indexing scheme. A filter
    /// is not compatible with itself.
    pub fn is_compatible(&self, other: &Self) -> bool {
        !ptr::eq(self, other)
            && self.scheme == other.scheme
            && self.table.same_shape(&other.table)
    }

    /// Occurrence counts agree with `other` for every resident fingerprint.
    fn equivalent(&self, other: &Self) -> bool {
        let num_buckets = self.table.num_buckets();
        for bucket in 0..other.table.num_buckets() {
            for entry in 0..other.table.entries_per_bucket() {
                let fingerprint = other.table.read_entry(bucket, entry);
                if fingerprint == EMPTY_ENTRY {
                    continue;
                }
                let alt = strategy::alt_index(bucket, fingerprint, num_buckets);
                let ours = self.table.count_entry(fingerprint, bucket)
                    + self.table.count_entry(fingerprint, alt);
                let theirs = other.table.count_entry(fingerprint, bucket)
                    + other.table.count_entry(fingerprint, alt);
                if ours != theirs {
                    return false;
                }
            }
        }
        true
    }
}

impl<T: ?Sized, E: Clone> Clone for CuckooFilter<T, E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            scheme: self.scheme,
            capacity: self.capacity,
            fpp: self.fpp,
            kicker: self.kicker.clone(),
            encoder: self.encoder.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: ?Sized, E> PartialEq for CuckooFilter<T, E> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
            || (self.scheme == other.scheme
                && self.table.same_shape(&other.table)
                && self.table.size() == other.table.size()
                && self.table.checksum() == other.table.checksum()
                && self.equivalent(other))
    }
}

impl<T: ?Sized, E> fmt::Debug for CuckooFilter<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooFilter")
            .field("capacity", &self.capacity)
            .field("fpp", &self.fpp)
            .field("len", &self.table.size())
            .field("checksum", &self.table.checksum())
            .field("num_buckets", &self.table.num_buckets())
            .field("entries_per_bucket", &self.table.entries_per_bucket())
            .field("bits_per_entry", &self.table.bits_per_entry())
            .finish()
    }
}

impl<T: ?Sized, E: ElementEncoder<T>> Filter<T> for CuckooFilter<T, E> {
    fn add(&mut self, element: &T) -> bool {
        CuckooFilter::add(self, element)
    }

    fn contains(&self, element: &T) -> bool {
        CuckooFilter::contains(self, element)
    }

    fn remove(&mut self, element: &T) -> Result<bool, FilterError> {
        Ok(CuckooFilter::remove(self, element))
    }

    fn clear(&mut self) {
        CuckooFilter::clear(self);
    }

    fn len(&self) -> u64 {
        CuckooFilter::len(self)
    }

    fn capacity(&self) -> u64 {
        CuckooFilter::capacity(self)
    }

    fn fpp(&self) -> f64 {
        CuckooFilter::fpp(self)
    }

    fn current_fpp(&self) -> f64 {
        CuckooFilter::current_fpp(self)
    }

    fn is_compatible(&self, other: &Self) -> bool {
        CuckooFilter::is_compatible(self, other)
    }

    fn merge(&mut self, other: &Self) -> Result<bool, FilterError> {
        CuckooFilter::merge(self, other)
    }

    fn is_superset(&self, other: &Self) -> Result<bool, FilterError> {
        CuckooFilter::is_superset(self, other)
    }

    fn subtract(&mut self, other: &Self) -> Result<bool, FilterError> {
        CuckooFilter::subtract(self, other)
    }
}

/// Bucket width for a target false-positive probability, per the cuckoo
/// filter paper's occupancy analysis.
fn optimal_entries_per_bucket(fpp: f64) -> u32 {
    if fpp <= 0.00001 {
        8
    } else if fpp <= 0.002 {
        4
    } else {
        2
    }
}

/// Achievable load factor for a bucket width.
fn optimal_load_factor(entries_per_bucket: u32) -> f64 {
    match entries_per_bucket {
        2 => 0.84,
        4 => 0.955,
        _ => 0.98,
    }
}

/// Fingerprint width `f = log2(2b / fpp)`, rounded half-down.
fn optimal_bits_per_entry(fpp: f64, entries_per_bucket: u32) -> Result<u32, FilterError> {
    let bits = log2_half_down(2.0 * f64::from(entries_per_bucket) / fpp);
    if !(1..=32).contains(&bits) {
        return Err(FilterError::InvalidParameter(
            "fpp requires fingerprints wider than 32 bits",
        ));
    }
    Ok(bits as u32)
}

fn log2_half_down(value: f64) -> i32 {
    let floor = value.log2().floor() as i32;
    let midpoint = (f64::from(floor) + 0.5).exp2();
    if value > midpoint {
        floor + 1
    } else {
        floor
    }
}

/// Smallest even bucket count that holds `capacity` entries at the
/// achievable load factor.
fn optimal_num_buckets(capacity: u64, entries_per_bucket: u32) -> u64 {
    let load = optimal_load_factor(entries_per_bucket);
    let min_entries = (capacity as f64 / load).ceil() as u64;
    let buckets = min_entries.div_ceil(u64::from(entries_per_bucket));
    buckets.div_ceil(2) * 2
}

#[cfg(test)]
mod tests {
    use super::{
        optimal_bits_per_entry, optimal_entries_per_bucket, optimal_num_buckets, CuckooFilter,
        MIN_FPP,
    };
    use crate::{Filter, FilterError};

    fn string_filter(capacity: u64, fpp: f64) -> CuckooFilter<str> {
        CuckooFilter::new(capacity, fpp).unwrap()
    }

    #[test]
    fn constructor_validates_parameters() {
        assert!(CuckooFilter::<str>::new(0, 0.01).is_err());
        assert!(CuckooFilter::<str>::new(100, 0.0).is_err());
        assert!(CuckooFilter::<str>::new(100, 1.0).is_err());
        assert!(CuckooFilter::<str>::new(100, -0.5).is_err());
        assert!(CuckooFilter::<str>::new(100, f64::NAN).is_err());
        assert!(CuckooFilter::<str>::new(100, 0.995).is_err());
        assert!(CuckooFilter::<str>::new(100, MIN_FPP / 2.0).is_err());
        assert!(CuckooFilter::<str>::new(100, 0.01).is_ok());
    }

    #[test]
    fn constructor_rejects_oversized_tables() {
        assert!(CuckooFilter::<str>::new(20_000_000_000, 0.03).is_err());
    }

    #[test]
    fn dimensioning_follows_the_fpp_bands() {
        assert_eq!(optimal_entries_per_bucket(0.000_001), 8);
        assert_eq!(optimal_entries_per_bucket(0.000_01), 8);
        assert_eq!(optimal_entries_per_bucket(0.000_1), 4);
        assert_eq!(optimal_entries_per_bucket(0.002), 4);
        assert_eq!(optimal_entries_per_bucket(0.03), 2);
        assert_eq!(optimal_entries_per_bucket(0.9), 2);
    }

    #[test]
    fn fingerprint_width_rounds_half_down() {
        // log2(2*2/0.9) = 2.15 and log2(2*2/0.03) = 7.06 round to the floor;
        // log2(2*2/0.01) = 8.64 rounds up.
        assert_eq!(optimal_bits_per_entry(0.9, 2).unwrap(), 2);
        assert_eq!(optimal_bits_per_entry(0.03, 2).unwrap(), 7);
        assert_eq!(optimal_bits_per_entry(0.01, 2).unwrap(), 9);
        assert_eq!(optimal_bits_per_entry(0.032, 2).unwrap(), 7);
        assert!(optimal_bits_per_entry(MIN_FPP, 8).is_err());
    }

    #[test]
    fn bucket_counts_are_even_and_cover_the_load() {
        assert_eq!(optimal_num_buckets(1, 2), 2);
        assert_eq!(optimal_num_buckets(100, 2), 60);
        assert_eq!(optimal_num_buckets(1_000_000, 2), 595_240);
        // Dimensioning alone handles sizes past 2^31 buckets.
        assert!(optimal_num_buckets(6_000_000_000, 2) > u64::from(u32::MAX / 2));
        assert_eq!(optimal_num_buckets(6_000_000_000, 2) % 2, 0);
    }

    #[test]
    fn add_then_contains_then_remove_round_trip() {
        let mut filter = string_filter(1_000, 0.01);
        assert!(filter.add("alice"));
        assert!(filter.contains("alice"));
        assert_eq!(filter.len(), 1);
        assert!(filter.remove("alice"));
        assert!(!filter.contains("alice"));
        assert_eq!(filter.len(), 0);
        assert!(filter.table().words().iter().all(|&word| word == 0));
    }

    #[test]
    fn removed_elements_can_be_added_again() {
        let mut filter = string_filter(100, 0.03);
        assert!(filter.add("x"));
        assert!(filter.remove("x"));
        assert!(!filter.contains("x"));
        assert_eq!(filter.len(), 0);
        assert!(filter.add("x"));
        assert!(filter.contains("x"));
    }

    #[test]
    fn removing_an_absent_element_returns_false() {
        let mut filter = string_filter(100, 0.03);
        assert!(!filter.remove("ghost"));
        assert!(filter.add("present"));
        assert!(!filter.remove("ghost-2"));
        assert!(filter.contains("present"));
    }

    #[test]
    fn duplicate_additions_stack_and_unstack() {
        let mut filter = string_filter(1_000, 0.01);
        assert!(filter.add("dup"));
        assert!(filter.add("dup"));
        assert_eq!(filter.len(), 2);
        assert!(filter.remove("dup"));
        // One copy remains after removing one of two.
        assert!(filter.contains("dup"));
        assert!(filter.remove("dup"));
        assert!(!filter.contains("dup"));
    }

    #[test]
    fn saturated_add_fails_and_rolls_back() {
        // capacity 1 at fpp 0.9 dimensions to 2 buckets of 2 entries; any
        // element can reach all 4 slots, so 4 additions fill the table.
        let mut filter = string_filter(1, 0.9);
        for element in ["foo", "bar", "baz", "boz"] {
            assert!(filter.add(element), "{element}");
        }
        assert_eq!(filter.len(), 4);

        let words = filter.table().words().to_vec();
        let checksum = filter.table().checksum();
        let fpp = filter.current_fpp();
        assert!(!filter.add("bust"));
        assert_eq!(filter.table().words(), &words[..]);
        assert_eq!(filter.table().checksum(), checksum);
        assert_eq!(filter.len(), 4);
        assert_eq!(filter.current_fpp(), fpp);
    }

    #[test]
    fn eviction_chains_are_deterministic() {
        let mut first = string_filter(4, 0.9);
        let mut second = string_filter(4, 0.9);
        for value in 0..30_u32 {
            let element = format!("element-{value}");
            assert_eq!(first.add(&element[..]), second.add(&element[..]));
        }
        assert_eq!(first.table().words(), second.table().words());
        assert_eq!(first, second);
    }

    #[test]
    fn no_false_negatives_and_a_bounded_false_positive_rate() {
        let mut filter = string_filter(20_000, 0.03);
        for value in (0..32_000_u32).step_by(2) {
            assert!(filter.add(&value.to_string()[..]), "add {value}");
        }
        for value in (0..32_000_u32).step_by(2) {
            assert!(filter.contains(&value.to_string()[..]), "contains {value}");
        }

        let false_positives = (1..32_000_u32)
            .step_by(2)
            .filter(|value| filter.contains(&value.to_string()[..]))
            .count();
        let rate = false_positives as f64 / 16_000.0;
        assert!(rate < 0.06, "rate={rate}");
    }

    #[test]
    fn current_fpp_never_decreases_under_additions() {
        let mut filter = string_filter(8, 0.9);
        let mut last = filter.current_fpp();
        assert_eq!(last, 0.0);
        for value in 0..40_u32 {
            let before = filter.current_fpp();
            if filter.add(&value.to_string()[..]) {
                assert!(filter.current_fpp() >= before);
            } else {
                assert_eq!(filter.current_fpp(), before);
            }
            last = last.max(filter.current_fpp());
        }
        assert!(filter.current_fpp() <= 1.0 && last > 0.0);
    }

    #[test]
    fn clones_share_no_mutable_state() {
        let mut filter = string_filter(1_000, 0.01);
        filter.add("kept");
        let snapshot = filter.clone();
        filter.add("extra");
        assert!(snapshot.contains("kept"));
        assert!(!snapshot.contains("extra"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut first = string_filter(1_000, 0.01);
        let mut second = string_filter(1_000, 0.01);
        for element in ["a", "b", "c"] {
            assert!(first.add(element));
        }
        for element in ["c", "a", "b"] {
            assert!(second.add(element));
        }
        assert_eq!(first, second);

        second.add("d");
        assert_ne!(first, second);
    }

    #[test]
    fn compatibility_is_symmetric_and_transitive() {
        let a = string_filter(1_000, 0.01);
        let b = string_filter(1_000, 0.01);
        let c = string_filter(1_000, 0.01);
        assert!(a.is_compatible(&b) && b.is_compatible(&a));
        assert!(b.is_compatible(&c) && a.is_compatible(&c));
        assert!(!a.is_compatible(&a));

        // A different capacity dimensions to a different bucket count.
        let d = string_filter(5_000, 0.01);
        assert!(!a.is_compatible(&d) && !d.is_compatible(&a));
    }

    #[test]
    fn incompatible_peers_are_rejected_before_mutation() {
        let mut small = string_filter(100, 0.03);
        let mut big = string_filter(5_000, 0.03);
        small.add("x");
        big.add("y");
        let words = small.table().words().to_vec();

        assert_eq!(
            small.merge(&big),
            Err(FilterError::Incompatible(
                "filters must share dimensioning and indexing scheme"
            ))
        );
        assert!(small.subtract(&big).is_err());
        assert!(small.is_superset(&big).is_err());
        assert_eq!(small.table().words(), &words[..]);
        assert_eq!(small.len(), 1);
    }

    #[test]
    fn merge_unions_two_filters() {
        let mut left = string_filter(1_000, 0.01);
        let mut right = string_filter(1_000, 0.01);
        assert!(left.add("left-1") && left.add("left-2"));
        assert!(right.add("right-1") && right.add("right-2"));

        assert_eq!(left.merge(&right), Ok(true));
        for element in ["left-1", "left-2", "right-1", "right-2"] {
            assert!(left.contains(element));
        }
        assert_eq!(left.len(), 4);
        assert!(right.contains("right-1") && right.len() == 2);
    }

    #[test]
    fn merge_into_a_saturated_filter_reports_failure() {
        let mut full = string_filter(1, 0.9);
        for element in ["foo", "bar", "baz", "boz"] {
            assert!(full.add(element));
        }
        let mut donor = string_filter(1, 0.9);
        assert!(donor.add("extra"));
        assert_eq!(full.merge(&donor), Ok(false));
        assert_eq!(full.len(), 4);
    }

    #[test]
    fn superset_holds_after_merge() {
        let mut union = string_filter(1_000, 0.01);
        let mut part = string_filter(1_000, 0.01);
        assert!(part.add("shared-1") && part.add("shared-2"));
        assert!(union.add("own"));
        assert_eq!(union.merge(&part), Ok(true));

        assert_eq!(union.is_superset(&part), Ok(true));
        assert_eq!(part.is_superset(&union), Ok(false));
        assert_eq!(union.is_superset(&union), Ok(true));
    }

    #[test]
    fn subtract_removes_exactly_the_peer_occurrences() {
        let mut filter = string_filter(1_000, 0.01);
        let mut gone = string_filter(1_000, 0.01);
        assert!(filter.add("stays"));
        assert!(filter.add("goes"));
        assert!(gone.add("goes"));

        assert_eq!(filter.subtract(&gone), Ok(true));
        assert_eq!(filter.len(), 1);
        assert!(filter.contains("stays"));

        // A second subtraction finds nothing left to remove.
        assert_eq!(filter.subtract(&gone), Ok(false));
    }

    #[test]
    fn clear_empties_the_filter() {
        let mut filter = string_filter(1_000, 0.01);
        filter.add("a");
        filter.add("b");
        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.current_fpp(), 0.0);
        assert!(!filter.contains("a"));
        assert!(filter.add("a"));
    }

    #[test]
    fn capacity_and_fpp_report_the_request() {
        let filter = string_filter(1_234, 0.04);
        assert_eq!(filter.capacity(), 1_234);
        assert_eq!(filter.fpp(), 0.04);
    }

    #[test]
    fn collection_operations_follow_the_element_operations() {
        let mut filter: CuckooFilter<str> = CuckooFilter::new(1_000, 0.01).unwrap();
        assert!(filter.add_all(["a", "b", "c"]));
        assert!(filter.contains_all(["a", "b", "c"]));
        assert!(!filter.contains_all(["a", "zzz"]));
        assert_eq!(filter.remove_all(["a", "b"]), Ok(true));
        assert!(!filter.contains("a"));
        assert!(filter.contains("c"));
        assert_eq!(filter.remove_all(["c", "never-added"]), Ok(false));
    }

    #[test]
    fn integer_elements_use_the_big_endian_encoding() {
        let mut filter: CuckooFilter<u32> = CuckooFilter::new(1_000, 0.01).unwrap();
        for value in 0..100_u32 {
            assert!(filter.add(&value));
        }
        for value in 0..100_u32 {
            assert!(filter.contains(&value));
        }
        assert!(filter.remove(&17));
        assert!(!filter.contains(&17));
    }
}
