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
//! Bloom filter peer of the cuckoo filter.
//!
//! A bit array probed by Kirsch-Mitzenmacher double hashing over the same
//! encoder and Murmur3 digest the cuckoo filter uses. Bits cannot be given
//! back, so element removal and the peer containment/subtraction operations
//! of the common contract signal [`FilterError::Unsupported`].

use core::fmt;
use std::marker::PhantomData;
use std::ptr;

use crate::encode::{DefaultEncoder, ElementEncoder};
use crate::hash;
use crate::{Filter, FilterError};

/// Probabilistic set-membership filter without deletion support.
///
/// # Example
/// ```rust
/// use membership::bloom_filter::BloomFilter;
///
/// let mut filter = BloomFilter::<str>::new(1_000, 0.01).unwrap();
/// filter.add("alice");
/// assert!(filter.contains("alice"));
/// ```
pub struct BloomFilter<T: ?Sized, E = DefaultEncoder> {
    words: Vec<u64>,
    bit_len: u64,
    num_hashes: u32,
    size: u64,
    capacity: u64,
    fpp: f64,
    encoder: E,
    marker: PhantomData<T>,
}

impl<T: ?Sized, E: ElementEncoder<T>> BloomFilter<T, E> {
    /// Creates a filter dimensioned for `capacity` insertions at the target
    /// false-positive probability `fpp`.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidParameter`] when `capacity` is zero,
    /// `fpp` is not strictly between 0 and 1, or the bit array would exceed
    /// the maximum backing allocation.
    pub fn new(capacity: u64, fpp: f64) -> Result<Self, FilterError> {
        Self::with_encoder(capacity, fpp, E::default())
    }

    /// Creates a filter that feeds elements through the given encoder value.
    ///
    /// # Errors
    /// Same conditions as [`BloomFilter::new`].
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

        let bit_len = optimal_bit_len(capacity, fpp);
        let word_len = bit_len.div_ceil(64);
        if word_len > 1 << 31 {
            return Err(FilterError::InvalidParameter(
                "bit array exceeds the maximum backing allocation",
            ));
        }
        Ok(Self {
            words: vec![0; word_len as usize],
            bit_len,
            num_hashes: optimal_num_hashes(bit_len, capacity),
            size: 0,
            capacity,
            fpp,
            encoder,
            marker: PhantomData,
        })
    }

    /// Adds one element. Always succeeds; a Bloom filter saturates by
    /// degrading its false-positive rate instead of rejecting additions.
    pub fn add(&mut self, element: &T) -> bool {
        let (first, second) = self.hash_pair(element);
        let mut probe = first;
        for _ in 0..self.num_hashes {
            self.set_bit(probe % self.bit_len);
            probe = probe.wrapping_add(second);
        }
        self.size = self.size.saturating_add(1);
        true
    }

    /// Returns `true` if the element might have been added, `false` if it
    /// definitely was not.
    pub fn contains(&self, element: &T) -> bool {
        let (first, second) = self.hash_pair(element);
        let mut probe = first;
        for _ in 0..self.num_hashes {
            if !self.is_bit_set(probe % self.bit_len) {
                return false;
            }
            probe = probe.wrapping_add(second);
        }
        true
    }

    /// Bitwise union of `other` into this filter.
    ///
    /// # Errors
    /// Returns [`FilterError::Incompatible`], before any mutation, unless
    /// [`BloomFilter::is_compatible`] holds.
    pub fn merge(&mut self, other: &Self) -> Result<bool, FilterError> {
        if !self.is_compatible(other) {
            return Err(FilterError::Incompatible(
                "filters must share bit length and hash count",
            ));
        }
        for (left, right) in self.words.iter_mut().zip(other.words.iter()) {
            *left |= *right;
        }
        self.size = self.size.saturating_add(other.size);
        Ok(true)
    }

    /// Two independent probe hashes from one digest of the element.
    fn hash_pair(&self, element: &T) -> (u64, u64) {
        let mut bytes = Vec::new();
        self.encoder.encode(element, &mut bytes);
        let digest = hash::digest128(&bytes);
        (digest as u64, ((digest >> 64) as u64) | 1)
    }

    fn set_bit(&mut self, bit: u64) {
        self.words[(bit / 64) as usize] |= 1 << (bit % 64);
    }

    fn is_bit_set(&self, bit: u64) -> bool {
        (self.words[(bit / 64) as usize] & (1 << (bit % 64))) != 0
    }
}

impl<T: ?Sized, E> BloomFilter<T, E> {
    /// Removes every element; keeps the allocation.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.size = 0;
    }

    /// Number of additions applied (a saturating counter).
    pub fn len(&self) -> u64 {
        self.size
    }

    /// Returns `true` when no element has been added.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Requested insertion capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Requested false-positive probability.
    pub fn fpp(&self) -> f64 {
        self.fpp
    }

    /// Estimated false-positive probability at the current addition count,
    /// `(1 - e^(-kn/m))^k`.
    pub fn current_fpp(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        let m = self.bit_len as f64;
        let k = f64::from(self.num_hashes);
        let n = self.size as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// Number of addressable bits.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Number of hash probes per element.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns `true` when `other` can be merged into this filter: identical
    /// bit length and probe count. A filter is not compatible with itself.
    pub fn is_compatible(&self, other: &Self) -> bool {
        !ptr::eq(self, other)
            && self.bit_len == other.bit_len
            && self.num_hashes == other.num_hashes
    }
}

impl<T: ?Sized, E: Clone> Clone for BloomFilter<T, E> {
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
            bit_len: self.bit_len,
            num_hashes: self.num_hashes,
            size: self.size,
            capacity: self.capacity,
            fpp: self.fpp,
            encoder: self.encoder.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: ?Sized, E> fmt::Debug for BloomFilter<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("capacity", &self.capacity)
            .field("fpp", &self.fpp)
            .field("len", &self.size)
            .field("bit_len", &self.bit_len)
            .field("num_hashes", &self.num_hashes)
            .finish()
    }
}

impl<T: ?Sized, E: ElementEncoder<T>> Filter<T> for BloomFilter<T, E> {
    fn add(&mut self, element: &T) -> bool {
        BloomFilter::add(self, element)
    }

    fn contains(&self, element: &T) -> bool {
        BloomFilter::contains(self, element)
    }

    fn clear(&mut self) {
        BloomFilter::clear(self);
    }

    fn len(&self) -> u64 {
        BloomFilter::len(self)
    }

    fn capacity(&self) -> u64 {
        BloomFilter::capacity(self)
    }

    fn fpp(&self) -> f64 {
        BloomFilter::fpp(self)
    }

    fn current_fpp(&self) -> f64 {
        BloomFilter::current_fpp(self)
    }

    fn is_compatible(&self, other: &Self) -> bool {
        BloomFilter::is_compatible(self, other)
    }

    fn merge(&mut self, other: &Self) -> Result<bool, FilterError> {
        BloomFilter::merge(self, other)
    }
}

/// Recommended bit length, `m = -n ln(p) / ln(2)^2`.
fn optimal_bit_len(capacity: u64, fpp: f64) -> u64 {
    let n = capacity as f64;
    let bits = (-n * fpp.ln() / std::f64::consts::LN_2.powi(2)).ceil() as u64;
    bits.max(1)
}

/// Recommended probe count, `k = (m / n) ln(2)`.
fn optimal_num_hashes(bit_len: u64, capacity: u64) -> u32 {
    let k = ((bit_len as f64 / capacity as f64) * std::f64::consts::LN_2).round() as u32;
    k.max(1)
}

#[cfg(test)]
mod tests {
    use super::BloomFilter;
    use crate::{Filter, FilterError};

    #[test]
    fn constructor_from_rate_creates_positive_shape() {
        let filter = BloomFilter::<str>::new(1_000, 0.01).unwrap();
        assert!(filter.bit_len() > 0);
        assert!(filter.num_hashes() > 0);
        assert_eq!(filter.capacity(), 1_000);
        assert_eq!(filter.fpp(), 0.01);
    }

    #[test]
    fn constructor_validates_parameters() {
        assert!(BloomFilter::<str>::new(0, 0.01).is_err());
        assert!(BloomFilter::<str>::new(100, 0.0).is_err());
        assert!(BloomFilter::<str>::new(100, 1.0).is_err());
        assert!(BloomFilter::<str>::new(100, f64::NAN).is_err());
    }

    #[test]
    fn inserted_elements_are_always_reported_present() {
        let mut filter = BloomFilter::<u64>::new(5_000, 0.01).unwrap();
        for value in 0..5_000_u64 {
            assert!(filter.add(&value));
        }
        for value in 0..5_000_u64 {
            assert!(filter.contains(&value));
        }
    }

    #[test]
    fn empirical_false_positive_rate_is_reasonable() {
        let mut filter = BloomFilter::<u64>::new(4_000, 0.01).unwrap();
        for value in 0..4_000_u64 {
            filter.add(&value);
        }

        let queries = 4_000_u64;
        let false_positives = (10_000..10_000 + queries)
            .filter(|value| filter.contains(value))
            .count();
        let rate = false_positives as f64 / queries as f64;
        assert!(rate <= 0.03, "rate={rate}");
    }

    #[test]
    fn clear_resets_filter_state() {
        let mut filter = BloomFilter::<str>::new(1_000, 0.01).unwrap();
        filter.add("k1");
        filter.add("k2");
        assert!(!filter.is_empty());

        filter.clear();

        assert!(filter.is_empty());
        assert_eq!(filter.len(), 0);
        assert!(!filter.contains("k1"));
        assert_eq!(filter.current_fpp(), 0.0);
    }

    #[test]
    fn merge_combines_two_filters() {
        let mut left = BloomFilter::<str>::new(2_000, 0.01).unwrap();
        let mut right = BloomFilter::<str>::new(2_000, 0.01).unwrap();
        left.add("left-only");
        right.add("right-only");

        assert_eq!(left.merge(&right), Ok(true));
        assert!(left.contains("left-only"));
        assert!(left.contains("right-only"));
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn merge_rejects_incompatible_filters() {
        let mut left = BloomFilter::<str>::new(1_000, 0.01).unwrap();
        let right = BloomFilter::<str>::new(50_000, 0.01).unwrap();
        assert!(matches!(
            left.merge(&right),
            Err(FilterError::Incompatible(_))
        ));
        assert!(!left.is_compatible(&left));
    }

    #[test]
    fn current_fpp_rises_with_additions() {
        let mut filter = BloomFilter::<u64>::new(1_000, 0.01).unwrap();
        let start = filter.current_fpp();
        for value in 0..1_000_u64 {
            filter.add(&value);
        }
        assert!(filter.current_fpp() > start);
        assert!(filter.current_fpp() < 1.0);
    }

    #[test]
    fn addition_counter_tracks_duplicates() {
        let mut filter = BloomFilter::<str>::new(100, 0.01).unwrap();
        filter.add("same");
        filter.add("same");
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn removal_operations_are_unsupported() {
        let mut filter = BloomFilter::<str>::new(100, 0.01).unwrap();
        filter.add("x");
        assert!(matches!(
            Filter::remove(&mut filter, "x"),
            Err(FilterError::Unsupported(_))
        ));
        assert!(matches!(
            filter.remove_all(["x"]),
            Err(FilterError::Unsupported(_))
        ));
    }

    #[test]
    fn peer_containment_and_subtraction_are_unsupported() {
        let mut left = BloomFilter::<str>::new(100, 0.01).unwrap();
        let right = BloomFilter::<str>::new(100, 0.01).unwrap();
        assert!(matches!(
            left.is_superset(&right),
            Err(FilterError::Unsupported(_))
        ));
        assert!(matches!(
            left.subtract(&right),
            Err(FilterError::Unsupported(_))
        ));
    }

    #[test]
    fn collection_operations_use_the_common_contract() {
        let mut filter = BloomFilter::<str>::new(1_000, 0.01).unwrap();
        assert!(filter.add_all(["a", "b"]));
        assert!(filter.contains_all(["a", "b"]));
        assert!(!filter.contains_all(["a", "nope"]));
    }
}
