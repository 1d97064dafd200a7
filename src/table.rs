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
//! Bit-packed fingerprint storage for the cuckoo filter.
//!
//! Entries of `bits_per_entry` bits are packed back to back into an array of
//! 64-bit words, so a single entry may straddle two adjacent words.

use crate::FilterError;

/// Reserved entry value marking an empty slot.
pub(crate) const EMPTY_ENTRY: u32 = 0;

/// Largest backing allocation, in 64-bit words.
const MAX_WORDS: u64 = 1 << 31;

/// Bucketed array of fingerprint entries packed into 64-bit words.
///
/// Tracks a running entry count and a running checksum (the wrapping sum of
/// all live entry values); both are persisted by the wire format.
#[derive(Clone, Debug)]
pub(crate) struct FingerprintTable {
    words: Vec<u64>,
    num_buckets: u64,
    entries_per_bucket: u32,
    bits_per_entry: u32,
    size: u64,
    checksum: u64,
}

impl FingerprintTable {
    /// Creates a zeroed table of `num_buckets` buckets with
    /// `entries_per_bucket` entries of `bits_per_entry` bits each.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidParameter`] when `num_buckets` is zero
    /// or odd, `entries_per_bucket` is not 2, 4, or 8, `bits_per_entry` is
    /// outside `[1, 32]`, or the backing array would exceed [`MAX_WORDS`].
    pub(crate) fn new(
        num_buckets: u64,
        entries_per_bucket: u32,
        bits_per_entry: u32,
    ) -> Result<Self, FilterError> {
        let words = Self::word_count(num_buckets, entries_per_bucket, bits_per_entry)?;
        Ok(Self {
            words: vec![0; words],
            num_buckets,
            entries_per_bucket,
            bits_per_entry,
            size: 0,
            checksum: 0,
        })
    }

    /// Reassembles a table from persisted parts.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidParameter`] under the same conditions as
    /// [`FingerprintTable::new`], when `words` has the wrong length for the
    /// dimensions, or when `size` exceeds the slot capacity.
    pub(crate) fn from_parts(
        words: Vec<u64>,
        size: u64,
        checksum: u64,
        num_buckets: u64,
        entries_per_bucket: u32,
        bits_per_entry: u32,
    ) -> Result<Self, FilterError> {
        let expected = Self::word_count(num_buckets, entries_per_bucket, bits_per_entry)?;
        if words.len() != expected {
            return Err(FilterError::InvalidParameter(
                "word count does not match the table dimensions",
            ));
        }
        if size > num_buckets * u64::from(entries_per_bucket) {
            return Err(FilterError::InvalidParameter(
                "entry count exceeds the slot capacity",
            ));
        }
        Ok(Self {
            words,
            num_buckets,
            entries_per_bucket,
            bits_per_entry,
            size,
            checksum,
        })
    }

    /// Number of 64-bit words needed for the given dimensions.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidParameter`] for out-of-range dimensions
    /// or a bit size that overflows 64 bits or exceeds [`MAX_WORDS`] words.
    pub(crate) fn word_count(
        num_buckets: u64,
        entries_per_bucket: u32,
        bits_per_entry: u32,
    ) -> Result<usize, FilterError> {
        if num_buckets == 0 || num_buckets % 2 != 0 {
            return Err(FilterError::InvalidParameter(
                "num_buckets must be positive and even",
            ));
        }
        if !matches!(entries_per_bucket, 2 | 4 | 8) {
            return Err(FilterError::InvalidParameter(
                "entries_per_bucket must be 2, 4, or 8",
            ));
        }
        if bits_per_entry == 0 || bits_per_entry > 32 {
            return Err(FilterError::InvalidParameter(
                "bits_per_entry must be in the inclusive range [1, 32]",
            ));
        }
        let bits = num_buckets
            .checked_mul(u64::from(entries_per_bucket))
            .and_then(|slots| slots.checked_mul(u64::from(bits_per_entry)))
            .ok_or(FilterError::InvalidParameter(
                "table bit size overflows 64 bits",
            ))?;
        let words = bits.div_ceil(64);
        if words > MAX_WORDS {
            return Err(FilterError::InvalidParameter(
                "table exceeds the maximum backing allocation",
            ));
        }
        Ok(words as usize)
    }

    pub(crate) fn num_buckets(&self) -> u64 {
        self.num_buckets
    }

    pub(crate) fn entries_per_bucket(&self) -> u32 {
        self.entries_per_bucket
    }

    pub(crate) fn bits_per_entry(&self) -> u32 {
        self.bits_per_entry
    }

    /// Number of live (non-empty) entries.
    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    /// Wrapping sum of all live entry values.
    pub(crate) fn checksum(&self) -> u64 {
        self.checksum
    }

    pub(crate) fn words(&self) -> &[u64] {
        &self.words
    }

    /// Total slot capacity.
    pub(crate) fn capacity(&self) -> u64 {
        self.num_buckets * u64::from(self.entries_per_bucket)
    }

    /// Ratio of live entries to slot capacity.
    pub(crate) fn load(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Expected false-positive probability at the current load.
    pub(crate) fn current_fpp(&self) -> f64 {
        let range = (2.0_f64).powi(self.bits_per_entry as i32);
        1.0 - ((range - 2.0) / (range - 1.0)).powf(2.0 * f64::from(self.entries_per_bucket) * self.load())
    }

    /// Returns `true` when `other` has identical dimensions.
    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        self.num_buckets == other.num_buckets
            && self.entries_per_bucket == other.entries_per_bucket
            && self.bits_per_entry == other.bits_per_entry
    }

    fn bit_offset(&self, bucket: u64, entry: u32) -> u64 {
        (bucket * u64::from(self.entries_per_bucket) + u64::from(entry))
            * u64::from(self.bits_per_entry)
    }

    /// Reads the entry at `(bucket, entry)`, zero-extended.
    pub(crate) fn read_entry(&self, bucket: u64, entry: u32) -> u32 {
        read_bits(&self.words, self.bit_offset(bucket, entry), self.bits_per_entry)
    }

    /// Overwrites the entry at `(bucket, entry)` and returns the prior value,
    /// keeping the entry count and checksum current.
    pub(crate) fn swap_entry(&mut self, value: u32, bucket: u64, entry: u32) -> u32 {
        let value = value & entry_mask(self.bits_per_entry);
        let offset = self.bit_offset(bucket, entry);
        let prior = write_bits(&mut self.words, offset, self.bits_per_entry, value);
        self.checksum = self
            .checksum
            .wrapping_add(u64::from(value))
            .wrapping_sub(u64::from(prior));
        if value == EMPTY_ENTRY && prior != EMPTY_ENTRY {
            self.size -= 1;
        } else if value != EMPTY_ENTRY && prior == EMPTY_ENTRY {
            self.size += 1;
        }
        prior
    }

    /// Index of the first entry in `bucket` equal to `value`, scanning in
    /// ascending order.
    pub(crate) fn find_entry(&self, value: u32, bucket: u64) -> Option<u32> {
        (0..self.entries_per_bucket).find(|&entry| self.read_entry(bucket, entry) == value)
    }

    /// Number of entries in `bucket` equal to `value`.
    pub(crate) fn count_entry(&self, value: u32, bucket: u64) -> u32 {
        (0..self.entries_per_bucket)
            .filter(|&entry| self.read_entry(bucket, entry) == value)
            .count() as u32
    }

    pub(crate) fn has_entry(&self, value: u32, bucket: u64) -> bool {
        self.find_entry(value, bucket).is_some()
    }

    /// Overwrites the first entry in `bucket` equal to `value_out` with
    /// `value_in`. Returns `false` when no entry matches.
    pub(crate) fn swap_first(&mut self, value_in: u32, value_out: u32, bucket: u64) -> bool {
        match self.find_entry(value_out, bucket) {
            Some(entry) => {
                self.swap_entry(value_in, bucket, entry);
                true
            }
            None => false,
        }
    }

    /// Empties every slot; keeps the allocation.
    pub(crate) fn clear(&mut self) {
        self.words.fill(0);
        self.size = 0;
        self.checksum = 0;
    }
}

/// Mask covering the low `bits` bits of an entry value.
pub(crate) fn entry_mask(bits: u32) -> u32 {
    if bits == 32 {
        u32::MAX
    } else {
        (1_u32 << bits) - 1
    }
}

/// Mask of `len` one bits starting at bit `start` of a 64-bit word.
fn mask(start: u32, len: u32) -> u64 {
    if len == 0 {
        0
    } else {
        (u64::MAX >> (64 - len)) << start
    }
}

/// Reads `len` contiguous bits starting at absolute bit `bit`, zero-extended.
///
/// A span may straddle two adjacent words. A straddle reaching past the end
/// of `words` reads the missing upper bits as zero.
pub(crate) fn read_bits(words: &[u64], bit: u64, len: u32) -> u32 {
    let start_lower = (bit % 64) as u32;
    let len_lower = len.min(64 - start_lower);
    let len_upper = len - len_lower;
    let lower = (words[(bit / 64) as usize] & mask(start_lower, len_lower)) >> start_lower;
    let index_upper = ((bit + u64::from(len)) / 64) as usize;
    let upper = if len_upper > 0 && index_upper < words.len() {
        (words[index_upper] & mask(0, len_upper)) << len_lower
    } else {
        0
    };
    (lower | upper) as u32
}

/// Replaces `len` bits at absolute bit `bit` with the low bits of `value`.
/// Returns the prior value.
pub(crate) fn write_bits(words: &mut [u64], bit: u64, len: u32, value: u32) -> u32 {
    let prior = read_bits(words, bit, len);
    let value = u64::from(value);
    let start_lower = (bit % 64) as u32;
    let len_lower = len.min(64 - start_lower);
    let len_upper = len - len_lower;
    let keep_lower = !(mask(0, len_lower) << start_lower);
    let index_lower = (bit / 64) as usize;
    words[index_lower] = (words[index_lower] & keep_lower) | ((value << start_lower) & !keep_lower);
    if len_upper > 0 {
        let index_upper = ((bit + u64::from(len) - 1) / 64) as usize;
        let keep_upper = mask(len_upper, 64 - len_upper);
        words[index_upper] =
            (words[index_upper] & keep_upper) | ((value >> len_lower) & !keep_upper);
    }
    prior
}
