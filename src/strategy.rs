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
//! Bucket indexing for the cuckoo filter.
//!
//! An element's 128-bit digest yields a primary bucket and a fingerprint.
//! The alternate bucket is the primary plus an odd offset derived from the
//! fingerprint alone, added for even indexes and subtracted for odd ones.
//! With an even bucket count the mapping flips index parity and is therefore
//! its own inverse, so either resident bucket recovers the other without the
//! original element. The Fan et al. construction XORs a fingerprint hash
//! instead, which forces power-of-two tables; the additive form admits any
//! even bucket count.

use crate::hash;
use crate::table::entry_mask;

/// Identifies how elements map to buckets and fingerprints.
///
/// The ordinal is recorded in the wire format; decoding a filter with an
/// unknown ordinal fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IndexingScheme {
    /// Murmur3 128-bit digest split into 32-bit sub-hashes, with the
    /// parity-signed additive alternate index.
    Murmur3Parity = 0,
}

impl IndexingScheme {
    pub(crate) fn ordinal(self) -> i8 {
        self as i8
    }

    pub(crate) fn from_ordinal(ordinal: i8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Murmur3Parity),
            _ => None,
        }
    }
}

/// Maps a 32-bit sub-hash onto a bucket index in `[0, num_buckets)`.
pub(crate) fn index(hash1: i32, num_buckets: u64) -> u64 {
    debug_assert!(num_buckets > 0 && num_buckets <= i64::MAX as u64);
    i64::from(hash1).rem_euclid(num_buckets as i64) as u64
}

/// Derives a non-zero fingerprint of `bits` bits from a 32-bit sub-hash.
///
/// Scans the hash in `bits`-wide windows from the least significant side and
/// returns the first non-zero window, or `1` when every window is zero.
pub(crate) fn fingerprint(hash2: i32, bits: u32) -> u32 {
    debug_assert!((1..=32).contains(&bits));
    let hash = hash2 as u32;
    let mask = entry_mask(bits);
    let mut bit = 0;
    while bit + bits <= 32 {
        let window = (hash >> bit) & mask;
        if window != 0 {
            return window;
        }
        bit += bits;
    }
    1
}

/// Maps a resident bucket and its fingerprint to the entry's other bucket.
///
/// `num_buckets` must be even, positive, and at most `i64::MAX`. For every
/// such table size, `alt_index(alt_index(i, fp, m), fp, m) == i`.
pub(crate) fn alt_index(index: u64, fingerprint: u32, num_buckets: u64) -> u64 {
    debug_assert!(
        num_buckets > 0 && num_buckets % 2 == 0 && num_buckets <= i64::MAX as u64
    );
    let offset = parsign(index) * odd(i64::from(hash::fingerprint_hash(fingerprint) as i32));
    let modulus = num_buckets as i64;
    protected_sum(index as i64, offset, modulus).rem_euclid(modulus) as u64
}

/// `+1` for an even index, `-1` for an odd index.
fn parsign(index: u64) -> i64 {
    1 - 2 * ((index & 1) as i64)
}

fn odd(value: i64) -> i64 {
    value | 1
}

/// Sum of `index` and `offset` with the same residue mod `modulus`, reducing
/// `index` by `modulus` first whenever the plain sum would overflow.
fn protected_sum(index: i64, offset: i64, modulus: i64) -> i64 {
    if can_sum(index, offset) {
        index + offset
    } else {
        protected_sum(index - modulus, offset, modulus)
    }
}

fn can_sum(a: i64, b: i64) -> bool {
    (a ^ b) < 0 || (a ^ a.wrapping_add(b)) >= 0
}
