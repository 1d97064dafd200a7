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
//! The 128-bit hash shared by the filter implementations.
//!
//! Murmur3 (x64 variant, seed 0) digests the encoder's byte stream. The
//! digest must stay identical across processes and versions for persisted
//! filters to interoperate; the indexing-scheme ordinal in the wire format
//! gates this.

use std::io::Cursor;

const SEED: u32 = 0;

/// Returns the 128-bit digest of `bytes`.
pub(crate) fn digest128(bytes: &[u8]) -> u128 {
    murmur3::murmur3_x64_128(&mut Cursor::new(bytes), SEED)
        .expect("reading from an in-memory slice cannot fail")
}

/// Returns the 32-bit hash of a fingerprint value, used to derive the
/// alternate-bucket offset. The fingerprint is digested as a 4-byte
/// little-endian integer.
pub(crate) fn fingerprint_hash(fingerprint: u32) -> u32 {
    digest128(&fingerprint.to_le_bytes()) as u32
}
