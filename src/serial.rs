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
//! Wire format for cuckoo filters.
//!
//! Big-endian stream: indexing-scheme ordinal (1 signed byte), requested
//! capacity (8 bytes), requested fpp (8-byte IEEE 754 double), entry count
//! (8 bytes), checksum (8 bytes), bucket count (8 bytes), entries per bucket
//! (4 bytes), bits per entry (4 bytes), word count (4 bytes), then the raw
//! table words (8 bytes each).
//!
//! The element encoder is not part of the stream. Decoding with an encoder
//! type other than the one that populated the filter yields a filter whose
//! answers are meaningless.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::cuckoo_filter::CuckooFilter;
use crate::encode::ElementEncoder;
use crate::strategy::IndexingScheme;
use crate::table::FingerprintTable;
use crate::FilterError;

impl<T: ?Sized, E: ElementEncoder<T>> CuckooFilter<T, E> {
    /// Writes the filter in its stable wire format.
    ///
    /// # Errors
    /// Propagates I/O errors from `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let table = self.table();
        out.write_i8(self.scheme().ordinal())?;
        out.write_u64::<BigEndian>(self.capacity())?;
        out.write_f64::<BigEndian>(self.fpp())?;
        out.write_u64::<BigEndian>(table.size())?;
        out.write_u64::<BigEndian>(table.checksum())?;
        out.write_u64::<BigEndian>(table.num_buckets())?;
        out.write_u32::<BigEndian>(table.entries_per_bucket())?;
        out.write_u32::<BigEndian>(table.bits_per_entry())?;
        out.write_u32::<BigEndian>(table.words().len() as u32)?;
        for &word in table.words() {
            out.write_u64::<BigEndian>(word)?;
        }
        Ok(())
    }

    /// Reads a filter written by [`CuckooFilter::write_to`].
    ///
    /// The decoded filter carries a freshly seeded eviction PRNG; its future
    /// insertion history replays like a newly built filter's.
    ///
    /// # Errors
    /// Returns [`FilterError::Deserialization`] when the stream ends early or
    /// any field is out of range.
    pub fn read_from<R: Read>(input: &mut R) -> Result<Self, FilterError> {
        let ordinal = input.read_i8()?;
        let scheme = IndexingScheme::from_ordinal(ordinal).ok_or_else(|| {
            FilterError::Deserialization(format!("unknown indexing scheme ordinal {ordinal}"))
        })?;
        let capacity = input.read_u64::<BigEndian>()?;
        let fpp = input.read_f64::<BigEndian>()?;
        let size = input.read_u64::<BigEndian>()?;
        let checksum = input.read_u64::<BigEndian>()?;
        let num_buckets = input.read_u64::<BigEndian>()?;
        let entries_per_bucket = input.read_u32::<BigEndian>()?;
        let bits_per_entry = input.read_u32::<BigEndian>()?;
        let word_len = input.read_u32::<BigEndian>()?;

        if capacity == 0 {
            return Err(FilterError::Deserialization(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if !fpp.is_finite() || fpp <= 0.0 || fpp >= 1.0 {
            return Err(FilterError::Deserialization(format!("fpp {fpp} out of range")));
        }
        let expected =
            FingerprintTable::word_count(num_buckets, entries_per_bucket, bits_per_entry)
                .map_err(|err| FilterError::Deserialization(err.to_string()))?;
        if word_len as usize != expected {
            return Err(FilterError::Deserialization(format!(
                "word count {word_len} does not match the table dimensions"
            )));
        }

        let mut words = vec![0_u64; expected];
        for word in &mut words {
            *word = input.read_u64::<BigEndian>()?;
        }
        let table = FingerprintTable::from_parts(
            words,
            size,
            checksum,
            num_buckets,
            entries_per_bucket,
            bits_per_entry,
        )
        .map_err(|err| FilterError::Deserialization(err.to_string()))?;
        Ok(Self::assemble(table, scheme, capacity, fpp, E::default()))
    }
}
