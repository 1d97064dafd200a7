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
//! Stable byte encodings of filter elements.
//!
//! Filters hash a byte stream instead of relying on `std::hash::Hash`, whose
//! output is not guaranteed to be stable between processes or versions.

/// Writes a stable byte representation of an element into a sink.
///
/// The encoder type is part of a filter's identity: filters interoperate
/// (merge, compare, exchange serialized bytes) only when built with the same
/// encoder type, and the produced encoding must never change for persisted
/// filters to stay readable.
pub trait ElementEncoder<T: ?Sized>: Default {
    /// Appends the byte form of `element` to `sink`.
    fn encode(&self, element: &T, sink: &mut Vec<u8>);
}

/// Encoder for byte-like and integer elements.
///
/// Byte-like types are fed through unchanged; integers are written in fixed
/// big-endian form. `usize` and `isize` have platform-dependent widths and
/// are not covered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultEncoder;

impl ElementEncoder<str> for DefaultEncoder {
    fn encode(&self, element: &str, sink: &mut Vec<u8>) {
        sink.extend_from_slice(element.as_bytes());
    }
}

impl ElementEncoder<String> for DefaultEncoder {
    fn encode(&self, element: &String, sink: &mut Vec<u8>) {
        sink.extend_from_slice(element.as_bytes());
    }
}

impl ElementEncoder<[u8]> for DefaultEncoder {
    fn encode(&self, element: &[u8], sink: &mut Vec<u8>) {
        sink.extend_from_slice(element);
    }
}

impl ElementEncoder<Vec<u8>> for DefaultEncoder {
    fn encode(&self, element: &Vec<u8>, sink: &mut Vec<u8>) {
        sink.extend_from_slice(element);
    }
}

macro_rules! encode_integer {
    ($($int:ty),* $(,)?) => {$(
        impl ElementEncoder<$int> for DefaultEncoder {
            fn encode(&self, element: &$int, sink: &mut Vec<u8>) {
                sink.extend_from_slice(&element.to_be_bytes());
            }
        }
    )*};
}

encode_integer!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);
