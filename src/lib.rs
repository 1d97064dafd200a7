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
//! Probabilistic membership filters with one-sided error.
//!
//! The crate currently exposes:
//! - [`cuckoo_filter::CuckooFilter`] for membership with deletions, multiset
//!   operations between filters of identical shape, and a stable wire format.
//! - [`bloom_filter::BloomFilter`] for plain membership checks.
//!
//! Both filters implement the common [`Filter`] trait and hash elements as a
//! byte stream produced by an [`ElementEncoder`], so answers and serialized
//! filters are reproducible across processes, platforms, and versions.

use core::fmt;

pub mod bloom_filter;
pub mod cuckoo_filter;
pub mod encode;

mod hash;
mod serial;
mod strategy;
mod table;

pub use crate::encode::{DefaultEncoder, ElementEncoder};

/// Errors returned by filter constructors, multiset operations, and the wire
/// codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Returned when a constructor receives an invalid argument.
    InvalidParameter(&'static str),
    /// Returned when a multiset operation is given a filter that is not
    /// shape-compatible with the receiver.
    Incompatible(&'static str),
    /// Returned when an optional operation is not provided by a filter.
    Unsupported(&'static str),
    /// Returned when decoding a serialized filter fails; carries the message
    /// of the underlying cause.
    Deserialization(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(message) => write!(f, "invalid parameter: {message}"),
            Self::Incompatible(message) => write!(f, "incompatible filters: {message}"),
            Self::Unsupported(message) => write!(f, "unsupported operation: {message}"),
            Self::Deserialization(message) => write!(f, "deserialization failed: {message}"),
        }
    }
}

impl std::error::Error for FilterError {}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}

/// Common contract of the membership filters in this crate.
///
/// A filter answers "was this element added?" with one-sided error: a `false`
/// from [`Filter::contains`] is always correct, a `true` may be wrong with
/// the filter's false-positive probability.
///
/// Removal and the peer containment/subtraction operations are optional;
/// implementations without them return [`FilterError::Unsupported`].
pub trait Filter<T: ?Sized> {
    /// Adds one element. Returns `false` when the filter is saturated and
    /// the element could not be placed.
    fn add(&mut self, element: &T) -> bool;

    /// Returns `true` if the element might have been added, `false` if it
    /// definitely was not.
    fn contains(&self, element: &T) -> bool;

    /// Removes one previously added occurrence of the element.
    ///
    /// Removing an element that was never added can silently erase a
    /// colliding resident and cause false negatives later.
    ///
    /// # Errors
    /// Returns [`FilterError::Unsupported`] when deletion is not provided.
    fn remove(&mut self, _element: &T) -> Result<bool, FilterError> {
        Err(FilterError::Unsupported("element removal"))
    }

    /// Removes every element; keeps the allocation.
    fn clear(&mut self);

    /// Number of elements currently represented.
    fn len(&self) -> u64;

    /// Returns `true` when no elements are represented.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Requested insertion capacity.
    fn capacity(&self) -> u64;

    /// Requested false-positive probability.
    fn fpp(&self) -> f64;

    /// Expected false-positive probability at the current load.
    fn current_fpp(&self) -> f64;

    /// Returns `true` when `other` can participate in multiset operations
    /// with this filter. A filter is not compatible with itself.
    fn is_compatible(&self, other: &Self) -> bool
    where
        Self: Sized;

    /// Multiset union: adds every element occurrence of `other` to this
    /// filter. `Ok(false)` means some occurrence could not be placed; the
    /// occurrences placed up to that point stay in.
    ///
    /// # Errors
    /// Returns [`FilterError::Incompatible`], before any mutation, when the
    /// filters are not compatible.
    fn merge(&mut self, other: &Self) -> Result<bool, FilterError>
    where
        Self: Sized;

    /// Multiset containment: `true` when every element occurrence in `other`
    /// is matched by an occurrence in this filter.
    ///
    /// # Errors
    /// Returns [`FilterError::Unsupported`] when not provided, or
    /// [`FilterError::Incompatible`] when the filters are not compatible.
    fn is_superset(&self, _other: &Self) -> Result<bool, FilterError>
    where
        Self: Sized,
    {
        Err(FilterError::Unsupported("peer containment test"))
    }

    /// Multiset subtraction: removes one occurrence from this filter for
    /// every element occurrence in `other`. `Ok(false)` means some occurrence
    /// had no match; removals up to that point stand.
    ///
    /// # Errors
    /// Returns [`FilterError::Unsupported`] when not provided, or
    /// [`FilterError::Incompatible`] when the filters are not compatible.
    fn subtract(&mut self, _other: &Self) -> Result<bool, FilterError>
    where
        Self: Sized,
    {
        Err(FilterError::Unsupported("peer subtraction"))
    }

    /// Adds every element of the collection, stopping at the first failure.
    /// Elements added before the failure stay in.
    fn add_all<'a, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        elements.into_iter().all(|element| self.add(element))
    }

    /// Returns `true` when every element of the collection might have been
    /// added.
    fn contains_all<'a, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        elements.into_iter().all(|element| self.contains(element))
    }

    /// Removes one occurrence of every element of the collection, stopping at
    /// the first element with no match. Removals up to that point stand.
    ///
    /// # Errors
    /// Returns [`FilterError::Unsupported`] when deletion is not provided.
    fn remove_all<'a, I>(&mut self, elements: I) -> Result<bool, FilterError>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for element in elements {
            if !self.remove(element)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
