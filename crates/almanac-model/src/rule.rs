// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::error::RuleRowError;
use almanac_core::math::interval::ClosedOpenInterval;
use num_traits::{PrimInt, Signed};

/// A raw almanac row: `destination_start source_start length`.
///
/// Rows are what the loader produces; they carry no guarantees until they
/// have been turned into a [`MappingRule`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RuleRow<T> {
    pub destination_start: T,
    pub source_start: T,
    pub length: T,
}

impl<T> RuleRow<T> {
    #[inline]
    pub const fn new(destination_start: T, source_start: T, length: T) -> Self {
        Self {
            destination_start,
            source_start,
            length,
        }
    }
}

impl<T> From<(T, T, T)> for RuleRow<T> {
    #[inline]
    fn from((destination_start, source_start, length): (T, T, T)) -> Self {
        Self::new(destination_start, source_start, length)
    }
}

/// A single translation rule: every value in `source` is moved by `offset`.
///
/// # Invariants
/// `source` is never empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MappingRule<T>
where
    T: PrimInt + Signed,
{
    source: ClosedOpenInterval<T>,
    offset: T,
}

impl<T> MappingRule<T>
where
    T: PrimInt + Signed,
{
    /// Creates a rule from a source interval and an offset.
    ///
    /// # Panics
    ///
    /// Panics if `source` is empty.
    #[inline]
    pub fn new(source: ClosedOpenInterval<T>, offset: T) -> Self {
        assert!(!source.is_empty(), "MappingRule: source interval is empty");
        Self { source, offset }
    }

    /// Builds a rule from a raw row, computing `offset = destination_start - source_start`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_model::rule::{MappingRule, RuleRow};
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// let rule = MappingRule::try_from_row(RuleRow::new(52_i64, 50, 48)).unwrap();
    /// assert_eq!(rule.source(), ClosedOpenInterval::new(50, 98));
    /// assert_eq!(rule.offset(), 2);
    /// ```
    pub fn try_from_row(row: RuleRow<T>) -> Result<Self, RuleRowError> {
        if row.length <= T::zero() {
            return Err(RuleRowError::NonPositiveLength);
        }
        let source = ClosedOpenInterval::from_start_len(row.source_start, row.length)
            .ok_or(RuleRowError::Overflow)?;
        let offset = row
            .destination_start
            .checked_sub(&row.source_start)
            .ok_or(RuleRowError::Overflow)?;
        // The image must be representable as well.
        source
            .checked_shift(offset)
            .ok_or(RuleRowError::Overflow)?;
        Ok(Self { source, offset })
    }

    #[inline]
    pub fn source(&self) -> ClosedOpenInterval<T> {
        self.source
    }

    #[inline]
    pub fn offset(&self) -> T {
        self.offset
    }

    /// Returns the image of the whole source interval, or `None` on overflow.
    #[inline]
    pub fn destination(&self) -> Option<ClosedOpenInterval<T>> {
        self.source.checked_shift(self.offset)
    }

    /// Returns `true` if the rule applies to `value`.
    #[inline]
    pub fn covers(&self, value: T) -> bool {
        self.source.contains_point(value)
    }

    /// Moves `value` by the offset, or returns `None` on overflow.
    ///
    /// The caller is expected to have checked [`MappingRule::covers`].
    #[inline]
    pub fn apply(&self, value: T) -> Option<T> {
        debug_assert!(self.covers(value));
        value.checked_add(&self.offset)
    }
}

impl<T> std::fmt::Display for MappingRule<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.offset < T::zero() {
            write!(f, "{} {}", self.source, self.offset)
        } else {
            write!(f, "{} +{}", self.source, self.offset)
        }
    }
}
