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

use num_traits::PrimInt;
use smallvec::{SmallVec, smallvec};
use std::cmp::{max, min};

/// A half-open interval `[start, end)` defined by a start (inclusive) and end (exclusive).
///
/// Every stage of the almanac pipeline reasons about contiguous blocks of
/// integers through this type: rule sources, pending work items and
/// translated images are all `ClosedOpenInterval`s. Keeping the upper bound
/// exclusive means that splitting `[a, c)` at `b` yields `[a, b)` and
/// `[b, c)` with no fencepost arithmetic.
///
/// # Invariants
/// `start_inclusive` must always be less than or equal to `end_exclusive`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedOpenInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// let iv = ClosedOpenInterval::new(0, 10);
    /// assert_eq!(iv.len(), 10);
    /// ```
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates a new `ClosedOpenInterval` if the inputs are valid.
    ///
    /// Returns `None` if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// assert!(ClosedOpenInterval::try_new(0, 10).is_some());
    /// assert!(ClosedOpenInterval::try_new(10, 0).is_none());
    /// ```
    #[inline]
    pub fn try_new(start_inclusive: T, end_exclusive: T) -> Option<Self> {
        if start_inclusive <= end_exclusive {
            Some(Self {
                start_inclusive,
                end_exclusive,
            })
        } else {
            None
        }
    }

    /// Creates a new `ClosedOpenInterval` without checking invariants in release builds.
    ///
    /// The caller must ensure `start_inclusive <= end_exclusive`.
    #[inline]
    pub fn new_unchecked(start_inclusive: T, end_exclusive: T) -> Self {
        debug_assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates the interval `[start, start + len)`.
    ///
    /// Returns `None` if `len` is negative or `start + len` overflows `T`.
    /// This is how almanac rows and seed pairs, which are given as a start
    /// and a length, become intervals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// assert_eq!(
    ///     ClosedOpenInterval::from_start_len(79, 14),
    ///     Some(ClosedOpenInterval::new(79, 93))
    /// );
    /// assert_eq!(ClosedOpenInterval::from_start_len(0, -1), None);
    /// assert_eq!(ClosedOpenInterval::from_start_len(i64::MAX, 1), None);
    /// ```
    #[inline]
    pub fn from_start_len(start: T, len: T) -> Option<Self> {
        if len < T::zero() {
            return None;
        }
        let end = start.checked_add(&len)?;
        Some(Self::new_unchecked(start, end))
    }

    /// Returns the inclusive start bound of the interval.
    #[inline]
    pub const fn start(&self) -> T {
        self.start_inclusive
    }

    /// Returns the exclusive end bound of the interval.
    #[inline]
    pub const fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns `true` if this interval overlaps with `other`.
    ///
    /// Intervals that merely touch do not overlap.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// let a = ClosedOpenInterval::new(0, 10);
    /// assert!(a.intersects(ClosedOpenInterval::new(5, 15)));
    /// assert!(!a.intersects(ClosedOpenInterval::new(10, 20)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    /// Returns `true` if the intervals share a boundary but do not overlap.
    #[inline]
    pub fn adjacent(&self, other: Self) -> bool {
        self.end_exclusive == other.start_inclusive || other.end_exclusive == self.start_inclusive
    }

    /// Returns `true` if the intervals either intersect or are adjacent,
    /// i.e. whether they can be merged into a single contiguous interval.
    #[inline]
    pub fn intersects_or_adjacent(&self, other: Self) -> bool {
        self.start_inclusive <= other.end_exclusive && other.start_inclusive <= self.end_exclusive
    }

    /// Returns `true` if `value` is contained in the interval `[start, end)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// let iv = ClosedOpenInterval::new(98, 100);
    /// assert!(iv.contains_point(98));
    /// assert!(iv.contains_point(99));
    /// assert!(!iv.contains_point(100));
    /// ```
    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.start_inclusive <= value && value < self.end_exclusive
    }

    /// Returns `true` if `other` lies entirely within `self`.
    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        self.start_inclusive <= other.start_inclusive && other.end_exclusive <= self.end_exclusive
    }

    /// Returns the length of the interval (`end - start`).
    ///
    /// The length of a signed interval can exceed `T::MAX`, e.g.
    /// `[-10, i64::MAX)`; use [`ClosedOpenInterval::width`] for such input.
    ///
    /// # Panics
    ///
    /// Panics if the length does not fit `T`.
    #[inline]
    pub fn len(&self) -> T {
        match self.end_exclusive.checked_sub(&self.start_inclusive) {
            Some(len) => len,
            None => panic!(
                "called `ClosedOpenInterval::len` on an interval wider than the value type"
            ),
        }
    }

    /// Returns the number of points in the interval, widened to `u128`.
    ///
    /// Never overflows for any primitive `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// assert_eq!(ClosedOpenInterval::new(5, 9).width(), 4);
    /// assert_eq!(
    ///     ClosedOpenInterval::new(i64::MIN, i64::MAX).width(),
    ///     u64::MAX as u128
    /// );
    /// ```
    #[inline]
    pub fn width(&self) -> u128 {
        match (self.start_inclusive.to_i128(), self.end_exclusive.to_i128()) {
            // Two's complement difference of `start <= end` always fits u128.
            (Some(start), Some(end)) => end.wrapping_sub(start) as u128,
            // Only unsigned 128-bit values above `i128::MAX` get here.
            _ => {
                let start = self.start_inclusive.to_u128().unwrap_or_default();
                let end = self.end_exclusive.to_u128().unwrap_or_default();
                end - start
            }
        }
    }

    /// Returns `true` if the interval is empty (`start == end`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    /// Calculates the intersection of two intervals.
    ///
    /// Returns `None` if the intervals do not overlap.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// let a = ClosedOpenInterval::new(0, 10);
    /// let b = ClosedOpenInterval::new(5, 15);
    /// assert_eq!(a.intersection(b), Some(ClosedOpenInterval::new(5, 10)));
    /// ```
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let new_start = max(self.start_inclusive, other.start_inclusive);
        let new_end = min(self.end_exclusive, other.end_exclusive);

        if new_start < new_end {
            Some(Self::new_unchecked(new_start, new_end))
        } else {
            None
        }
    }

    /// Calculates the union of two intervals.
    ///
    /// Returns `None` if the intervals are separated by a gap.
    #[inline]
    pub fn union(&self, other: Self) -> Option<Self> {
        if self.intersects_or_adjacent(other) {
            Some(Self::new_unchecked(
                min(self.start_inclusive, other.start_inclusive),
                max(self.end_exclusive, other.end_exclusive),
            ))
        } else {
            None
        }
    }

    /// Calculates the set difference `self - other`.
    ///
    /// # Returns
    ///
    /// * 0 intervals: `other` fully covers `self`.
    /// * 1 interval: `other` clips one side of `self`, or is disjoint from it.
    /// * 2 intervals: `other` lies strictly inside `self`; the pieces are
    ///   returned lower piece first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// let a = ClosedOpenInterval::new(0, 10);
    /// let diff = a.difference(ClosedOpenInterval::new(4, 6));
    /// assert_eq!(diff.as_slice(), &[ClosedOpenInterval::new(0, 4), ClosedOpenInterval::new(6, 10)]);
    /// ```
    pub fn difference(&self, other: Self) -> SmallVec<[Self; 2]> {
        if other.is_empty() || !self.intersects(other) {
            return smallvec![*self];
        }

        let mut result = SmallVec::new();
        if self.start_inclusive < other.start_inclusive {
            result.push(Self::new_unchecked(
                self.start_inclusive,
                other.start_inclusive,
            ));
        }
        if self.end_exclusive > other.end_exclusive {
            result.push(Self::new_unchecked(other.end_exclusive, self.end_exclusive));
        }
        result
    }

    /// Moves both bounds by `offset`.
    ///
    /// Returns `None` if either bound overflows `T`. The length is preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::interval::ClosedOpenInterval;
    ///
    /// let iv = ClosedOpenInterval::new(10, 15);
    /// assert_eq!(iv.checked_shift(100), Some(ClosedOpenInterval::new(110, 115)));
    /// assert_eq!(iv.checked_shift(-10), Some(ClosedOpenInterval::new(0, 5)));
    /// assert_eq!(ClosedOpenInterval::new(0, i64::MAX).checked_shift(1), None);
    /// ```
    #[inline]
    pub fn checked_shift(&self, offset: T) -> Option<Self> {
        let start = self.start_inclusive.checked_add(&offset)?;
        let end = self.end_exclusive.checked_add(&offset)?;
        Some(Self::new_unchecked(start, end))
    }
}

impl<T> Default for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn default() -> Self {
        Self {
            start_inclusive: T::zero(),
            end_exclusive: T::zero(),
        }
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> From<std::ops::Range<T>> for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<ClosedOpenInterval<T>> for std::ops::Range<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(iv: ClosedOpenInterval<T>) -> Self {
        iv.start_inclusive..iv.end_exclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> ClosedOpenInterval<i64> {
        ClosedOpenInterval::new(start, end)
    }

    #[test]
    fn test_construction() {
        let a = iv(10, 20);
        assert_eq!(a.start(), 10);
        assert_eq!(a.end(), 20);
        assert_eq!(a.len(), 10);
        assert!(!a.is_empty());
        assert!(iv(10, 10).is_empty());
        assert!(ClosedOpenInterval::try_new(10, 5).is_none());
    }

    #[test]
    #[should_panic(expected = "Invalid interval")]
    fn test_new_panic() {
        iv(10, 5);
    }

    #[test]
    fn test_from_start_len() {
        assert_eq!(ClosedOpenInterval::from_start_len(55, 13), Some(iv(55, 68)));
        assert_eq!(ClosedOpenInterval::from_start_len(55, 0), Some(iv(55, 55)));
        assert_eq!(ClosedOpenInterval::from_start_len(55, -3), None);
        assert_eq!(ClosedOpenInterval::from_start_len(u8::MAX, 1u8), None);
    }

    #[test]
    fn test_width_of_wide_intervals() {
        assert_eq!(iv(-10, i64::MAX).width(), i64::MAX as u128 + 10);
        assert_eq!(iv(i64::MIN, i64::MAX).width(), u64::MAX as u128);
        assert_eq!(iv(3, 3).width(), 0);

        let narrow: ClosedOpenInterval<i8> = ClosedOpenInterval::new(-128, 127);
        assert_eq!(narrow.width(), 255);

        let huge: ClosedOpenInterval<u128> = ClosedOpenInterval::new(1, u128::MAX);
        assert_eq!(huge.width(), u128::MAX - 1);
        let wide_signed: ClosedOpenInterval<i128> = ClosedOpenInterval::new(i128::MIN, i128::MAX);
        assert_eq!(wide_signed.width(), u128::MAX);
    }

    #[test]
    #[should_panic(expected = "wider than the value type")]
    fn test_len_panics_when_wider_than_type() {
        iv(-10, i64::MAX).len();
    }

    #[test]
    fn test_intersects_and_adjacency() {
        let a = iv(0, 10);
        assert!(a.intersects(iv(-5, 5)));
        assert!(a.intersects(iv(2, 8)));
        assert!(!a.intersects(iv(-5, 0)));
        assert!(!a.intersects(iv(10, 15)));

        assert!(a.adjacent(iv(10, 15)));
        assert!(a.adjacent(iv(-5, 0)));
        assert!(!a.adjacent(iv(9, 11)));

        assert!(a.intersects_or_adjacent(iv(10, 20)));
        assert!(!a.intersects_or_adjacent(iv(11, 20)));
    }

    #[test]
    fn test_contains() {
        let a = iv(0, 10);
        assert!(a.contains_point(0));
        assert!(!a.contains_point(10));
        assert!(a.contains_interval(iv(0, 10)));
        assert!(a.contains_interval(iv(3, 7)));
        assert!(!a.contains_interval(iv(5, 11)));
    }

    #[test]
    fn test_intersection_and_union() {
        let a = iv(0, 10);
        assert_eq!(a.intersection(iv(5, 15)), Some(iv(5, 10)));
        assert_eq!(a.intersection(iv(10, 20)), None);
        assert_eq!(a.union(iv(10, 20)), Some(iv(0, 20)));
        assert_eq!(a.union(iv(12, 20)), None);
    }

    #[test]
    fn test_difference() {
        let base = iv(0, 10);

        // Disjoint
        assert_eq!(base.difference(iv(12, 15)).as_slice(), &[base]);
        // Full cover
        assert!(base.difference(iv(-5, 15)).is_empty());
        // Clip right
        assert_eq!(base.difference(iv(8, 15)).as_slice(), &[iv(0, 8)]);
        // Clip left
        assert_eq!(base.difference(iv(-5, 2)).as_slice(), &[iv(2, 10)]);
        // Hole
        assert_eq!(
            base.difference(iv(4, 6)).as_slice(),
            &[iv(0, 4), iv(6, 10)]
        );
        // Empty subtrahend
        assert_eq!(base.difference(iv(4, 4)).as_slice(), &[base]);
    }

    #[test]
    fn test_checked_shift() {
        assert_eq!(iv(5, 10).checked_shift(0), Some(iv(5, 10)));
        assert_eq!(iv(5, 10).checked_shift(-7), Some(iv(-2, 3)));
        assert_eq!(iv(i64::MIN, 0).checked_shift(-1), None);

        let small: ClosedOpenInterval<i8> = ClosedOpenInterval::new(100, 120);
        assert_eq!(small.checked_shift(10), None);
    }

    #[test]
    fn test_traits_display_debug() {
        let a = iv(10, 20);
        assert_eq!(format!("{}", a), "[10, 20)");
        assert_eq!(format!("{:?}", a), "[10, 20)");
    }

    #[test]
    fn test_range_conversions() {
        let a = ClosedOpenInterval::from(3..9);
        assert_eq!(a, iv(3, 9));
        let r: std::ops::Range<i64> = a.into();
        assert_eq!(r, 3..9);
    }
}
