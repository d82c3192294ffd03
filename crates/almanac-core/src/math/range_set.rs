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

//! Collections of non-empty half-open intervals.
//!
//! A `RangeSet` holds "every integer currently reachable" at one point of a
//! translation pipeline. It never stores an empty interval; pushing one is
//! a silent no-op so that split logic can emit remainders unconditionally.
//! Pairwise disjointness is a property the producer guarantees, and can be
//! checked with [`RangeSet::is_pairwise_disjoint`]. Adjacent or overlapping
//! members can be merged with [`RangeSet::coalesce`], which never changes
//! the covered points and therefore never changes [`RangeSet::min_start`].

use crate::math::interval::ClosedOpenInterval;
use num_traits::PrimInt;

/// An unordered collection of non-empty `[start, end)` intervals.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RangeSet<T>
where
    T: PrimInt,
{
    intervals: Vec<ClosedOpenInterval<T>>,
}

impl<T> Default for RangeSet<T>
where
    T: PrimInt,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RangeSet<T>
where
    T: PrimInt,
{
    /// Creates an empty `RangeSet`.
    #[inline]
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Creates an empty `RangeSet` with room for `capacity` intervals.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            intervals: Vec::with_capacity(capacity),
        }
    }

    /// Builds a `RangeSet` from `(start, length)` pairs.
    ///
    /// Fails with the position of the first pair whose length is negative
    /// or whose `start + length` overflows. Zero-length pairs contribute
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
    ///
    /// let set = RangeSet::from_seed_pairs([(79, 14), (55, 13)]).unwrap();
    /// assert_eq!(
    ///     set.as_slice(),
    ///     &[ClosedOpenInterval::new(79, 93), ClosedOpenInterval::new(55, 68)]
    /// );
    /// ```
    pub fn from_seed_pairs<I>(pairs: I) -> Result<Self, usize>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let pairs = pairs.into_iter();
        let mut set = Self::with_capacity(pairs.size_hint().0);
        for (pair, (start, len)) in pairs.enumerate() {
            set.push(ClosedOpenInterval::from_start_len(start, len).ok_or(pair)?);
        }
        Ok(set)
    }

    /// Appends `interval`, dropping it if it is empty.
    #[inline]
    pub fn push(&mut self, interval: ClosedOpenInterval<T>) {
        if !interval.is_empty() {
            self.intervals.push(interval);
        }
    }

    /// Returns the number of stored intervals.
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the set covers no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ClosedOpenInterval<T>> {
        self.intervals.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[ClosedOpenInterval<T>] {
        &self.intervals
    }

    /// Returns the smallest start bound, or `None` for an empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
    ///
    /// let set: RangeSet<i64> = [ClosedOpenInterval::new(60, 61), ClosedOpenInterval::new(46, 56)]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(set.min_start(), Some(46));
    /// ```
    #[inline]
    pub fn min_start(&self) -> Option<T> {
        self.intervals.iter().map(|iv| iv.start()).min()
    }

    /// Returns the number of points covered, counting overlaps twice.
    ///
    /// Widened to `u128`, so intervals longer than `T::MAX` are counted in
    /// full. The sum saturates at `u128::MAX`.
    pub fn total_len(&self) -> u128 {
        self.intervals
            .iter()
            .fold(0u128, |acc, iv| acc.saturating_add(iv.width()))
    }

    /// Returns `true` if no two stored intervals overlap.
    pub fn is_pairwise_disjoint(&self) -> bool {
        let mut sorted = self.intervals.clone();
        sorted.sort_unstable();
        sorted.windows(2).all(|w| !w[0].intersects(w[1]))
    }

    /// Sorts the intervals and merges every overlapping or adjacent pair.
    ///
    /// The covered points are unchanged.
    pub fn coalesce(&mut self) {
        if self.intervals.len() < 2 {
            return;
        }
        self.intervals.sort_unstable();

        let mut merged: Vec<ClosedOpenInterval<T>> = Vec::with_capacity(self.intervals.len());
        for &interval in &self.intervals {
            match merged.last_mut() {
                Some(last) => match last.union(interval) {
                    Some(joined) => *last = joined,
                    None => merged.push(interval),
                },
                None => merged.push(interval),
            }
        }
        self.intervals = merged;
    }
}

impl<T> FromIterator<ClosedOpenInterval<T>> for RangeSet<T>
where
    T: PrimInt,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = ClosedOpenInterval<T>>,
    {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<ClosedOpenInterval<T>> for RangeSet<T>
where
    T: PrimInt,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = ClosedOpenInterval<T>>,
    {
        for interval in iter {
            self.push(interval);
        }
    }
}

impl<T> IntoIterator for RangeSet<T>
where
    T: PrimInt,
{
    type Item = ClosedOpenInterval<T>;
    type IntoIter = std::vec::IntoIter<ClosedOpenInterval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RangeSet<T>
where
    T: PrimInt,
{
    type Item = &'a ClosedOpenInterval<T>;
    type IntoIter = std::slice::Iter<'a, ClosedOpenInterval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl<T> std::fmt::Debug for RangeSet<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.intervals.iter()).finish()
    }
}

impl<T> std::fmt::Display for RangeSet<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", interval)?;
        }
        write!(f, "}}")
    }
}
