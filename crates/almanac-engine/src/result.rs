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

use crate::stats::PipelineStatistics;
use almanac_core::math::range_set::RangeSet;
use num_traits::{PrimInt, Signed};

/// The result of a successful range run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome<T>
where
    T: PrimInt + Signed,
{
    /// The smallest start among the final ranges.
    pub minimum: T,
    /// The final ranges, after the last stage.
    pub ranges: RangeSet<T>,
    pub statistics: PipelineStatistics,
}

impl<T> PipelineOutcome<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new(minimum: T, ranges: RangeSet<T>, statistics: PipelineStatistics) -> Self {
        Self {
            minimum,
            ranges,
            statistics,
        }
    }

    #[inline]
    pub fn minimum(&self) -> T {
        self.minimum
    }

    #[inline]
    pub fn ranges(&self) -> &RangeSet<T> {
        &self.ranges
    }

    #[inline]
    pub fn statistics(&self) -> &PipelineStatistics {
        &self.statistics
    }

    /// Consumes the outcome and returns the final ranges.
    #[inline]
    pub fn into_ranges(self) -> RangeSet<T> {
        self.ranges
    }
}

impl<T> std::fmt::Display for PipelineOutcome<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PipelineOutcome(minimum: {}, ranges: {}, stages: {})",
            self.minimum,
            self.ranges.len(),
            self.statistics.stages_completed
        )
    }
}
