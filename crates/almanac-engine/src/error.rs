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

use almanac_core::math::interval::ClosedOpenInterval;
use almanac_model::index::StageIndex;
use num_traits::PrimInt;
use thiserror::Error;

/// Failures while running ranges or points through a pipeline.
///
/// A failed run returns no partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineError<T>
where
    T: PrimInt + std::fmt::Display + std::fmt::Debug,
{
    /// A stage received nothing to translate. `stage` equals the number of
    /// stages when the seeds were empty and the pipeline has no stages.
    #[error("{stage} received an empty range set")]
    EmptyInput { stage: StageIndex },

    /// Shifting the covered part of an interval by a rule offset left the value type.
    #[error("{stage}: shifting {interval} by {offset} overflows")]
    OffsetOverflow {
        stage: StageIndex,
        interval: ClosedOpenInterval<T>,
        offset: T,
    },

    /// Translating a single value left the value type.
    #[error("{stage}: translating value {value} overflows")]
    PointOverflow { stage: StageIndex, value: T },
}

impl<T> PipelineError<T>
where
    T: PrimInt + std::fmt::Display + std::fmt::Debug,
{
    /// The stage at which the run failed.
    #[inline]
    pub fn stage(&self) -> StageIndex {
        match self {
            Self::EmptyInput { stage }
            | Self::OffsetOverflow { stage, .. }
            | Self::PointOverflow { stage, .. } => *stage,
        }
    }
}
