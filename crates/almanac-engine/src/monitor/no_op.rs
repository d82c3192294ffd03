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

use crate::{
    monitor::translation_monitor::TranslationMonitor, stats::PipelineStatistics,
    translate::RuleMatch,
};
use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
use almanac_model::{index::StageIndex, table::RuleTable};
use num_traits::{PrimInt, Signed};

/// A monitor that ignores every event.
#[repr(transparent)]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> NoOperationMonitor<T> {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> TranslationMonitor<T> for NoOperationMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_pipeline(&mut self, _num_stages: usize, _input: &RangeSet<T>) {}

    #[inline(always)]
    fn on_enter_stage(&mut self, _stage: StageIndex, _table: &RuleTable<T>, _input: &RangeSet<T>) {
    }

    #[inline(always)]
    fn on_rule_matched(
        &mut self,
        _stage: StageIndex,
        _table: &RuleTable<T>,
        _event: &RuleMatch<'_, T>,
    ) {
    }

    #[inline(always)]
    fn on_fallthrough(
        &mut self,
        _stage: StageIndex,
        _table: &RuleTable<T>,
        _interval: ClosedOpenInterval<T>,
    ) {
    }

    #[inline(always)]
    fn on_exit_stage(
        &mut self,
        _stage: StageIndex,
        _table: &RuleTable<T>,
        _output: &RangeSet<T>,
        _statistics: &PipelineStatistics,
    ) {
    }

    #[inline(always)]
    fn on_exit_pipeline(&mut self, _minimum: T, _statistics: &PipelineStatistics) {}
}
