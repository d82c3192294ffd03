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

//! Translation monitoring interface
//!
//! Lifecycle
//! - enter pipeline → { enter stage → (rule matched | fallthrough)* → exit stage }* → exit pipeline
//! - `abort` replaces `exit pipeline` when the run fails.
//!
//! Monitors observe only; they cannot change what the pipeline computes.

use crate::{error::PipelineError, stats::PipelineStatistics, translate::RuleMatch};
use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
use almanac_model::{index::StageIndex, table::RuleTable};
use num_traits::{PrimInt, Signed};

/// Trait for observing a pipeline run.
pub trait TranslationMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called once before the first stage.
    fn on_enter_pipeline(&mut self, num_stages: usize, input: &RangeSet<T>);
    /// Called before a stage starts translating `input`.
    fn on_enter_stage(&mut self, stage: StageIndex, table: &RuleTable<T>, input: &RangeSet<T>);
    /// Called when a pending interval meets a rule.
    fn on_rule_matched(&mut self, stage: StageIndex, table: &RuleTable<T>, event: &RuleMatch<'_, T>);
    /// Called when a pending interval touches no rule and passes through unchanged.
    fn on_fallthrough(
        &mut self,
        stage: StageIndex,
        table: &RuleTable<T>,
        interval: ClosedOpenInterval<T>,
    );
    /// Called after a stage produced `output`.
    fn on_exit_stage(
        &mut self,
        stage: StageIndex,
        table: &RuleTable<T>,
        output: &RangeSet<T>,
        statistics: &PipelineStatistics,
    );
    /// Called once after a successful run.
    fn on_exit_pipeline(&mut self, minimum: T, statistics: &PipelineStatistics);
    /// Called once when a run fails.
    fn on_abort(&mut self, _error: &PipelineError<T>, _statistics: &PipelineStatistics) {}
}

impl<T> std::fmt::Debug for dyn TranslationMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TranslationMonitor({})", self.name())
    }
}
