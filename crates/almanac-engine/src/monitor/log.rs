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
    error::PipelineError, monitor::translation_monitor::TranslationMonitor,
    stats::PipelineStatistics, translate::RuleMatch,
};
use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
use almanac_model::{index::StageIndex, table::RuleTable};
use num_traits::{PrimInt, Signed};

/// Emits structured `tracing` events for a pipeline run.
///
/// Pipeline boundaries are logged at `INFO`, stage boundaries at `DEBUG` and
/// individual splits and fallthroughs at `TRACE`. Installing a subscriber
/// with an `EnvFilter` decides which of them are recorded.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    num_stages: usize,
    last_minimum: Option<T>,
}

impl<T> Default for LogMonitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LogMonitor<T> {
    pub fn new() -> Self {
        Self {
            num_stages: 0,
            last_minimum: None,
        }
    }

    /// The minimum reported by the last successful run.
    pub fn last_minimum(&self) -> Option<&T> {
        self.last_minimum.as_ref()
    }
}

impl<T> TranslationMonitor<T> for LogMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_pipeline(&mut self, num_stages: usize, input: &RangeSet<T>) {
        self.num_stages = num_stages;
        self.last_minimum = None;
        tracing::info!(
            stages = num_stages,
            ranges = input.len(),
            points = %input.total_len(),
            "Starting range translation"
        );
    }

    fn on_enter_stage(&mut self, stage: StageIndex, table: &RuleTable<T>, input: &RangeSet<T>) {
        tracing::debug!(
            stage = stage.get(),
            of = self.num_stages,
            table = table.name(),
            rules = table.len(),
            ranges = input.len(),
            "Entering stage"
        );
    }

    fn on_rule_matched(&mut self, stage: StageIndex, table: &RuleTable<T>, event: &RuleMatch<'_, T>) {
        tracing::trace!(
            stage = stage.get(),
            table = table.name(),
            interval = %event.interval,
            rule = event.rule_index,
            source = %event.rule.source(),
            offset = %event.rule.offset(),
            kind = %event.kind,
            mapped = %event.mapped,
            remainders = event.remainders.len(),
            "Rule matched"
        );
    }

    fn on_fallthrough(
        &mut self,
        stage: StageIndex,
        table: &RuleTable<T>,
        interval: ClosedOpenInterval<T>,
    ) {
        tracing::trace!(
            stage = stage.get(),
            table = table.name(),
            interval = %interval,
            "No rule matched, passing through"
        );
    }

    fn on_exit_stage(
        &mut self,
        stage: StageIndex,
        table: &RuleTable<T>,
        output: &RangeSet<T>,
        statistics: &PipelineStatistics,
    ) {
        let minimum = output.min_start();
        tracing::debug!(
            stage = stage.get(),
            table = table.name(),
            ranges = output.len(),
            minimum = ?minimum,
            processed = statistics.intervals_processed,
            "Stage complete"
        );
    }

    fn on_exit_pipeline(&mut self, minimum: T, statistics: &PipelineStatistics) {
        self.last_minimum = Some(minimum);
        tracing::info!(
            minimum = %minimum,
            stages = statistics.stages_completed,
            processed = statistics.intervals_processed,
            matches = statistics.rule_matches(),
            fallthroughs = statistics.fallthroughs,
            peak_pending = statistics.peak_pending,
            elapsed = ?statistics.time_total,
            "Range translation finished"
        );
    }

    fn on_abort(&mut self, error: &PipelineError<T>, statistics: &PipelineStatistics) {
        tracing::warn!(
            error = %error,
            stages = statistics.stages_completed,
            "Range translation aborted"
        );
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(stages: {})", self.num_stages)
    }
}
