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

//! Monitoring combinators
//!
//! Provides `CompositeTranslationMonitor`, a fan-out monitor that forwards
//! every event to its children in insertion order. This lets logging,
//! recording and custom diagnostics run side by side in one pipeline run.

use crate::{
    error::PipelineError, monitor::translation_monitor::TranslationMonitor,
    stats::PipelineStatistics, translate::RuleMatch,
};
use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
use almanac_model::{index::StageIndex, table::RuleTable};
use num_traits::{PrimInt, Signed};

/// A monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTranslationMonitor<'a, T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    monitors: Vec<Box<dyn TranslationMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTranslationMonitor<'a, T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTranslationMonitor<'a, T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    /// Creates a new empty `CompositeTranslationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTranslationMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TranslationMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TranslationMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TranslationMonitor<T> + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TranslationMonitor<T> + 'a>>
    for CompositeTranslationMonitor<'a, T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TranslationMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> TranslationMonitor<T> for CompositeTranslationMonitor<'a, T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTranslationMonitor"
    }

    #[inline(always)]
    fn on_enter_pipeline(&mut self, num_stages: usize, input: &RangeSet<T>) {
        for monitor in &mut self.monitors {
            monitor.on_enter_pipeline(num_stages, input);
        }
    }

    #[inline(always)]
    fn on_enter_stage(&mut self, stage: StageIndex, table: &RuleTable<T>, input: &RangeSet<T>) {
        for monitor in &mut self.monitors {
            monitor.on_enter_stage(stage, table, input);
        }
    }

    #[inline(always)]
    fn on_rule_matched(&mut self, stage: StageIndex, table: &RuleTable<T>, event: &RuleMatch<'_, T>) {
        for monitor in &mut self.monitors {
            monitor.on_rule_matched(stage, table, event);
        }
    }

    #[inline(always)]
    fn on_fallthrough(
        &mut self,
        stage: StageIndex,
        table: &RuleTable<T>,
        interval: ClosedOpenInterval<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_fallthrough(stage, table, interval);
        }
    }

    #[inline(always)]
    fn on_exit_stage(
        &mut self,
        stage: StageIndex,
        table: &RuleTable<T>,
        output: &RangeSet<T>,
        statistics: &PipelineStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_exit_stage(stage, table, output, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_pipeline(&mut self, minimum: T, statistics: &PipelineStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_pipeline(minimum, statistics);
        }
    }

    #[inline(always)]
    fn on_abort(&mut self, error: &PipelineError<T>, statistics: &PipelineStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_abort(error, statistics);
        }
    }
}
