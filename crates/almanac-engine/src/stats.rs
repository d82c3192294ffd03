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

use crate::translate::SplitKind;
use std::time::Duration;

/// Statistics collected while running a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineStatistics {
    /// Stages that ran to completion.
    pub stages_completed: u64,
    /// Intervals popped from the work-lists, across all stages.
    pub intervals_processed: u64,
    /// Pending intervals fully inside a rule.
    pub matches_contained: u64,
    /// Pending intervals whose lower part a rule covered.
    pub matches_lower: u64,
    /// Pending intervals whose upper part a rule covered.
    pub matches_upper: u64,
    /// Pending intervals that strictly contained a rule.
    pub matches_inside: u64,
    /// Pending intervals no rule touched.
    pub fallthroughs: u64,
    /// Remainders pushed back onto a work-list.
    pub remainders_pushed: u64,
    /// Largest work-list seen in any stage.
    pub peak_pending: usize,
    /// Total time spent in the run.
    pub time_total: Duration,
}

impl PipelineStatistics {
    #[inline]
    pub fn on_interval_processed(&mut self) {
        self.intervals_processed = self.intervals_processed.saturating_add(1);
    }

    #[inline]
    pub fn on_rule_matched(&mut self, kind: SplitKind) {
        let counter = match kind {
            SplitKind::Contained => &mut self.matches_contained,
            SplitKind::LowerCovered => &mut self.matches_lower,
            SplitKind::UpperCovered => &mut self.matches_upper,
            SplitKind::Inside => &mut self.matches_inside,
        };
        *counter = counter.saturating_add(1);
    }

    #[inline]
    pub fn on_fallthrough(&mut self) {
        self.fallthroughs = self.fallthroughs.saturating_add(1);
    }

    #[inline]
    pub fn on_remainders_pushed(&mut self, count: usize) {
        self.remainders_pushed = self.remainders_pushed.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_pending_len(&mut self, len: usize) {
        self.peak_pending = self.peak_pending.max(len);
    }

    #[inline]
    pub fn on_stage_completed(&mut self) {
        self.stages_completed = self.stages_completed.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Total number of rule matches of any kind.
    #[inline]
    pub fn rule_matches(&self) -> u64 {
        self.matches_contained
            .saturating_add(self.matches_lower)
            .saturating_add(self.matches_upper)
            .saturating_add(self.matches_inside)
    }
}

impl std::fmt::Display for PipelineStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Almanac Pipeline Statistics:")?;
        writeln!(f, "  Stages completed:     {}", self.stages_completed)?;
        writeln!(f, "  Intervals processed:  {}", self.intervals_processed)?;
        writeln!(f, "  Matches (contained):  {}", self.matches_contained)?;
        writeln!(f, "  Matches (lower):      {}", self.matches_lower)?;
        writeln!(f, "  Matches (upper):      {}", self.matches_upper)?;
        writeln!(f, "  Matches (inside):     {}", self.matches_inside)?;
        writeln!(f, "  Fallthroughs:         {}", self.fallthroughs)?;
        writeln!(f, "  Remainders pushed:    {}", self.remainders_pushed)?;
        writeln!(f, "  Peak pending:         {}", self.peak_pending)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
