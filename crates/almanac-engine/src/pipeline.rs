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

//! Multi-stage composition.
//!
//! A `Pipeline` feeds the output of stage `k` into stage `k + 1` and reports
//! the smallest lower bound after the last stage. Runs are pure: the
//! pipeline is never mutated, so one instance may serve concurrent runs.

use crate::{
    error::PipelineError,
    monitor::{no_op::NoOperationMonitor, translation_monitor::TranslationMonitor},
    result::PipelineOutcome,
    stats::PipelineStatistics,
    translate::translate_stage,
};
use almanac_core::math::range_set::RangeSet;
use almanac_model::{almanac::Almanac, index::StageIndex, table::RuleTable};
use num_traits::{PrimInt, Signed};
use std::time::Instant;

/// An ordered sequence of translation stages.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pipeline<T>
where
    T: PrimInt + Signed,
{
    stages: Vec<RuleTable<T>>,
    coalesce_between_stages: bool,
}

impl<T> Pipeline<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    /// Creates a pipeline over `stages` with default options.
    #[inline]
    pub fn new(stages: Vec<RuleTable<T>>) -> Self {
        Self {
            stages,
            coalesce_between_stages: false,
        }
    }

    /// Creates a pipeline over the stages of a loaded almanac.
    #[inline]
    pub fn from_almanac(almanac: &Almanac<T>) -> Self {
        Self::new(almanac.stages().to_vec())
    }

    #[inline]
    pub fn stages(&self) -> &[RuleTable<T>] {
        &self.stages
    }

    #[inline]
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn coalesces_between_stages(&self) -> bool {
        self.coalesce_between_stages
    }

    /// Runs `seeds` through every stage.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
    /// # use almanac_model::table::build_rule_table;
    /// # use almanac_engine::pipeline::Pipeline;
    ///
    /// let first = build_rule_table("first", [(5_i64, 0, 10)]).unwrap();
    /// let second = build_rule_table("second", [(2_i64, 5, 10)]).unwrap();
    /// let pipeline = Pipeline::new(vec![first, second]);
    ///
    /// let seeds: RangeSet<i64> = [ClosedOpenInterval::new(0, 10)].into_iter().collect();
    /// let outcome = pipeline.run(&seeds).unwrap();
    /// assert_eq!(outcome.minimum(), 2);
    /// assert_eq!(outcome.ranges().as_slice(), &[ClosedOpenInterval::new(2, 12)]);
    /// ```
    #[inline]
    pub fn run(&self, seeds: &RangeSet<T>) -> Result<PipelineOutcome<T>, PipelineError<T>> {
        self.run_with_monitor(seeds, &mut NoOperationMonitor::new())
    }

    /// Runs `seeds` through every stage, reporting to `monitor`.
    ///
    /// On failure the monitor receives `on_abort` instead of
    /// `on_exit_pipeline`, and no partial result is returned.
    ///
    /// # Errors
    ///
    /// * `PipelineError::EmptyInput` if `seeds` is empty. The stage is `0`,
    ///   or the number of stages if there are none.
    /// * `PipelineError::OffsetOverflow` if a stage maps a range out of `T`.
    pub fn run_with_monitor<M>(
        &self,
        seeds: &RangeSet<T>,
        monitor: &mut M,
    ) -> Result<PipelineOutcome<T>, PipelineError<T>>
    where
        M: TranslationMonitor<T> + ?Sized,
    {
        let start_time = Instant::now();
        let mut statistics = PipelineStatistics::default();

        monitor.on_enter_pipeline(self.stages.len(), seeds);

        let result = self
            .translate_all(seeds, monitor, &mut statistics)
            .and_then(|ranges| match ranges.min_start() {
                Some(minimum) => Ok((minimum, ranges)),
                None => Err(PipelineError::EmptyInput {
                    stage: StageIndex::new(self.stages.len()),
                }),
            });

        statistics.set_total_time(start_time.elapsed());

        match result {
            Ok((minimum, ranges)) => {
                monitor.on_exit_pipeline(minimum, &statistics);
                Ok(PipelineOutcome::new(minimum, ranges, statistics))
            }
            Err(error) => {
                monitor.on_abort(&error, &statistics);
                Err(error)
            }
        }
    }

    /// The smallest value reachable from `seeds`.
    #[inline]
    pub fn minimum(&self, seeds: &RangeSet<T>) -> Result<T, PipelineError<T>> {
        self.run(seeds).map(|outcome| outcome.minimum)
    }

    /// Translates a single value through every stage.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::PointOverflow` with the stage and the value
    /// entering it if a rule offset leaves `T`.
    pub fn map_point(&self, value: T) -> Result<T, PipelineError<T>> {
        self.stages
            .iter()
            .enumerate()
            .try_fold(value, |current, (k, table)| {
                table
                    .map_value(current)
                    .ok_or(PipelineError::PointOverflow {
                        stage: StageIndex::new(k),
                        value: current,
                    })
            })
    }

    /// The smallest value reachable from any of `points`.
    ///
    /// # Errors
    ///
    /// * `PipelineError::EmptyInput` at stage `0` if `points` is empty.
    /// * `PipelineError::PointOverflow` as for `map_point`.
    pub fn run_points(&self, points: &[T]) -> Result<T, PipelineError<T>> {
        let mut minimum: Option<T> = None;
        for &point in points {
            let mapped = self.map_point(point)?;
            minimum = Some(match minimum {
                Some(current) => current.min(mapped),
                None => mapped,
            });
        }
        minimum.ok_or(PipelineError::EmptyInput {
            stage: StageIndex::new(0),
        })
    }

    fn translate_all<M>(
        &self,
        seeds: &RangeSet<T>,
        monitor: &mut M,
        statistics: &mut PipelineStatistics,
    ) -> Result<RangeSet<T>, PipelineError<T>>
    where
        M: TranslationMonitor<T> + ?Sized,
    {
        let mut current = seeds.clone();
        let last = self.stages.len().saturating_sub(1);

        for (k, table) in self.stages.iter().enumerate() {
            let stage = StageIndex::new(k);
            monitor.on_enter_stage(stage, table, &current);

            let mut next = translate_stage(table, stage, &current, monitor, statistics)?;
            if self.coalesce_between_stages && k < last {
                next.coalesce();
            }

            statistics.on_stage_completed();
            monitor.on_exit_stage(stage, table, &next, statistics);
            current = next;
        }

        Ok(current)
    }
}

impl<T> std::fmt::Display for Pipeline<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pipeline(")?;
        for (k, table) in self.stages.iter().enumerate() {
            if k > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", table.name())?;
        }
        write!(f, ")")
    }
}

/// Assembles a `Pipeline` stage by stage.
///
/// # Defaults
///
/// | Option | Default | Semantics |
/// | :--- | :--- | :--- |
/// | `coalesce_between_stages` | `false` | Stage outputs are passed on as produced. |
#[derive(Clone, Debug)]
pub struct PipelineBuilder<T>
where
    T: PrimInt + Signed,
{
    stages: Vec<RuleTable<T>>,
    coalesce_between_stages: bool,
}

impl<T> Default for PipelineBuilder<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PipelineBuilder<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            coalesce_between_stages: false,
        }
    }

    /// Appends a stage after the ones already added.
    #[inline]
    pub fn add_stage(&mut self, table: RuleTable<T>) -> &mut Self {
        self.stages.push(table);
        self
    }

    /// Appends several stages in iteration order.
    #[inline]
    pub fn add_stages<I>(&mut self, tables: I) -> &mut Self
    where
        I: IntoIterator<Item = RuleTable<T>>,
    {
        self.stages.extend(tables);
        self
    }

    /// Sorts and merges overlapping or adjacent ranges after every stage
    /// but the last.
    ///
    /// Fewer, longer ranges mean fewer rule lookups downstream. The set of
    /// covered values, and therefore the minimum, is unchanged.
    #[inline]
    pub fn coalesce_between_stages(&mut self, yes: bool) -> &mut Self {
        self.coalesce_between_stages = yes;
        self
    }

    #[inline]
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn build(self) -> Pipeline<T> {
        Pipeline {
            stages: self.stages,
            coalesce_between_stages: self.coalesce_between_stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        monitor::{composite::CompositeTranslationMonitor, log::LogMonitor},
        translate::RuleMatch,
    };
    use almanac_core::math::interval::ClosedOpenInterval;
    use almanac_model::{loading::AlmanacLoader, rule::MappingRule, table::build_rule_table};
    use std::{cell::RefCell, rc::Rc};

    const SAMPLE_ALMANAC: &str = "\
seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15

fertilizer-to-water map:
49 53 8
0 11 42
42 0 7
57 7 4

water-to-light map:
88 18 7
18 25 70

light-to-temperature map:
45 77 23
81 45 19
68 64 13

temperature-to-humidity map:
0 69 1
1 0 69

humidity-to-location map:
60 56 37
56 93 4
";

    fn sample() -> Almanac<i64> {
        AlmanacLoader::new()
            .from_str(SAMPLE_ALMANAC)
            .expect("Failed to load sample almanac")
    }

    fn two_stage() -> Pipeline<i64> {
        let mut builder = PipelineBuilder::new();
        builder
            .add_stage(build_rule_table("first", [(5_i64, 0, 10)]).unwrap())
            .add_stage(build_rule_table("second", [(2_i64, 5, 10)]).unwrap());
        builder.build()
    }

    fn single(start: i64, end: i64) -> RangeSet<i64> {
        [ClosedOpenInterval::new(start, end)].into_iter().collect()
    }

    /// Writes one line per event into a shared log.
    struct RecordingMonitor {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingMonitor {
        fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
            let events = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    events: Rc::clone(&events),
                },
                events,
            )
        }

        fn record(&self, event: String) {
            self.events.borrow_mut().push(event);
        }
    }

    impl TranslationMonitor<i64> for RecordingMonitor {
        fn name(&self) -> &str {
            "RecordingMonitor"
        }

        fn on_enter_pipeline(&mut self, num_stages: usize, input: &RangeSet<i64>) {
            self.record(format!("enter_pipeline {} {}", num_stages, input));
        }

        fn on_enter_stage(&mut self, stage: StageIndex, table: &RuleTable<i64>, _: &RangeSet<i64>) {
            self.record(format!("enter_stage {} {}", stage.get(), table.name()));
        }

        fn on_rule_matched(
            &mut self,
            stage: StageIndex,
            _: &RuleTable<i64>,
            event: &RuleMatch<'_, i64>,
        ) {
            self.record(format!(
                "matched {} {} rule#{} {} -> {}",
                stage.get(),
                event.interval,
                event.rule_index,
                event.kind,
                event.mapped
            ));
        }

        fn on_fallthrough(
            &mut self,
            stage: StageIndex,
            _: &RuleTable<i64>,
            interval: ClosedOpenInterval<i64>,
        ) {
            self.record(format!("fallthrough {} {}", stage.get(), interval));
        }

        fn on_exit_stage(
            &mut self,
            stage: StageIndex,
            _: &RuleTable<i64>,
            output: &RangeSet<i64>,
            _: &PipelineStatistics,
        ) {
            self.record(format!("exit_stage {} {}", stage.get(), output));
        }

        fn on_exit_pipeline(&mut self, minimum: i64, _: &PipelineStatistics) {
            self.record(format!("exit_pipeline {}", minimum));
        }

        fn on_abort(&mut self, error: &PipelineError<i64>, _: &PipelineStatistics) {
            self.record(format!("abort {}", error.stage().get()));
        }
    }

    #[test]
    fn test_sample_points_minimum() {
        let almanac = sample();
        let pipeline = Pipeline::from_almanac(&almanac);

        assert_eq!(pipeline.num_stages(), 7);
        assert_eq!(pipeline.map_point(79), Ok(82));
        assert_eq!(pipeline.map_point(14), Ok(43));
        assert_eq!(pipeline.map_point(55), Ok(86));
        assert_eq!(pipeline.map_point(13), Ok(35));
        assert_eq!(pipeline.run_points(almanac.seed_points()), Ok(35));
    }

    #[test]
    fn test_sample_ranges_minimum() {
        let almanac = sample();
        let pipeline = Pipeline::from_almanac(&almanac);
        let seeds = almanac.seed_ranges().unwrap();

        let outcome = pipeline.run(&seeds).unwrap();
        assert_eq!(outcome.minimum(), 46);
        assert_eq!(outcome.ranges().total_len(), seeds.total_len());
        assert_eq!(outcome.statistics().stages_completed, 7);
        assert_eq!(pipeline.minimum(&seeds), Ok(46));
    }

    #[test]
    fn test_two_stage_minimum() {
        let pipeline = two_stage();
        let outcome = pipeline.run(&single(0, 10)).unwrap();

        assert_eq!(outcome.minimum(), 2);
        assert_eq!(outcome.ranges().as_slice(), &[ClosedOpenInterval::new(2, 12)]);
        assert_eq!(format!("{}", pipeline), "Pipeline(first -> second)");
    }

    #[test]
    fn test_coalescing_keeps_minimum() {
        let almanac = sample();
        let seeds = almanac.seed_ranges().unwrap();

        let plain = Pipeline::from_almanac(&almanac).run(&seeds).unwrap();

        let mut builder = PipelineBuilder::new();
        builder
            .add_stages(almanac.stages().iter().cloned())
            .coalesce_between_stages(true);
        let coalescing = builder.build();
        assert!(coalescing.coalesces_between_stages());

        let merged = coalescing.run(&seeds).unwrap();
        assert_eq!(merged.minimum(), plain.minimum());
        assert_eq!(merged.ranges().total_len(), plain.ranges().total_len());
        assert!(
            merged.statistics().intervals_processed <= plain.statistics().intervals_processed
        );
    }

    #[test]
    fn test_coalescing_merges_adjacent_ranges() {
        // [0, 5) and [5, 10) map to touching images and are merged before stage two.
        let mut builder = PipelineBuilder::new();
        builder
            .add_stage(build_rule_table("split", [(100_i64, 0, 5), (105, 5, 5)]).unwrap())
            .add_stage(RuleTable::identity("pass"))
            .coalesce_between_stages(true);
        let pipeline = builder.build();

        let outcome = pipeline.run(&single(0, 10)).unwrap();
        assert_eq!(outcome.ranges().as_slice(), &[ClosedOpenInterval::new(100, 110)]);
        assert_eq!(outcome.minimum(), 100);
    }

    #[test]
    fn test_empty_seeds_is_an_error() {
        let pipeline = two_stage();
        assert_eq!(
            pipeline.run(&RangeSet::new()),
            Err(PipelineError::EmptyInput {
                stage: StageIndex::new(0)
            })
        );
        assert_eq!(
            pipeline.run_points(&[]),
            Err(PipelineError::EmptyInput {
                stage: StageIndex::new(0)
            })
        );
    }

    #[test]
    fn test_no_stages_is_identity() {
        let pipeline: Pipeline<i64> = Pipeline::new(Vec::new());
        assert_eq!(pipeline.minimum(&single(7, 9)), Ok(7));
        assert_eq!(pipeline.run_points(&[4, 3]), Ok(3));
        assert_eq!(
            pipeline.run(&RangeSet::new()),
            Err(PipelineError::EmptyInput {
                stage: StageIndex::new(0)
            })
        );
    }

    #[test]
    fn test_point_overflow() {
        let rule = MappingRule::new(ClosedOpenInterval::new(0_i8, 10), 120);
        let pipeline = Pipeline::new(vec![
            RuleTable::identity("pass"),
            RuleTable::new("narrow", vec![rule]).unwrap(),
        ]);

        assert_eq!(pipeline.map_point(5), Ok(125));
        assert_eq!(
            pipeline.map_point(9),
            Err(PipelineError::PointOverflow {
                stage: StageIndex::new(1),
                value: 9,
            })
        );
        assert_eq!(pipeline.run_points(&[20, 9]).unwrap_err().stage(), StageIndex::new(1));
    }

    #[test]
    fn test_monitor_event_order() {
        let pipeline = two_stage();
        let (mut monitor, events) = RecordingMonitor::new();

        pipeline.run_with_monitor(&single(0, 10), &mut monitor).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                "enter_pipeline 2 {[0, 10)}",
                "enter_stage 0 first",
                "matched 0 [0, 10) rule#0 Contained -> [5, 15)",
                "exit_stage 0 {[5, 15)}",
                "enter_stage 1 second",
                "matched 1 [5, 15) rule#0 Contained -> [2, 12)",
                "exit_stage 1 {[2, 12)}",
                "exit_pipeline 2",
            ]
        );
    }

    #[test]
    fn test_monitor_sees_splits_and_fallthroughs() {
        let pipeline = Pipeline::new(vec![build_rule_table("t", [(110_i64, 10, 10)]).unwrap()]);
        let (mut monitor, events) = RecordingMonitor::new();

        let outcome = pipeline.run_with_monitor(&single(5, 15), &mut monitor).unwrap();
        assert_eq!(outcome.minimum(), 5);

        let events = events.borrow();
        assert_eq!(events[2], "matched 0 [5, 15) rule#0 UpperCovered -> [110, 115)");
        assert_eq!(events[3], "fallthrough 0 [5, 10)");
    }

    #[test]
    fn test_monitor_abort_on_error() {
        let pipeline = two_stage();
        let (mut monitor, events) = RecordingMonitor::new();

        let result = pipeline.run_with_monitor(&RangeSet::new(), &mut monitor);
        assert!(result.is_err());

        let events = events.borrow();
        assert_eq!(events.last().map(String::as_str), Some("abort 0"));
        assert!(!events.iter().any(|e| e.starts_with("exit_pipeline")));
    }

    #[test]
    fn test_composite_monitor_forwards_to_all() {
        let pipeline = two_stage();
        let (first, first_events) = RecordingMonitor::new();
        let (second, second_events) = RecordingMonitor::new();

        let mut composite = CompositeTranslationMonitor::new();
        composite.add_monitor(first);
        composite.add_monitor(second);
        composite.add_monitor(LogMonitor::new());
        assert_eq!(composite.len(), 3);

        pipeline.run_with_monitor(&single(0, 10), &mut composite).unwrap();

        assert_eq!(first_events.borrow().len(), 8);
        assert_eq!(*first_events.borrow(), *second_events.borrow());
    }

    #[test]
    fn test_log_monitor_records_minimum() {
        let almanac = sample();
        let pipeline = Pipeline::from_almanac(&almanac);
        let mut monitor = LogMonitor::new();

        pipeline
            .run_with_monitor(&almanac.seed_ranges().unwrap(), &mut monitor)
            .unwrap();

        assert_eq!(monitor.last_minimum(), Some(&46));
        assert_eq!(format!("{}", monitor), "LogMonitor(stages: 7)");
    }

    #[test]
    fn test_range_wider_than_value_type() {
        // [-10, i64::MAX) holds more values than i64::MAX.
        let pipeline = Pipeline::new(vec![
            build_rule_table("shift", [(100_i64, 0, 10)]).unwrap(),
            RuleTable::identity("pass"),
        ]);
        let seeds = single(-10, i64::MAX);
        let mut monitor = LogMonitor::new();

        let outcome = pipeline.run_with_monitor(&seeds, &mut monitor).unwrap();
        assert_eq!(outcome.minimum(), -10);
        assert_eq!(outcome.ranges().total_len(), i64::MAX as u128 + 10);
        assert_eq!(monitor.last_minimum(), Some(&-10));
    }

    #[test]
    fn test_dyn_monitor() {
        let pipeline = two_stage();
        let mut monitor: Box<dyn TranslationMonitor<i64>> = Box::new(LogMonitor::new());
        let outcome = pipeline
            .run_with_monitor(&single(0, 10), monitor.as_mut())
            .unwrap();
        assert_eq!(outcome.minimum(), 2);
    }

    #[test]
    fn test_pipeline_is_send_and_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Pipeline<i64>>();
    }
}
