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

//! Range translation through a single stage.
//!
//! `translate_stage` pushes a whole `RangeSet` through one `RuleTable`
//! without enumerating points. Pending intervals live on a work-list. Each
//! popped interval is tested against the table. The first rule it overlaps
//! maps the covered part by the rule's offset, and the uncovered parts go
//! back onto the work-list, where they may meet other rules or fall through
//! unchanged.
//!
//! Because the rules of a table never overlap, a remainder can never meet
//! the rule that produced it again. Every remainder is bounded by a rule
//! boundary, so a stage performs at most `O(ranges × rules)` splits.
//!
//! Each popped interval is classified as one of:
//!
//! ```raw
//! Contained        [lo ........ hi)        the rule covers all of it
//!               [src_lo ............ src_hi)
//!
//! LowerCovered     [lo ........ hi)        remainder [src_hi, hi)
//!             [src_lo .... src_hi)
//!
//! UpperCovered     [lo ........ hi)        remainder [lo, src_lo)
//!                     [src_lo .... src_hi)
//!
//! Inside           [lo ............. hi)   remainders [lo, src_lo), [src_hi, hi)
//!                     [src_lo . src_hi)
//! ```

use crate::{
    error::PipelineError,
    monitor::{no_op::NoOperationMonitor, translation_monitor::TranslationMonitor},
    stats::PipelineStatistics,
};
use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
use almanac_model::{index::StageIndex, rule::MappingRule, table::RuleTable};
use num_traits::{PrimInt, Signed};
use smallvec::SmallVec;

/// How a pending interval relates to the rule it matched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SplitKind {
    /// The rule covers the whole interval. Nothing remains.
    Contained,
    /// The rule covers a prefix. The upper part remains.
    LowerCovered,
    /// The rule covers a suffix. The lower part remains.
    UpperCovered,
    /// The rule lies strictly inside. Both ends remain.
    Inside,
}

impl SplitKind {
    /// Classifies `interval` against a `source` it is known to overlap.
    #[inline]
    pub fn classify<T>(interval: ClosedOpenInterval<T>, source: ClosedOpenInterval<T>) -> Self
    where
        T: PrimInt,
    {
        debug_assert!(interval.intersects(source));
        let lower_left = interval.start() < source.start();
        let upper_left = source.end() < interval.end();
        match (lower_left, upper_left) {
            (false, false) => SplitKind::Contained,
            (false, true) => SplitKind::LowerCovered,
            (true, false) => SplitKind::UpperCovered,
            (true, true) => SplitKind::Inside,
        }
    }
}

impl std::fmt::Display for SplitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitKind::Contained => write!(f, "Contained"),
            SplitKind::LowerCovered => write!(f, "LowerCovered"),
            SplitKind::UpperCovered => write!(f, "UpperCovered"),
            SplitKind::Inside => write!(f, "Inside"),
        }
    }
}

/// A pending interval meeting a rule, as reported to monitors.
#[derive(Clone, Copy, Debug)]
pub struct RuleMatch<'a, T>
where
    T: PrimInt + Signed,
{
    /// The pending interval that was popped.
    pub interval: ClosedOpenInterval<T>,
    /// Position of the matched rule in its table.
    pub rule_index: usize,
    pub rule: &'a MappingRule<T>,
    pub kind: SplitKind,
    /// The part of `interval` inside the rule's source.
    pub covered: ClosedOpenInterval<T>,
    /// `covered` shifted by the rule's offset; this is what was emitted.
    pub mapped: ClosedOpenInterval<T>,
    /// The uncovered pieces pushed back onto the work-list.
    pub remainders: &'a [ClosedOpenInterval<T>],
}

/// Translates `input` through `table`, reporting to `monitor`.
///
/// # Errors
///
/// * `PipelineError::EmptyInput` if `input` is empty.
/// * `PipelineError::OffsetOverflow` if a mapped interval leaves `T`.
pub fn translate_stage<T, M>(
    table: &RuleTable<T>,
    stage: StageIndex,
    input: &RangeSet<T>,
    monitor: &mut M,
    statistics: &mut PipelineStatistics,
) -> Result<RangeSet<T>, PipelineError<T>>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
    M: TranslationMonitor<T> + ?Sized,
{
    if input.is_empty() {
        return Err(PipelineError::EmptyInput { stage });
    }

    // Reversed so that intervals are popped in input order.
    let mut pending: Vec<ClosedOpenInterval<T>> = input.iter().rev().copied().collect();
    let mut output = RangeSet::with_capacity(input.len());
    statistics.on_pending_len(pending.len());

    while let Some(interval) = pending.pop() {
        statistics.on_interval_processed();

        let Some((rule_index, rule)) = table.find_intersecting(interval) else {
            statistics.on_fallthrough();
            monitor.on_fallthrough(stage, table, interval);
            output.push(interval);
            continue;
        };

        let source = rule.source();
        let kind = SplitKind::classify(interval, source);
        let covered = interval
            .intersection(source)
            .unwrap_or_else(|| unreachable!("find_intersecting returned a disjoint rule"));
        let mapped =
            covered
                .checked_shift(rule.offset())
                .ok_or(PipelineError::OffsetOverflow {
                    stage,
                    interval: covered,
                    offset: rule.offset(),
                })?;
        let remainders: SmallVec<[ClosedOpenInterval<T>; 2]> = interval.difference(source);

        statistics.on_rule_matched(kind);
        statistics.on_remainders_pushed(remainders.len());

        monitor.on_rule_matched(
            stage,
            table,
            &RuleMatch {
                interval,
                rule_index,
                rule,
                kind,
                covered,
                mapped,
                remainders: &remainders,
            },
        );

        output.push(mapped);
        pending.extend(remainders);
        statistics.on_pending_len(pending.len());
    }

    Ok(output)
}

/// Translation of a whole range set through one stage.
pub trait TranslateRanges<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    /// Returns the image of `ranges` under this stage.
    ///
    /// Every point covered by a rule moves by that rule's offset; every
    /// other point is kept. The output intervals are pairwise disjoint
    /// whenever the input intervals are.
    fn translate(&self, ranges: &RangeSet<T>) -> Result<RangeSet<T>, PipelineError<T>>;
}

impl<T> TranslateRanges<T> for RuleTable<T>
where
    T: PrimInt + Signed + std::fmt::Display + std::fmt::Debug,
{
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_core::math::{interval::ClosedOpenInterval, range_set::RangeSet};
    /// # use almanac_model::table::build_rule_table;
    /// # use almanac_engine::translate::TranslateRanges;
    ///
    /// // Covers [10, 20) and moves it up by 100.
    /// let table = build_rule_table("t", [(110_i64, 10, 10)]).unwrap();
    /// let input: RangeSet<i64> = [ClosedOpenInterval::new(5, 15)].into_iter().collect();
    ///
    /// let output = table.translate(&input).unwrap();
    /// assert_eq!(
    ///     output.as_slice(),
    ///     &[ClosedOpenInterval::new(110, 115), ClosedOpenInterval::new(5, 10)]
    /// );
    /// ```
    fn translate(&self, ranges: &RangeSet<T>) -> Result<RangeSet<T>, PipelineError<T>> {
        let mut monitor = NoOperationMonitor::new();
        let mut statistics = PipelineStatistics::default();
        translate_stage(
            self,
            StageIndex::new(0),
            ranges,
            &mut monitor,
            &mut statistics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_model::table::build_rule_table;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn iv(start: i64, end: i64) -> ClosedOpenInterval<i64> {
        ClosedOpenInterval::new(start, end)
    }

    fn set(intervals: &[(i64, i64)]) -> RangeSet<i64> {
        intervals.iter().map(|&(s, e)| iv(s, e)).collect()
    }

    fn sorted(ranges: &RangeSet<i64>) -> Vec<ClosedOpenInterval<i64>> {
        let mut v = ranges.as_slice().to_vec();
        v.sort();
        v
    }

    /// Every point of `ranges`, sorted.
    fn points(ranges: &RangeSet<i64>) -> Vec<i64> {
        let mut v: Vec<i64> = ranges.iter().flat_map(|r| r.start()..r.end()).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_identity_on_empty_table() {
        let table: RuleTable<i64> = RuleTable::identity("empty");
        let input = set(&[(0, 10), (20, 25)]);
        assert_eq!(table.translate(&input).unwrap(), input);
    }

    #[test]
    fn test_single_full_cover_rule() {
        let table = build_rule_table("t", [(5_i64, 0, 100)]).unwrap();
        let output = table.translate(&set(&[(10, 20)])).unwrap();
        assert_eq!(output.as_slice(), &[iv(15, 25)]);
    }

    #[test]
    fn test_lower_covered_split() {
        // Rule covers [10, 20) with offset +100.
        let table = build_rule_table("t", [(110_i64, 10, 10)]).unwrap();
        let output = table.translate(&set(&[(5, 15)])).unwrap();
        assert_eq!(sorted(&output), vec![iv(5, 10), iv(110, 115)]);
    }

    #[test]
    fn test_upper_covered_split() {
        let table = build_rule_table("t", [(110_i64, 10, 10)]).unwrap();
        let output = table.translate(&set(&[(15, 25)])).unwrap();
        assert_eq!(sorted(&output), vec![iv(20, 25), iv(115, 120)]);
    }

    #[test]
    fn test_rule_strictly_inside() {
        let table = build_rule_table("t", [(1000_i64, 10, 5)]).unwrap();
        let output = table.translate(&set(&[(0, 30)])).unwrap();
        assert_eq!(sorted(&output), vec![iv(0, 10), iv(15, 30), iv(1000, 1005)]);
    }

    #[test]
    fn test_no_match_fallthrough() {
        let table = build_rule_table("t", [(500_i64, 100, 10)]).unwrap();
        let input = set(&[(0, 100)]);
        assert_eq!(table.translate(&input).unwrap(), input);
    }

    #[test]
    fn test_remainder_meets_second_rule() {
        // [0, 30) spans two adjacent rules and a gap.
        let table = build_rule_table("t", [(100_i64, 0, 10), (200, 10, 5)]).unwrap();
        let output = table.translate(&set(&[(0, 30)])).unwrap();
        assert_eq!(sorted(&output), vec![iv(15, 30), iv(100, 110), iv(200, 205)]);
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        // seed-to-soil: [98, 100) -> [50, 52). 100 must pass through.
        let table = build_rule_table("seed-to-soil", [(50_i64, 98, 2), (52, 50, 48)]).unwrap();
        let output = table.translate(&set(&[(97, 101)])).unwrap();
        assert_eq!(sorted(&output), vec![iv(50, 52), iv(99, 100), iv(100, 101)]);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let table = build_rule_table("t", [(5_i64, 0, 100)]).unwrap();
        assert_eq!(
            table.translate(&RangeSet::new()),
            Err(PipelineError::EmptyInput {
                stage: StageIndex::new(0)
            })
        );
    }

    #[test]
    fn test_offset_overflow_is_an_error() {
        let rule = MappingRule::new(ClosedOpenInterval::new(0_i8, 10), 120);
        let table = RuleTable::new("narrow", vec![rule]).unwrap();
        let input: RangeSet<i8> = [ClosedOpenInterval::new(5, 8)].into_iter().collect();

        let err = table.translate(&input).unwrap_err();
        assert_eq!(
            err,
            PipelineError::OffsetOverflow {
                stage: StageIndex::new(0),
                interval: ClosedOpenInterval::new(5, 8),
                offset: 120,
            }
        );
        assert_eq!(err.stage(), StageIndex::new(0));
    }

    #[test]
    fn test_split_kind_classification() {
        let source = iv(10, 20);
        assert_eq!(SplitKind::classify(iv(10, 20), source), SplitKind::Contained);
        assert_eq!(SplitKind::classify(iv(12, 25), source), SplitKind::LowerCovered);
        assert_eq!(SplitKind::classify(iv(5, 15), source), SplitKind::UpperCovered);
        assert_eq!(SplitKind::classify(iv(0, 30), source), SplitKind::Inside);
    }

    #[test]
    fn test_statistics_are_counted() {
        let table = build_rule_table("t", [(1000_i64, 10, 5), (2000, 40, 5)]).unwrap();
        let input = set(&[(0, 30), (41, 43), (100, 101)]);
        let mut monitor = NoOperationMonitor::new();
        let mut stats = PipelineStatistics::default();

        let output =
            translate_stage(&table, StageIndex::new(0), &input, &mut monitor, &mut stats).unwrap();

        assert_eq!(output.len(), 5);
        // Pops: [0, 30) Inside, [15, 30) and [0, 10) fall through,
        // [41, 43) Contained, [100, 101) falls through.
        assert_eq!(stats.intervals_processed, 5);
        assert_eq!(stats.matches_inside, 1);
        assert_eq!(stats.matches_contained, 1);
        assert_eq!(stats.matches_lower, 0);
        assert_eq!(stats.matches_upper, 0);
        assert_eq!(stats.rule_matches(), 2);
        assert_eq!(stats.fallthroughs, 3);
        assert_eq!(stats.remainders_pushed, 2);
        assert_eq!(stats.peak_pending, 4);
        assert_eq!(stats.stages_completed, 0);
    }

    /// Random tables and inputs checked against point-by-point lookup.
    #[test]
    fn test_random_tables_match_point_lookup() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            // Disjoint rules: walk a cursor forward with random gaps.
            let mut rows = Vec::new();
            let mut cursor: i64 = rng.random_range(-20..20);
            for _ in 0..rng.random_range(0..6) {
                cursor += rng.random_range(0..8);
                let len: i64 = rng.random_range(1..12);
                let dest: i64 = rng.random_range(-50..150);
                rows.push((dest, cursor, len));
                cursor += len;
            }
            // Table order need not follow source order.
            if rng.random_bool(0.5) {
                rows.reverse();
            }
            let table = build_rule_table("random", rows).unwrap();

            // Disjoint input intervals.
            let mut input = RangeSet::new();
            let mut cursor: i64 = rng.random_range(-30..0);
            for _ in 0..rng.random_range(1..5) {
                cursor += rng.random_range(0..6);
                let len: i64 = rng.random_range(1..20);
                input.push(iv(cursor, cursor + len));
                cursor += len;
            }

            let output = table.translate(&input).unwrap();

            // Conservation.
            assert_eq!(output.total_len(), input.total_len());
            // No empty intervals.
            assert!(output.iter().all(|r| !r.is_empty()));

            // Image matches the per-point rule.
            let mut expected: Vec<i64> = points(&input)
                .into_iter()
                .map(|p| table.map_value(p).unwrap())
                .collect();
            expected.sort_unstable();
            assert_eq!(points(&output), expected);
        }
    }

    #[test]
    fn test_disjoint_output_for_injective_table() {
        // Destinations do not collide, so the image of a disjoint input is disjoint.
        let table =
            build_rule_table("t", [(1000_i64, 0, 10), (2000, 10, 10), (3000, 30, 10)]).unwrap();
        let input = set(&[(-5, 12), (15, 35), (38, 50)]);
        let output = table.translate(&input).unwrap();

        assert!(output.is_pairwise_disjoint());
        assert_eq!(output.total_len(), input.total_len());
    }
}
