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

//! One translation stage.
//!
//! A `RuleTable` is a named list of mapping rules whose source intervals are
//! pairwise disjoint. Disjointness is checked once, when the table is built,
//! so that at most one rule can ever apply to a given value. Rules keep their
//! input order; lookups report the first match in that order, which keeps
//! diagnostics deterministic.

use crate::{
    error::FormatError,
    rule::{MappingRule, RuleRow},
};
use almanac_core::math::interval::ClosedOpenInterval;
use num_traits::{PrimInt, Signed};

/// A validated set of non-overlapping mapping rules.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RuleTable<T>
where
    T: PrimInt + Signed,
{
    name: String,
    rules: Vec<MappingRule<T>>,
}

impl<T> RuleTable<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    /// Creates a table from already constructed rules.
    ///
    /// Returns `FormatError::OverlappingRules` if two sources overlap; the
    /// reported pair is the overlap with the smallest source start.
    pub fn new<S>(name: S, rules: Vec<MappingRule<T>>) -> Result<Self, FormatError>
    where
        S: Into<String>,
    {
        let name = name.into();

        let mut order: Vec<usize> = (0..rules.len()).collect();
        order.sort_unstable_by_key(|&i| (rules[i].source().start(), i));
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if let Some(overlap) = rules[a].source().intersection(rules[b].source()) {
                return Err(FormatError::OverlappingRules {
                    stage: name,
                    first: a.min(b),
                    second: a.max(b),
                    overlap: overlap.to_string(),
                });
            }
        }

        Ok(Self { name, rules })
    }
}

impl<T> RuleTable<T>
where
    T: PrimInt + Signed,
{
    /// Creates a table without rules. Every value falls through it unchanged.
    #[inline]
    pub fn identity<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// The stage name, used for diagnostics only.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn rules(&self) -> &[MappingRule<T>] {
        &self.rules
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first rule (in input order) whose source overlaps `interval`,
    /// together with its position.
    #[inline]
    pub fn find_intersecting(
        &self,
        interval: ClosedOpenInterval<T>,
    ) -> Option<(usize, &MappingRule<T>)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.source().intersects(interval))
    }

    /// Returns the rule that covers `value`, if any.
    #[inline]
    pub fn find_covering(&self, value: T) -> Option<&MappingRule<T>> {
        self.rules.iter().find(|rule| rule.covers(value))
    }

    /// Translates a single value.
    ///
    /// Applies the covering rule's offset, or returns `value` unchanged if no
    /// rule covers it. Returns `None` if the offset overflows `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use almanac_model::table::build_rule_table;
    ///
    /// let soil = build_rule_table("seed-to-soil", [(50_i64, 98, 2), (52, 50, 48)]).unwrap();
    /// assert_eq!(soil.map_value(79), Some(81));
    /// assert_eq!(soil.map_value(98), Some(50));
    /// assert_eq!(soil.map_value(100), Some(100));
    /// assert_eq!(soil.map_value(13), Some(13));
    /// ```
    #[inline]
    pub fn map_value(&self, value: T) -> Option<T> {
        match self.find_covering(value) {
            Some(rule) => rule.apply(value),
            None => Some(value),
        }
    }
}

impl<T> std::fmt::Display for RuleTable<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RuleTable({}, {} rules)", self.name, self.rules.len())
    }
}

/// Builds a stage from raw `(destination_start, source_start, length)` rows.
///
/// Each row becomes a [`MappingRule`] with `offset = destination_start - source_start`.
/// Fails with `FormatError::InvalidRule` for empty or overflowing rows and with
/// `FormatError::OverlappingRules` if two sources overlap.
pub fn build_rule_table<T, S, I, R>(name: S, rows: I) -> Result<RuleTable<T>, FormatError>
where
    T: PrimInt + Signed + std::fmt::Display,
    S: Into<String>,
    I: IntoIterator<Item = R>,
    R: Into<RuleRow<T>>,
{
    let name = name.into();
    let rows = rows.into_iter();
    let mut rules = Vec::with_capacity(rows.size_hint().0);

    for (i, row) in rows.enumerate() {
        let rule =
            MappingRule::try_from_row(row.into()).map_err(|reason| FormatError::InvalidRule {
                stage: name.clone(),
                rule: i,
                reason,
            })?;
        rules.push(rule);
    }

    RuleTable::new(name, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleRowError;

    fn iv(start: i64, end: i64) -> ClosedOpenInterval<i64> {
        ClosedOpenInterval::new(start, end)
    }

    #[test]
    fn test_build_keeps_input_order() {
        let table = build_rule_table("seed-to-soil", [(50_i64, 98, 2), (52, 50, 48)]).unwrap();
        assert_eq!(table.name(), "seed-to-soil");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].source(), iv(98, 100));
        assert_eq!(table.rules()[1].source(), iv(50, 98));
    }

    #[test]
    fn test_adjacent_rules_are_accepted() {
        let table = build_rule_table("t", [(0_i64, 10, 10), (100, 0, 10), (200, 20, 5)]);
        assert!(table.is_ok());
    }

    #[test]
    fn test_overlap_rejected() {
        let err = build_rule_table("t", [(0_i64, 0, 10), (100, 50, 5), (200, 5, 10)]).unwrap_err();
        assert_eq!(
            err,
            FormatError::OverlappingRules {
                stage: "t".to_string(),
                first: 0,
                second: 2,
                overlap: "[5, 10)".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_overlap_rejected() {
        // A short rule between two others still overlaps the long one.
        let err = build_rule_table("t", [(0_i64, 0, 100), (500, 10, 5), (900, 50, 5)]);
        assert!(matches!(
            err,
            Err(FormatError::OverlappingRules {
                first: 0,
                second: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_row_reports_position() {
        let err = build_rule_table("light", [(0_i64, 0, 5), (7, 9, 0)]).unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidRule {
                stage: "light".to_string(),
                rule: 1,
                reason: RuleRowError::NonPositiveLength,
            }
        );
    }

    #[test]
    fn test_find_intersecting() {
        let table = build_rule_table("t", [(110_i64, 10, 10), (0, 30, 5)]).unwrap();
        let (index, rule) = table.find_intersecting(iv(5, 15)).unwrap();
        assert_eq!(index, 0);
        assert_eq!(rule.offset(), 100);
        assert!(table.find_intersecting(iv(20, 30)).is_none());
        assert_eq!(table.find_intersecting(iv(0, 100)).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn test_identity_table() {
        let table: RuleTable<i64> = RuleTable::identity("noop");
        assert!(table.is_empty());
        assert_eq!(table.map_value(42), Some(42));
        assert_eq!(format!("{}", table), "RuleTable(noop, 0 rules)");
    }

    #[test]
    fn test_map_value_narrow_type() {
        let table = build_rule_table("t", [(100_i8, 0, 20)]).unwrap();
        assert_eq!(table.map_value(5), Some(105));
        assert_eq!(table.map_value(-5), Some(-5));
    }
}
