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

use crate::{error::FormatError, index::StageIndex, table::RuleTable};
use almanac_core::math::range_set::RangeSet;
use num_traits::{PrimInt, Signed};

/// A parsed almanac: the seed values and the ordered translation stages.
///
/// The seed list is kept raw because it has two readings. As points, every
/// value is a seed of its own. As ranges, consecutive values form
/// `(start, length)` pairs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Almanac<T>
where
    T: PrimInt + Signed,
{
    seeds: Vec<T>,
    stages: Vec<RuleTable<T>>,
}

impl<T> Almanac<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new(seeds: Vec<T>, stages: Vec<RuleTable<T>>) -> Self {
        Self { seeds, stages }
    }

    /// The seed values read as individual points.
    #[inline]
    pub fn seed_points(&self) -> &[T] {
        &self.seeds
    }

    /// The seed values read as `(start, length)` pairs.
    ///
    /// # Errors
    ///
    /// * `FormatError::OddSeedCount` if the values do not pair up.
    /// * `FormatError::InvalidSeedRange` for a negative length or an end that
    ///   overflows `T`.
    pub fn seed_ranges(&self) -> Result<RangeSet<T>, FormatError> {
        if self.seeds.len() % 2 != 0 {
            return Err(FormatError::OddSeedCount {
                count: self.seeds.len(),
            });
        }

        let pairs = self
            .seeds
            .chunks_exact(2)
            .map(|chunk| (chunk[0], chunk[1]));
        RangeSet::from_seed_pairs(pairs).map_err(|pair| FormatError::InvalidSeedRange { pair })
    }

    #[inline]
    pub fn stages(&self) -> &[RuleTable<T>] {
        &self.stages
    }

    #[inline]
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Returns the stage at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn stage(&self, index: StageIndex) -> &RuleTable<T> {
        &self.stages[index.get()]
    }

    /// Looks a stage up by name.
    pub fn stage_by_name(&self, name: &str) -> Option<(StageIndex, &RuleTable<T>)> {
        self.stages
            .iter()
            .enumerate()
            .find(|(_, table)| table.name() == name)
            .map(|(i, table)| (StageIndex::new(i), table))
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<T>, Vec<RuleTable<T>>) {
        (self.seeds, self.stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build_rule_table;
    use almanac_core::math::interval::ClosedOpenInterval;

    fn almanac(seeds: Vec<i64>) -> Almanac<i64> {
        let soil = build_rule_table("seed-to-soil", [(50, 98, 2), (52, 50, 48)]).unwrap();
        let fertilizer = RuleTable::identity("soil-to-fertilizer");
        Almanac::new(seeds, vec![soil, fertilizer])
    }

    #[test]
    fn test_seed_points_and_ranges() {
        let a = almanac(vec![79, 14, 55, 13]);
        assert_eq!(a.seed_points(), &[79, 14, 55, 13]);

        let ranges = a.seed_ranges().unwrap();
        assert_eq!(
            ranges.as_slice(),
            &[ClosedOpenInterval::new(79, 93), ClosedOpenInterval::new(55, 68)]
        );
    }

    #[test]
    fn test_zero_length_seed_pair_is_dropped() {
        let ranges = almanac(vec![5, 0, 10, 1]).seed_ranges().unwrap();
        assert_eq!(ranges.as_slice(), &[ClosedOpenInterval::new(10, 11)]);
    }

    #[test]
    fn test_odd_seed_count() {
        assert_eq!(
            almanac(vec![1, 2, 3]).seed_ranges(),
            Err(FormatError::OddSeedCount { count: 3 })
        );
    }

    #[test]
    fn test_invalid_seed_pair() {
        assert_eq!(
            almanac(vec![1, 2, 3, -1]).seed_ranges(),
            Err(FormatError::InvalidSeedRange { pair: 1 })
        );
        assert_eq!(
            almanac(vec![i64::MAX, 2, 0, 1]).seed_ranges(),
            Err(FormatError::InvalidSeedRange { pair: 0 })
        );
    }

    #[test]
    fn test_stage_lookup() {
        let a = almanac(vec![1]);
        assert_eq!(a.num_stages(), 2);
        assert_eq!(a.stage(StageIndex::new(1)).name(), "soil-to-fertilizer");

        let (index, table) = a.stage_by_name("seed-to-soil").unwrap();
        assert_eq!(index, StageIndex::new(0));
        assert_eq!(table.len(), 2);
        assert!(a.stage_by_name("water-to-light").is_none());
    }
}
