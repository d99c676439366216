//! Linear-scan two-sum search
//!
//! A single left-to-right pass keeps a map from each value already seen to the
//! first index it appeared at. The first position whose complement is in the
//! map ends the scan, so the returned pair has the smallest possible second
//! index, and among pairs sharing it, the smallest first index.

use crate::error::PairError;
use std::collections::HashMap;

/// Two positions of an input whose values sum to the target
///
/// `first_index < second_index` always holds, and the values are listed in
/// index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairMatch {
    pub first_index: usize,
    pub second_index: usize,
    pub first_value: i64,
    pub second_value: i64,
}

impl PairMatch {
    pub fn indices(&self) -> [usize; 2] {
        [self.first_index, self.second_index]
    }

    pub fn values(&self) -> [i64; 2] {
        [self.first_value, self.second_value]
    }

    /// Check that this pair really answers `(nums, target)`
    pub fn is_solution_for(&self, nums: &[i64], target: i64) -> bool {
        self.first_index < self.second_index
            && nums.get(self.first_index) == Some(&self.first_value)
            && nums.get(self.second_index) == Some(&self.second_value)
            && self.first_value.checked_add(self.second_value) == Some(target)
    }
}

/// Find the first pair of elements in `nums` summing to `target`
///
/// # Example
/// ```
/// use twosum_core_pairs::find_pair;
///
/// let pair = find_pair(&[2, 7, 11, 15], 9).unwrap();
/// assert_eq!(pair.indices(), [0, 1]);
/// assert_eq!(pair.values(), [2, 7]);
/// ```
pub fn find_pair(nums: &[i64], target: i64) -> Result<PairMatch, PairError> {
    if nums.len() < 2 {
        return Err(PairError::InvalidInput(format!(
            "need at least 2 numbers, got {}",
            nums.len()
        )));
    }

    let mut seen: HashMap<i64, usize> = HashMap::with_capacity(nums.len());

    for (i, &value) in nums.iter().enumerate() {
        // No i64 complement exists when the subtraction overflows
        if let Some(complement) = target.checked_sub(value) {
            if let Some(&j) = seen.get(&complement) {
                return Ok(PairMatch {
                    first_index: j,
                    second_index: i,
                    first_value: complement,
                    second_value: value,
                });
            }
        }
        seen.entry(value).or_insert(i);
    }

    Err(PairError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brute_force(nums: &[i64], target: i64) -> Option<(usize, usize)> {
        for i in 1..nums.len() {
            for j in 0..i {
                if nums[j].checked_add(nums[i]) == Some(target) {
                    return Some((j, i));
                }
            }
        }
        None
    }

    #[test]
    fn test_leading_pair() {
        let pair = find_pair(&[2, 7, 11, 15], 9).unwrap();
        assert_eq!(pair.indices(), [0, 1]);
        assert_eq!(pair.values(), [2, 7]);
    }

    #[test]
    fn test_pair_skips_self_match() {
        // 3 + 3 would be 6 but index 0 cannot pair with itself
        let pair = find_pair(&[3, 2, 4], 6).unwrap();
        assert_eq!(pair.indices(), [1, 2]);
        assert_eq!(pair.values(), [2, 4]);
    }

    #[test]
    fn test_no_pair() {
        assert_eq!(find_pair(&[1, 2, 3], 100), Err(PairError::NotFound));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(find_pair(&[5], 5), Err(PairError::InvalidInput(_))));
        assert!(matches!(find_pair(&[], 0), Err(PairError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicates_use_earliest_index() {
        let pair = find_pair(&[1, 1, 5], 6).unwrap();
        assert_eq!(pair.indices(), [0, 2]);

        let pair = find_pair(&[3, 3], 6).unwrap();
        assert_eq!(pair.indices(), [0, 1]);
    }

    #[test]
    fn test_first_completed_pair_wins() {
        // 2 + 3 completes at index 3, before 1 + 4 could complete at index 4
        let pair = find_pair(&[1, 2, 8, 3, 4], 5).unwrap();
        assert_eq!(pair.indices(), [1, 3]);
        assert_eq!(pair.values(), [2, 3]);
    }

    #[test]
    fn test_negative_and_zero() {
        let pair = find_pair(&[-3, 4, 3, 90], 0).unwrap();
        assert_eq!(pair.indices(), [0, 2]);
        assert_eq!(pair.values(), [-3, 3]);

        let pair = find_pair(&[0, 4, 0], 0).unwrap();
        assert_eq!(pair.indices(), [0, 2]);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        assert_eq!(
            find_pair(&[i64::MIN, 1, 2], i64::MAX),
            Err(PairError::NotFound)
        );

        let pair = find_pair(&[i64::MAX, -1, i64::MIN], -1).unwrap();
        assert_eq!(pair.indices(), [0, 2]);
    }

    #[test]
    fn test_is_solution_for() {
        let nums = [2, 7, 11, 15];
        let pair = find_pair(&nums, 9).unwrap();
        assert!(pair.is_solution_for(&nums, 9));
        assert!(!pair.is_solution_for(&nums, 10));
        assert!(!pair.is_solution_for(&[7, 2, 11, 15], 9));
        assert!(!pair.is_solution_for(&[2], 9));
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(
            nums in proptest::collection::vec(-50i64..50, 2..40),
            target in -100i64..100,
        ) {
            match (find_pair(&nums, target), brute_force(&nums, target)) {
                (Ok(pair), Some((j, i))) => {
                    prop_assert_eq!(pair.indices(), [j, i]);
                    prop_assert!(pair.is_solution_for(&nums, target));
                }
                (Err(PairError::NotFound), None) => {}
                (found, expected) => {
                    prop_assert!(false, "find_pair {:?} vs brute force {:?}", found, expected);
                }
            }
        }
    }
}
