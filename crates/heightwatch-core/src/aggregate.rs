//! Reduce a set of pool heights to one representative value.

use crate::error::AggregateError;

/// Median of `values`.
///
/// For an even count this is the mean of the two middle values, truncated
/// toward zero. The input order does not matter.
pub fn median(values: &[u64]) -> Result<u64, AggregateError> {
    if values.is_empty() {
        return Err(AggregateError::Empty);
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let half = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        return Ok(sorted[half]);
    }

    let (lo, hi) = (sorted[half - 1], sorted[half]);
    // lo <= hi, so this cannot overflow.
    Ok(lo + (hi - lo) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_count_takes_middle() {
        assert_eq!(median(&[1, 2, 3]), Ok(2));
        assert_eq!(median(&[9, 1, 5]), Ok(5));
    }

    #[test]
    fn even_count_truncates_mean() {
        assert_eq!(median(&[1, 2, 3, 4]), Ok(2));
        assert_eq!(median(&[10, 20]), Ok(15));
        assert_eq!(median(&[10, 11]), Ok(10));
    }

    #[test]
    fn single_value() {
        assert_eq!(median(&[5]), Ok(5));
    }

    #[test]
    fn empty_is_an_error() {
        assert_eq!(median(&[]), Err(AggregateError::Empty));
    }

    #[test]
    fn order_does_not_matter() {
        let samples: [&[u64]; 4] = [
            &[3, 1, 2],
            &[100, 7, 42, 42, 9],
            &[1_000_000, 999_999, 1_000_001, 5],
            &[8, 8, 8, 1],
        ];
        for xs in samples {
            let reversed: Vec<u64> = xs.iter().rev().copied().collect();
            assert_eq!(median(xs), median(&reversed));
        }
    }

    #[test]
    fn large_heights_do_not_overflow() {
        assert_eq!(median(&[u64::MAX, u64::MAX]), Ok(u64::MAX));
        assert_eq!(median(&[u64::MAX - 1, u64::MAX]), Ok(u64::MAX - 1));
    }

    #[test]
    fn input_is_left_untouched() {
        let values = vec![3, 1, 2];
        median(&values).unwrap();
        assert_eq!(values, vec![3, 1, 2]);
    }
}
