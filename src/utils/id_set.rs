//! Helpers for identifier lists received in sync payloads.

/// Sorts identifiers and removes duplicates.
///
/// A membership is a set, so `[8, 7, 8]` and `[7, 8]` describe the same target.
pub fn normalize_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Returns the entries of `requested` that are absent from `existing`.
///
/// Both slices must be sorted, as produced by [`normalize_ids`].
pub fn missing_ids(requested: &[i64], existing: &[i64]) -> Vec<i64> {
    requested
        .iter()
        .copied()
        .filter(|id| existing.binary_search(id).is_err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sorts_and_dedups() {
        assert_eq!(normalize_ids(vec![8, 7, 8, 1]), vec![1, 7, 8]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_ids(vec![]).is_empty());
    }

    #[test]
    fn test_missing_ids() {
        assert_eq!(missing_ids(&[1, 2, 3, 9], &[1, 3]), vec![2, 9]);
        assert!(missing_ids(&[1, 3], &[1, 2, 3]).is_empty());
        assert!(missing_ids(&[], &[]).is_empty());
    }
}
