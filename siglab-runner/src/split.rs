//! Chronological splitting: train/test/validation slices and equal folds.

/// Borrowed, contiguous, time-ordered slices of one series.
#[derive(Debug, Clone, Copy)]
pub struct DataSplit<'a, T> {
    pub train: &'a [T],
    pub test: &'a [T],
    pub validation: &'a [T],
}

/// Split a series 60/20/20 into train, test, and validation sets.
///
/// Boundaries use integer arithmetic, so short inputs round the earlier
/// slices down; the three slices always cover the input exactly.
pub fn split<T>(data: &[T]) -> DataSplit<'_, T> {
    let n = data.len();
    let train_end = n * 60 / 100;
    let test_end = n * 80 / 100;

    DataSplit {
        train: &data[..train_end],
        test: &data[train_end..test_end],
        validation: &data[test_end..],
    }
}

/// Cut a series into `n` equal contiguous folds.
///
/// Fold size is `len / n`; remainder elements at the tail are dropped.
/// Returns an empty vector when the series is too short to give every fold
/// at least one element.
pub fn folds<T>(data: &[T], n: usize) -> Vec<&[T]> {
    if n == 0 {
        return Vec::new();
    }
    let size = data.len() / n;
    if size == 0 {
        return Vec::new();
    }
    (0..n).map(|i| &data[i * size..(i + 1) * size]).collect()
}
