use std::cmp::Ordering;

/// argmin returns the index of the minimum value in the array x. Ties resolve to the first
/// occurrence.
pub fn argmin<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> usize {
    let mut idx_min = 0;
    let mut val_min = x[0];

    for (i, &val) in x.iter().enumerate().skip(1) {
        if val < val_min {
            val_min = val;
            idx_min = i;
        }
    }

    idx_min
}

/// max returns the maximum value in the array x.
pub fn max<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> T {
    let &max_val = x.iter().fold(
        &x[0],
        |val_max, val| {
            if val_max > val {
                val_max
            } else {
                val
            }
        },
    );
    max_val
}

/// mean returns the arithmetic mean of the values in x, or 0.0 for an empty slice.
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that would sort an array. The sort is stable, i.e. equal values
/// keep their relative order. Incomparable values (NaN) are treated as equal.
pub fn argsort<T: std::cmp::PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    match order {
        SortOrder::Ascending => {
            indices.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(Ordering::Equal))
        }
        SortOrder::Descending => {
            indices.sort_by(|&a, &b| x[b].partial_cmp(&x[a]).unwrap_or(Ordering::Equal))
        }
    }
    indices
}

/// lin_interp returns the linearly interpolated value at x for given discrete data points xp, fp.
/// xp must be increasing. Outside of xp the boundary values are returned. Inspired by
/// numpy.interp.
pub fn lin_interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    if xp.len() != fp.len() {
        panic!("Number of items in xp and fp must be equal!")
    }

    if x <= xp[0] {
        return fp[0];
    }

    for i in 1..xp.len() {
        if x <= xp[i] {
            return fp[i - 1] + (x - xp[i - 1]) * (fp[i] - fp[i - 1]) / (xp[i] - xp[i - 1]);
        }
    }

    fp[fp.len() - 1]
}
