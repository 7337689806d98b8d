// src/stats/core.rs

/// Arithmetic mean. NaN for an empty slice.
#[inline]
pub fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / (data.len() as f64)
}

/// Sum of squared deviations from the mean.
#[inline]
pub fn sum_sq_dev(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|&v| (v - m) * (v - m)).sum()
}

/// Population variance (divides by n).
#[inline]
pub fn variance(data: &[f64]) -> f64 {
    sum_sq_dev(data) / (data.len() as f64)
}

#[inline]
pub fn stddev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// (mean, population variance) pair in one call.
#[inline]
pub fn mean_variance(data: &[f64]) -> (f64, f64) {
    (mean(data), variance(data))
}

/// Percentile using linear interpolation
///
/// `None` for an empty slice or `p` outside [0, 1].
pub fn percentile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let w = idx - lo as f64;
        Some(sorted[lo] * (1.0 - w) + sorted[hi] * w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_variance() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let (m, v) = mean_variance(&values);
        assert!((m - 3.0).abs() < 1e-12);
        assert!((v - 2.0).abs() < 1e-12);
        assert!((sum_sq_dev(&values) - 10.0).abs() < 1e-12);
        assert!((stddev(&values) - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_empty_is_nan() {
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_percentile() {
        let values = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 0.5), Some(3.0));
        assert_eq!(percentile(&values, 1.0), Some(5.0));
        assert!((percentile(&values, 0.125).unwrap() - 1.5).abs() < 1e-12);
        assert_eq!(percentile(&values, 1.5), None);
        assert_eq!(percentile(&[], 0.5), None);
    }
}
