use std::collections::BTreeMap;

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Middle value of the slice, or the average of the two middle values.
/// Returns `None` for empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, 0.5)
}

/// Computes the sample standard deviation (n - 1 denominator).
/// Returns `None` for fewer than two values.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Quantile `q` of an already sorted slice, interpolating linearly between
/// the two closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Rounds to `digits` decimal places, ties to even.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round_ties_even() / factor
}

/// Collects the non-missing values.
pub fn present<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().collect()
}

/// Percentage of `part` in `total`; `None` when there is nothing to divide by.
pub fn pct(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64 * 100.0)
    }
}

/// Buckets present values under their group key. Rows with a missing key are
/// dropped; groups with no present values still appear with an empty series.
pub fn group_values<'a, I>(rows: I) -> BTreeMap<String, Vec<f64>>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
{
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (key, value) in rows {
        let Some(key) = key else { continue };
        let series = groups.entry(key.to_string()).or_default();
        if let Some(v) = value {
            series.push(v);
        }
    }
    groups
}

/// Group means rounded to `digits`, with `None` for groups that had no values.
pub fn group_means<'a, I>(rows: I, digits: i32) -> BTreeMap<String, Option<f64>>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
{
    group_values(rows)
        .into_iter()
        .map(|(k, series)| (k, mean(&series).map(|m| round_to(m, digits))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
        assert_eq!(median(&[6.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn test_sample_stddev() {
        assert_eq!(sample_stddev(&[4.0]), None);
        // mean 5, squared deviations sum to 32, / 7
        let sd = sample_stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
    }

    #[test]
    fn test_round_ties_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(1.23456, 3), 1.235);
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10, 0), None);
        assert_eq!(pct(1, 4), Some(25.0));
    }

    #[test]
    fn test_group_means_skips_missing_keys() {
        let rows = vec![
            (Some("b"), Some(2.0)),
            (Some("a"), Some(1.0)),
            (Some("a"), Some(4.0)),
            (None, Some(100.0)),
            (Some("c"), None),
        ];
        let means = group_means(rows, 2);

        assert_eq!(means.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(means["a"], Some(2.5));
        assert_eq!(means["b"], Some(2.0));
        assert_eq!(means["c"], None);
    }
}
