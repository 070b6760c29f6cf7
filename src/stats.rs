//! Sample statistics for survey diagnostics
//!
//! Pure numeric helpers shared by the chart renderers: empirical CDFs,
//! log-spaced histogram binning, step-line conversion, and the broken
//! power law drawn over the period-ratio distribution.

/// Empirical CDF of a sample.
///
/// Sorts the sample ascending and assigns `y_i = i / N`, so the curve is
/// monotonically non-decreasing over `[0, 1)` with a step of `1/N`.
pub fn ecdf(sample: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, x)| (x, i as f64 / n))
        .collect()
}

/// `n` bin edges spaced uniformly in log10 between `lo` and `hi`.
pub fn log_bins(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let (la, lb) = (lo.log10(), hi.log10());
            (0..n)
                .map(|i| 10f64.powf(la + (lb - la) * i as f64 / (n - 1) as f64))
                .collect()
        }
    }
}

/// Histogram counts over the given edges.
///
/// Bins are half-open `[e_i, e_{i+1})`; the last bin includes its upper
/// edge. Samples outside the edge range are dropped.
pub fn histogram(sample: &[f64], edges: &[f64]) -> Vec<f64> {
    let nbins = edges.len().saturating_sub(1);
    let mut counts = vec![0.0; nbins];
    if nbins == 0 {
        return counts;
    }
    for &x in sample {
        if x < edges[0] || x > edges[nbins] {
            continue;
        }
        let idx = edges.partition_point(|&e| e <= x);
        counts[idx.saturating_sub(1).min(nbins - 1)] += 1.0;
    }
    counts
}

/// Sample median; mean of the central pair for even sizes, NaN when empty.
pub fn median(sample: &[f64]) -> f64 {
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n == 0 {
        f64::NAN
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Mid-step polyline through a point series.
///
/// Each y value is held constant halfway to its neighbours, so the steps
/// land between the data points rather than on them.
pub fn steps_mid(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len() * 3);
    out.push(points[0]);
    for w in points.windows(2) {
        let mid = 0.5 * (w[0].0 + w[1].0);
        out.push((mid, w[0].1));
        out.push((mid, w[1].1));
    }
    out.push(points[points.len() - 1]);
    out
}

/// Outline polyline of a histogram, rising from and returning to zero.
pub fn histogram_steps(edges: &[f64], counts: &[f64]) -> Vec<(f64, f64)> {
    if edges.len() < 2 || counts.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(counts.len() * 2 + 2);
    out.push((edges[0], 0.0));
    for (i, &c) in counts.iter().enumerate() {
        out.push((edges[i], c));
        out.push((edges[i + 1], c));
    }
    out.push((edges[counts.len()], 0.0));
    out
}

/// Smoothly-broken power law with indices `a` below and `b` above the
/// break at `x0`: `((x/x0)^-a + (x/x0)^-b)^-1`.
pub fn broken_power_law(x: f64, x0: f64, a: f64, b: f64) -> f64 {
    let t = x / x0;
    1.0 / (t.powf(-a) + t.powf(-b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecdf_sorted_fractions() {
        let curve = ecdf(&[1.2, 3.4, 2.1]);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].0, 1.2);
        assert_eq!(curve[1].0, 2.1);
        assert_eq!(curve[2].0, 3.4);
        assert!((curve[0].1 - 0.0).abs() < 1e-12);
        assert!((curve[1].1 - 1.0 / 3.0).abs() < 1e-12);
        assert!((curve[2].1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ecdf_monotone_in_unit_interval() {
        let curve = ecdf(&[5.0, 1.0, 4.0, 2.0, 3.0]);
        let n = curve.len() as f64;
        for w in curve.windows(2) {
            assert!(w[0].0 <= w[1].0);
            assert!((w[1].1 - w[0].1 - 1.0 / n).abs() < 1e-12);
        }
        assert!(curve.iter().all(|&(_, y)| (0.0..1.0).contains(&y)));
    }

    #[test]
    fn test_ecdf_empty() {
        assert!(ecdf(&[]).is_empty());
    }

    #[test]
    fn test_log_bins_endpoints() {
        let edges = log_bins(1.0, 10.0, 15);
        assert_eq!(edges.len(), 15);
        assert!((edges[0] - 1.0).abs() < 1e-12);
        assert!((edges[14] - 10.0).abs() < 1e-9);
        // uniform spacing in log10
        let step = edges[1] / edges[0];
        for w in edges.windows(2) {
            assert!((w[1] / w[0] - step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_histogram_edge_rules() {
        let edges = vec![1.0, 2.0, 4.0, 8.0];
        // interior edge goes to the right bin, last edge is included
        let counts = histogram(&[1.0, 1.5, 2.0, 3.9, 8.0, 0.5, 9.0], &edges);
        assert_eq!(counts, vec![2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_histogram_counts_total() {
        let edges = log_bins(1.0, 10.0, 15);
        let sample: Vec<f64> = (0..100).map(|i| 1.0 + 9.0 * i as f64 / 99.0).collect();
        let counts = histogram(&sample, &edges);
        let total: f64 = counts.iter().sum();
        assert!((total - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_median_odd_even() {
        assert!((median(&[3.0, 1.0, 2.0]) - 2.0).abs() < 1e-12);
        assert!((median(&[4.0, 1.0, 2.0, 3.0]) - 2.5).abs() < 1e-12);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_steps_mid_shape() {
        let steps = steps_mid(&[(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(
            steps,
            vec![(1.0, 2.0), (2.0, 2.0), (2.0, 4.0), (3.0, 4.0)]
        );
        // degenerate input passes through
        assert_eq!(steps_mid(&[(1.0, 1.0)]), vec![(1.0, 1.0)]);
    }

    #[test]
    fn test_histogram_steps_closed_outline() {
        let outline = histogram_steps(&[1.0, 2.0, 3.0], &[5.0, 7.0]);
        assert_eq!(outline.first(), Some(&(1.0, 0.0)));
        assert_eq!(outline.last(), Some(&(3.0, 0.0)));
        assert!(outline.contains(&(2.0, 5.0)));
        assert!(outline.contains(&(2.0, 7.0)));
    }

    #[test]
    fn test_broken_power_law_break_and_slopes() {
        let (x0, a, b) = (2.0, 3.0, -1.5);
        // equal contributions at the break
        assert!((broken_power_law(x0, x0, a, b) - 0.5).abs() < 1e-12);
        // slope a dominates well below the break
        let x = 0.02;
        let expected = (x / x0).powf(a);
        assert!((broken_power_law(x, x0, a, b) / expected - 1.0).abs() < 1e-3);
        // slope b dominates well above the break
        let x = 200.0;
        let expected = (x / x0).powf(b);
        assert!((broken_power_law(x, x0, a, b) / expected - 1.0).abs() < 1e-3);
    }
}
