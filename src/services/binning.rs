//! Histogram binning on nice thresholds

use serde::Serialize;

use super::ticks::{nice, tick_increment, ticks};

/// One histogram bin covering `[x0, x1)`; the last bin also includes `x1`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

/// How many thresholds to ask for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinCount {
    Fixed(usize),
    /// `clamp(max value, min, max)`, for small discrete counts
    Adaptive { min: usize, max: usize },
}

impl BinCount {
    /// Requested threshold count for a data set whose largest value is `max_value`
    pub fn resolve(self, max_value: f64) -> usize {
        match self {
            Self::Fixed(n) => n.max(1),
            Self::Adaptive { min, max } => {
                if !max_value.is_finite() || max_value <= 0.0 {
                    return min.max(1);
                }
                (max_value.ceil() as usize).clamp(min, max).max(1)
            }
        }
    }
}

/// Number of thresholds `<= x`
fn bisect_right(thresholds: &[f64], x: f64) -> usize {
    thresholds.partition_point(|t| *t <= x)
}

/// Bin `values` the way a nice-threshold histogram does: nice the extent,
/// use its ticks as thresholds, and push the upper edge out one step when the
/// maximum sits on a tick so it still gets its own bin.
pub fn bin_values(values: &[f64], count: BinCount) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (lo, hi) = match (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Vec::new(),
    };

    let n = count.resolve(hi);
    let (x0, mut x1) = nice(lo, hi, n);
    let mut thresholds = ticks(x0, x1, n);

    if thresholds.last().is_some_and(|&t| t >= x1) {
        if hi >= x1 {
            let step = tick_increment(x0, x1, n as f64);
            if step.is_finite() {
                if step > 0.0 {
                    x1 = ((x1 / step).floor() + 1.0) * step;
                } else if step < 0.0 {
                    x1 = ((x1 * -step).ceil() + 1.0) / -step;
                }
            }
        } else {
            thresholds.pop();
        }
    }

    // Keep only thresholds strictly inside the domain
    thresholds.retain(|&t| t > x0 && t <= x1);

    let m = thresholds.len();
    let mut bins: Vec<Bin> = (0..=m)
        .map(|i| Bin {
            x0: if i > 0 { thresholds[i - 1] } else { x0 },
            x1: if i < m { thresholds[i] } else { x1 },
            count: 0,
        })
        .collect();

    for v in finite {
        if v < x0 || v > x1 {
            continue;
        }
        let idx = bisect_right(&thresholds, v).min(m);
        bins[idx].count += 1;
    }

    bins
}

/// Drop bins starting below `min_x0` (e.g. an empty "below one" bin for
/// counts that are always at least one)
pub fn drop_below(bins: Vec<Bin>, min_x0: f64) -> Vec<Bin> {
    bins.into_iter().filter(|b| b.x0 >= min_x0).collect()
}

/// Tallest bin, at least 1
pub fn max_count(bins: &[Bin]) -> usize {
    bins.iter().map(|b| b.count).max().unwrap_or(0).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(bins: &[Bin]) -> Vec<usize> {
        bins.iter().map(|b| b.count).collect()
    }

    // ========== BinCount ==========

    #[test]
    fn test_bin_count_adaptive_clamps() {
        let adaptive = BinCount::Adaptive { min: 10, max: 50 };
        assert_eq!(adaptive.resolve(3.0), 10);
        assert_eq!(adaptive.resolve(27.0), 27);
        assert_eq!(adaptive.resolve(400.0), 50);
        assert_eq!(adaptive.resolve(f64::NAN), 10);
        assert_eq!(BinCount::Fixed(88).resolve(1.0), 88);
    }

    // ========== bin_values() ==========

    #[test]
    fn test_bin_values_unit_bins() {
        let bins = bin_values(&[1.0, 1.0, 1.0, 2.0, 3.0], BinCount::Fixed(2));

        assert_eq!(counts(&bins), vec![3, 1, 1]);
        assert_eq!(bins[0].x0, 1.0);
        assert_eq!(bins[0].x1, 2.0);
        // Max sits on a tick, so the domain grows by one step
        assert_eq!(bins[2].x1, 4.0);
    }

    #[test]
    fn test_bin_values_preserves_total() {
        let values: Vec<f64> = (0..200).map(|i| (i * 37 % 101) as f64 * 1_000.0).collect();
        let bins = bin_values(&values, BinCount::Fixed(88));

        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
        for pair in bins.windows(2) {
            assert_eq!(pair[0].x1, pair[1].x0);
        }
    }

    #[test]
    fn test_bin_values_adaptive_order_counts() {
        let bins = bin_values(&[3.0, 2.0, 2.0, 1.0, 1.0], BinCount::Adaptive { min: 10, max: 50 });

        // Ten thresholds between 1 and 3 give steps of 0.2
        assert_eq!(bins.len(), 11);
        assert_eq!(bins[0].x0, 1.0);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn test_bin_values_single_value() {
        let bins = bin_values(&[5.0, 5.0], BinCount::Fixed(10));

        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].x0, 5.0);
        assert_eq!(bins[0].x1, 5.0);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn test_bin_values_empty() {
        assert!(bin_values(&[], BinCount::Fixed(10)).is_empty());
        assert!(bin_values(&[f64::NAN], BinCount::Fixed(10)).is_empty());
    }

    // ========== drop_below() / max_count() ==========

    #[test]
    fn test_drop_below() {
        let bins = vec![
            Bin { x0: 0.0, x1: 1.0, count: 0 },
            Bin { x0: 1.0, x1: 2.0, count: 4 },
        ];
        let kept = drop_below(bins, 1.0);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].count, 4);
    }

    #[test]
    fn test_max_count_floor_of_one() {
        assert_eq!(max_count(&[]), 1);
        assert_eq!(max_count(&[Bin { x0: 0.0, x1: 1.0, count: 7 }]), 7);
    }
}
