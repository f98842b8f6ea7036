//! Linear and band scales

use crate::services::ticks;

/// Half-width used to widen a zero-length continuous domain
pub const DEGENERATE_EPSILON: f64 = 0.5;

/// Continuous domain -> pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A zero-length or non-finite domain is widened by
    /// [`DEGENERATE_EPSILON`] on both sides.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (lo, hi) = domain;
        let domain = if !lo.is_finite() || !hi.is_finite() {
            (0.0, 1.0)
        } else if lo == hi {
            (lo - DEGENERATE_EPSILON, hi + DEGENERATE_EPSILON)
        } else {
            domain
        };
        Self { domain, range }
    }

    /// `[0, max]`, the usual domain of a bar or count axis
    pub fn from_zero(max: f64, range: (f64, f64)) -> Self {
        let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
        Self::new((0.0, max), range)
    }

    /// Extend the domain to round tick values
    pub fn nice(self, count: usize) -> Self {
        let (lo, hi) = ticks::nice(self.domain.0, self.domain.1, count);
        Self {
            domain: (lo, hi),
            range: self.range,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value; values outside the domain extrapolate
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = (value - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks::ticks(self.domain.0, self.domain.1, count)
    }
}

/// Discrete domain -> evenly spaced bands
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl BandScale {
    pub const DEFAULT_PADDING: f64 = 0.2;

    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: Self::DEFAULT_PADDING,
            padding_outer: Self::DEFAULT_PADDING,
            align: 0.5,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    fn layout(&self) -> (f64, f64) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (start, stop) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        let offset = (stop - start - step * (n - self.padding_inner)) * self.align;
        (start + offset, step)
    }

    /// Distance between the starts of adjacent bands
    pub fn step(&self) -> f64 {
        self.layout().1
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start of the band for `key`, `None` if the key is not in the domain
    pub fn position(&self, key: &str) -> Option<f64> {
        let idx = self.domain.iter().position(|k| k == key)?;
        let (start, step) = self.layout();
        let pos = start + step * idx as f64;
        Some(if self.range.1 < self.range.0 {
            self.range.0 + self.range.1 - pos - self.bandwidth()
        } else {
            pos
        })
    }

    /// Center of the band for `key`
    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|p| p + self.bandwidth() / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ========== LinearScale ==========

    #[test]
    fn test_linear_apply() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert!(approx(scale.apply(0.0), 0.0));
        assert!(approx(scale.apply(2.5), 25.0));
        assert!(approx(scale.apply(10.0), 100.0));
    }

    #[test]
    fn test_linear_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (400.0, 0.0));
        assert!(approx(scale.apply(0.0), 400.0));
        assert!(approx(scale.apply(10.0), 0.0));
    }

    #[test]
    fn test_linear_degenerate_domain_widened() {
        let scale = LinearScale::new((3.0, 3.0), (0.0, 100.0));
        assert_eq!(scale.domain(), (2.5, 3.5));
        assert!(approx(scale.apply(3.0), 50.0));
    }

    #[test]
    fn test_linear_from_zero_empty_max() {
        let scale = LinearScale::from_zero(0.0, (0.0, 10.0));
        assert_eq!(scale.domain(), (0.0, 1.0));
    }

    #[test]
    fn test_linear_nice_and_ticks() {
        let scale = LinearScale::from_zero(1_330_000.0, (0.0, 600.0)).nice(10);
        assert_eq!(scale.domain(), (0.0, 1_400_000.0));
        assert_eq!(scale.ticks(5).len(), 8);
    }

    // ========== BandScale ==========

    #[test]
    fn test_band_layout() {
        let keys: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let scale = BandScale::new(keys, (0.0, 100.0));

        // step = 100 / (3 - 0.2 + 0.4) = 31.25
        assert!(approx(scale.step(), 31.25));
        assert!(approx(scale.bandwidth(), 25.0));
        assert!(approx(scale.position("a").unwrap(), 6.25));
        assert!(approx(scale.position("c").unwrap(), 68.75));
        assert!(approx(scale.center("b").unwrap(), 50.0));
        assert!(scale.position("z").is_none());
    }

    #[test]
    fn test_band_empty_domain() {
        let scale = BandScale::new(Vec::new(), (0.0, 100.0));
        assert!(scale.position("a").is_none());
        assert!(scale.bandwidth() > 0.0);
    }
}
