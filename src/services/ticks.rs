//! Nice tick arithmetic shared by scales and histogram binning
//!
//! Steps are 1, 2 or 5 times a power of ten. Fractional steps are carried as
//! a negative inverse (`-10` means a step of `0.1`) so tick values are
//! computed by division and stay free of accumulated rounding error.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Round half toward positive infinity
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Tick index range `[i1, i2]` and increment for `count` ticks over
/// `[start, stop]` (`start <= stop`)
pub fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let positive = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * positive);
        i2 = round_half_up(stop * positive);
        if i1 / positive < start {
            i1 += 1.0;
        }
        if i2 / positive > stop {
            i2 -= 1.0;
        }
        inc = -positive;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = round_half_up(start / inc);
        i2 = round_half_up(stop / inc);
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment; see the module docs for the negative form
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Actual distance between ticks
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let inc = tick_increment(lo, hi, count);
    let step = if inc < 0.0 { -1.0 / inc } else { inc };
    if stop < start {
        -step
    } else {
        step
    }
}

/// Roughly `count` evenly spaced round values inside `[start, stop]`
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i1.is_nan() || i2.is_nan() || i2 < i1 || !inc.is_finite() {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Extend `[start, stop]` outward to round tick values. Iterates until the
/// increment settles; a degenerate or non-finite extent is returned as is.
pub fn nice(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let (mut start, mut stop) = (start, stop);
    let mut previous: Option<f64> = None;

    // Converges in two or three rounds; the bound only guards odd inputs
    for _ in 0..10 {
        let step = tick_increment(start, stop, count as f64);
        if previous == Some(step) || step == 0.0 || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        }
        previous = Some(step);
    }
    (start, stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== ticks() ==========

    #[test]
    fn test_ticks_unit_steps() {
        assert_eq!(ticks(0.0, 10.0, 10), (0..=10).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_ticks_fractional_steps_are_exact() {
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(1.0, 3.0, 10)[1], 1.2);
    }

    #[test]
    fn test_ticks_large_values() {
        assert_eq!(
            ticks(0.0, 1_330_000.0, 5),
            vec![0.0, 200_000.0, 400_000.0, 600_000.0, 800_000.0, 1_000_000.0, 1_200_000.0]
        );
    }

    #[test]
    fn test_ticks_degenerate_and_empty() {
        assert_eq!(ticks(5.0, 5.0, 10), vec![5.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
        assert!(ticks(0.0, f64::NAN, 5).is_empty());
    }

    #[test]
    fn test_ticks_reverse() {
        assert_eq!(ticks(3.0, 1.0, 2), vec![3.0, 2.0, 1.0]);
    }

    // ========== tick_increment() / tick_step() ==========

    #[test]
    fn test_tick_increment_forms() {
        assert_eq!(tick_increment(0.0, 10.0, 10.0), 1.0);
        assert_eq!(tick_increment(0.0, 1.0, 10.0), -10.0);
        assert_eq!(tick_increment(1.0, 3.0, 10.0), -5.0);
    }

    #[test]
    fn test_tick_step() {
        assert_eq!(tick_step(0.0, 1.0, 10.0), 0.1);
        assert_eq!(tick_step(0.0, 100.0, 5.0), 20.0);
    }

    // ========== nice() ==========

    #[test]
    fn test_nice_extends_outward() {
        assert_eq!(nice(0.0, 1_330_000.0, 10), (0.0, 1_400_000.0));
        assert_eq!(nice(0.3, 9.7, 10), (0.0, 10.0));
    }

    #[test]
    fn test_nice_already_round() {
        assert_eq!(nice(1.0, 3.0, 2), (1.0, 3.0));
    }

    #[test]
    fn test_nice_degenerate_unchanged() {
        assert_eq!(nice(4.0, 4.0, 10), (4.0, 4.0));
    }
}
