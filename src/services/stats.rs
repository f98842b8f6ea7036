//! Summary statistics over one value per entity
//!
//! All functions take a borrowed slice and never reorder it; sorting happens
//! on a private copy.

use serde::Serialize;
use std::collections::HashMap;

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) / values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Most frequent value; ties go to the value encountered first
pub fn mode(values: &[f64]) -> Option<f64> {
    // bits -> (count, first index)
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::new();
    for (idx, v) in values.iter().enumerate() {
        counts.entry(v.to_bits()).or_insert((0, idx)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (ca, ia)), (_, (cb, ib))| ca.cmp(cb).then(ib.cmp(ia)))
        .map(|(bits, _)| f64::from_bits(bits))
}

/// Quantile of an ascending slice, linear interpolation between order
/// statistics at `h = (n - 1) * p`
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || p.is_nan() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantile of an unsorted slice; the caller's order is left untouched
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, p)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Purchase frequency report (orders per customer)
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct FrequencySummary {
    pub customers: usize,
    pub one_time: usize,
    pub repeat: usize,
    /// Percentage of customers with two or more orders
    pub repeat_rate: f64,
    pub max_orders: f64,
    pub most_common: f64,
}

impl FrequencySummary {
    pub fn from_counts(counts: &[f64]) -> Self {
        if counts.is_empty() {
            return Self::default();
        }

        let customers = counts.len();
        let one_time = counts.iter().filter(|&&c| c == 1.0).count();
        let repeat = customers - one_time;

        Self {
            customers,
            one_time,
            repeat,
            repeat_rate: repeat as f64 / customers as f64 * 100.0,
            max_orders: max(counts).unwrap_or(0.0),
            most_common: mode(counts).unwrap_or(0.0),
        }
    }
}

/// Quantile marking the high-spending tier
pub const HIGH_SPENDING_QUANTILE: f64 = 0.9;

/// Spending distribution report (revenue per customer)
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SpendingSummary {
    pub customers: usize,
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    pub most_common: f64,
    /// Spending at the 90th percentile
    pub high_threshold: f64,
    /// Customers spending at least `high_threshold`
    pub high_customers: usize,
    /// Percentage of customers spending at least `high_threshold`
    pub high_rate: f64,
}

impl SpendingSummary {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let high_threshold = quantile(values, HIGH_SPENDING_QUANTILE).unwrap_or(0.0);
        let high_customers = values.iter().filter(|&&v| v >= high_threshold).count();

        Self {
            customers: values.len(),
            mean: mean(values).unwrap_or(0.0),
            median: median(values).unwrap_or(0.0),
            max: max(values).unwrap_or(0.0),
            min: min(values).unwrap_or(0.0),
            most_common: mode(values).unwrap_or(0.0),
            high_threshold,
            high_customers,
            high_rate: high_customers as f64 / values.len() as f64 * 100.0,
        }
    }
}
